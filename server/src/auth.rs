//! 管理员接口的 Bearer 令牌鉴权

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::AppState;
use crate::errors::ApiError;

/// 令牌中携带的用户信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("admin privileges required")]
    NotAdmin,
}

/// 由同一个密钥派生的 HS256 签名与校验密钥
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // 令牌不带 exp
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn create_token(&self, username: &str, is_admin: bool) -> Result<String, AuthError> {
        let claims = Claims {
            username: username.to_string(),
            is_admin,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(decode::<Claims>(token, &self.decoding, &self.validation)?.claims)
    }
}

/// 用给定密钥签发令牌
pub fn create_token(username: &str, is_admin: bool, secret: &str) -> Result<String, AuthError> {
    JwtKeys::new(secret).create_token(username, is_admin)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// 只有令牌有效且 `isAdmin: true` 时才提取成功，否则返回 401
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let result = extract_bearer(&parts.headers)
            .and_then(|token| state.jwt.verify(token))
            .and_then(|claims| {
                if claims.is_admin {
                    Ok(claims)
                } else {
                    Err(AuthError::NotAdmin)
                }
            });

        match result {
            Ok(claims) => Ok(AdminUser(claims)),
            Err(err) => {
                tracing::warn!(error = %err, path = %parts.uri.path(), "rejected admin request");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
