//! HTTP 层测试
//!
//! 鉴权和请求校验的用例使用惰性连接池，不需要数据库；其余用例需要 DATABASE_URL，
//! 未设置时跳过。每个用例使用单连接的连接池，临时表只在该连接内可见。

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jobly::{DbPool, PoolConfig, SCHEMA_SQL};
use jobly_server::{build_app, AppState, JwtKeys};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn keys() -> JwtKeys {
    JwtKeys::new(SECRET)
}

fn admin_token() -> String {
    keys().create_token("admin", true).unwrap()
}

fn user_token() -> String {
    keys().create_token("u1", false).unwrap()
}

/// 不连接数据库的应用
fn offline_app() -> Router {
    let db = DbPool::connect_lazy_with("postgres://nobody@127.0.0.1:1/none", &PoolConfig::default())
        .unwrap();
    build_app(AppState::new(db, keys()))
}

async fn try_app() -> Option<Router> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DATABASE_URL");

    let schema = SCHEMA_SQL.replace("CREATE TABLE", "CREATE TEMP TABLE");
    sqlx::raw_sql(&schema).execute(&pool).await.unwrap();
    sqlx::raw_sql(
        "INSERT INTO companies (handle, name, num_employees, description, logo_url)
         VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img');
         INSERT INTO jobs (title, salary, equity, company_handle)
         VALUES ('J1', 1, 0.1, 'c1'), ('J2', 2, 0.2, 'c1'), ('J3', 3, NULL, 'c1')",
    )
    .execute(&pool)
    .await
    .unwrap();

    Some(build_app(AppState::new(DbPool::from_pool(pool), keys())))
}

macro_rules! app_or_skip {
    () => {
        match try_app().await {
            Some(app) => app,
            None => {
                eprintln!("DATABASE_URL not set; skipping");
                return;
            }
        }
    };
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn new_job_body() -> Value {
    json!({
        "title": "new",
        "salary": 10,
        "equity": "0.2",
        "companyHandle": "c1",
    })
}

/// 取得列表中第一个职位的 id
async fn first_job_id(app: &Router) -> i64 {
    let (_, body) = send(app, request(Method::GET, "/jobs", None, None)).await;
    body["jobs"][0]["id"].as_i64().unwrap()
}

// ---- 鉴权与校验（无需数据库） ----

#[tokio::test]
async fn admin_routes_reject_anonymous() {
    let app = offline_app();
    let cases = [
        request(Method::POST, "/jobs", None, Some(new_job_body())),
        request(Method::PATCH, "/jobs/1", None, Some(json!({ "title": "x" }))),
        request(Method::DELETE, "/jobs/1", None, None),
    ];
    for req in cases {
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }
}

#[tokio::test]
async fn admin_routes_reject_non_admin_and_bad_tokens() {
    let app = offline_app();
    let user = user_token();
    let (status, _) = send(&app, request(Method::POST, "/jobs", Some(&user), Some(new_job_body()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request(Method::DELETE, "/jobs/1", Some(&user), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = JwtKeys::new("other").create_token("admin", true).unwrap();
    let (status, _) = send(&app, request(Method::DELETE, "/jobs/1", Some(&forged), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, request(Method::DELETE, "/jobs/1", Some("not-a-jwt"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_rejects_invalid_bodies() {
    let app = offline_app();
    let token = admin_token();
    let bodies = [
        json!({ "title": "new", "salary": 10 }),
        json!({ "title": "new", "salary": "not-a-number", "companyHandle": "c1" }),
        json!({ "title": "new", "equity": "1.2", "companyHandle": "c1" }),
        json!({ "title": "", "companyHandle": "c1" }),
        json!({ "title": "new", "salary": -1, "companyHandle": "c1" }),
        json!({ "id": 5, "title": "new", "companyHandle": "c1" }),
        json!({ "title": "new", "equity": 0.2, "companyHandle": "c1" }),
    ];
    for body in bodies {
        let (status, resp) = send(&app, request(Method::POST, "/jobs", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");
        assert_eq!(resp["error"], "bad_request");
    }
}

#[tokio::test]
async fn update_rejects_invalid_bodies() {
    let app = offline_app();
    let token = admin_token();
    let bodies = [
        json!({}),
        json!({ "id": 2 }),
        json!({ "companyHandle": "c2" }),
        json!({ "salary": "not-a-number" }),
        json!({ "equity": "1.5" }),
        json!({ "equity": 0.5 }),
    ];
    for body in bodies {
        let (status, resp) = send(&app, request(Method::PATCH, "/jobs/1", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");
    }
}

#[tokio::test]
async fn malformed_id_and_unknown_route() {
    let app = offline_app();
    let token = admin_token();
    let (status, _) = send(&app, request(Method::PATCH, "/jobs/abc", Some(&token), Some(json!({ "title": "x" })))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, request(Method::GET, "/nope", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn list_rejects_invalid_query() {
    let app = offline_app();
    let (status, _) = send(&app, request(Method::GET, "/jobs?minSalary=abc", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, request(Method::GET, "/jobs?color=red", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, request(Method::GET, "/jobs?minSalary=-5", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---- 需要数据库 ----

#[tokio::test]
async fn create_job_as_admin() {
    let app = app_or_skip!();
    let token = admin_token();
    let (status, body) = send(&app, request(Method::POST, "/jobs", Some(&token), Some(new_job_body()))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["job"]["title"], "new");
    assert_eq!(body["job"]["salary"], 10);
    assert_eq!(body["job"]["equity"], "0.2");
    assert_eq!(body["job"]["companyHandle"], "c1");
    assert!(body["job"]["id"].is_i64());
}

#[tokio::test]
async fn create_job_for_unknown_company_is_bad_request() {
    let app = app_or_skip!();
    let token = admin_token();
    let mut data = new_job_body();
    data["companyHandle"] = json!("nope");
    let (status, _) = send(&app, request(Method::POST, "/jobs", Some(&token), Some(data))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_jobs_with_filters() {
    let app = app_or_skip!();
    let (status, body) = send(&app, request(Method::GET, "/jobs", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["J1", "J2", "J3"]);
    assert_eq!(body["jobs"][0]["equity"], "0.1");
    assert!(body["jobs"][2]["equity"].is_null());

    let (_, body) = send(&app, request(Method::GET, "/jobs?hasEquity=true", None, None)).await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, request(Method::GET, "/jobs?minSalary=2&title=j", None, None)).await;
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["title"], "J2");
}

#[tokio::test]
async fn get_update_and_remove_job() {
    let app = app_or_skip!();
    let token = admin_token();
    let id = first_job_id(&app).await;

    let (status, body) = send(&app, request(Method::GET, &format!("/jobs/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "J1");

    let (status, body) = send(
        &app,
        request(Method::PATCH, &format!("/jobs/{id}"), Some(&token), Some(json!({ "title": "J-New", "equity": null }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "J-New");
    assert_eq!(body["job"]["salary"], 1);
    assert!(body["job"]["equity"].is_null());

    let (status, body) = send(&app, request(Method::DELETE, &format!("/jobs/{id}"), Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], id);

    let (status, _) = send(&app, request(Method::GET, &format!("/jobs/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_job_is_not_found() {
    let app = app_or_skip!();
    let token = admin_token();
    let (status, body) = send(&app, request(Method::GET, "/jobs/0", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No job: 0");

    let (status, _) = send(&app, request(Method::PATCH, "/jobs/0", Some(&token), Some(json!({ "title": "x" })))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request(Method::DELETE, "/jobs/0", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
