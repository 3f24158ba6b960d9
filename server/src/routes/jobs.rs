//! `/jobs` 路由
//!
//! 列表与详情公开；创建、修改、删除需要管理员令牌。

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use jobly::{Id, Job, JobFilter, JobUpdate, NewJob};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::AdminUser;
use crate::errors::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(create_job).get(list_jobs))
        .route("/jobs/:id", get(get_job).patch(update_job).delete(remove_job))
}

async fn create_job(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(data) = payload?;
    let job = Job::create(state.db.pool(), &data).await?;
    tracing::info!(job_id = job.id, by = %admin.username, "job created");
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

async fn list_jobs(
    State(state): State<AppState>,
    query: Result<Query<JobFilter>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(filter) = query?;
    let jobs = Job::find_all(state.db.pool(), Some(&filter)).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

async fn get_job(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let job = Job::get(state.db.pool(), id).await?;
    Ok(Json(json!({ "job": job })))
}

async fn update_job(
    _admin: AdminUser,
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let Json(data) = payload?;
    let job = Job::update(state.db.pool(), id, &data).await?;
    Ok(Json(json!({ "job": job })))
}

async fn remove_job(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    Job::remove(state.db.pool(), id).await?;
    tracing::info!(job_id = id, by = %admin.username, "job removed");
    Ok(Json(json!({ "deleted": id })))
}
