//! services/api/src/web/work.rs
//!
//! Handlers for the work-experience list, mirroring the project endpoints.

use crate::error::{ApiError, ErrorBody};
use crate::web::{extract::ApiJson, parse_index, payload::WorkRequest, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use portfolio_core::domain::{ListKind, WorkExperience};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkResponse {
    pub message: String,
    pub work: WorkExperience,
    pub work_list: Vec<WorkExperience>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedWorkResponse {
    pub message: String,
    pub deleted_work: WorkExperience,
    pub work_list: Vec<WorkExperience>,
}

#[utoipa::path(
    get,
    path = "/work",
    tag = "work",
    responses(
        (status = 200, description = "All work experience entries", body = Vec<WorkExperience>),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn list_work_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WorkExperience>>, ApiError> {
    Ok(Json(state.store.list_work().await?))
}

#[utoipa::path(
    post,
    path = "/work",
    tag = "work",
    request_body = WorkRequest,
    responses(
        (status = 201, description = "Entry appended", body = WorkResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn add_work_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<WorkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let work = request.into_new_work()?;
    let (work, work_list) = state.store.add_work(work).await?;
    Ok((
        StatusCode::CREATED,
        Json(WorkResponse {
            message: "Work experience added successfully".to_string(),
            work,
            work_list,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/work/{index}",
    tag = "work",
    params(("index" = usize, Path, description = "Zero-based position in the work list")),
    request_body = WorkRequest,
    responses(
        (status = 200, description = "Entry replaced", body = WorkResponse),
        (status = 400, description = "Invalid index or validation failure", body = ErrorBody),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn update_work_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
    ApiJson(request): ApiJson<WorkRequest>,
) -> Result<Json<WorkResponse>, ApiError> {
    let work = request.into_new_work()?;
    let index = parse_index(&index, ListKind::Work)?;
    let (work, work_list) = state.store.update_work_at(index, work).await?;
    Ok(Json(WorkResponse {
        message: "Work experience updated successfully".to_string(),
        work,
        work_list,
    }))
}

#[utoipa::path(
    delete,
    path = "/work/{index}",
    tag = "work",
    params(("index" = usize, Path, description = "Zero-based position in the work list")),
    responses(
        (status = 200, description = "Entry removed", body = DeletedWorkResponse),
        (status = 400, description = "Invalid index", body = ErrorBody),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn delete_work_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Result<Json<DeletedWorkResponse>, ApiError> {
    let index = parse_index(&index, ListKind::Work)?;
    let (deleted_work, work_list) = state.store.delete_work_at(index).await?;
    Ok(Json(DeletedWorkResponse {
        message: "Work experience deleted successfully".to_string(),
        deleted_work,
        work_list,
    }))
}
