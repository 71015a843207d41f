//! services/api/src/web/skills.rs
//!
//! Handlers for the skill list. Every response lists the skills in ascending
//! order, whatever order they were added in.

use crate::error::{ApiError, ErrorBody};
use crate::web::{
    extract::ApiJson,
    payload::{ReplaceSkillsRequest, SkillRequest},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct SkillResponse {
    pub message: String,
    pub skill: String,
    pub skills: Vec<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedSkillResponse {
    pub message: String,
    pub deleted_skill: String,
    pub skills: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SkillsResponse {
    pub message: String,
    pub skills: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/skills",
    tag = "skills",
    responses(
        (status = 200, description = "Skills in ascending order", body = Vec<String>),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn list_skills_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.store.list_skills().await?))
}

/// `GET /skills/top`, kept for older clients. Same result as `GET /skills`.
#[utoipa::path(
    get,
    path = "/skills/top",
    tag = "skills",
    responses(
        (status = 200, description = "Skills in ascending order", body = Vec<String>),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn top_skills_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.store.list_skills().await?))
}

#[utoipa::path(
    post,
    path = "/skills",
    tag = "skills",
    request_body = SkillRequest,
    responses(
        (status = 201, description = "Skill added", body = SkillResponse),
        (status = 400, description = "Validation failed or the skill already exists", body = ErrorBody),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn add_skill_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SkillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let skill = request.into_skill()?;
    let skills = state.store.add_skill(&skill).await?;
    Ok((
        StatusCode::CREATED,
        Json(SkillResponse {
            message: "Skill added successfully".to_string(),
            skill,
            skills,
        }),
    ))
}

/// Remove a skill by name, ignoring case. The name is URL-decoded.
#[utoipa::path(
    delete,
    path = "/skills/{skill}",
    tag = "skills",
    params(("skill" = String, Path, description = "Skill name, URL-encoded")),
    responses(
        (status = 200, description = "Skill removed", body = DeletedSkillResponse),
        (status = 404, description = "No profile, or no such skill", body = ErrorBody)
    )
)]
pub async fn delete_skill_handler(
    State(state): State<Arc<AppState>>,
    Path(skill): Path<String>,
) -> Result<Json<DeletedSkillResponse>, ApiError> {
    delete_skill(&state, &skill).await
}

/// `/skills/top` is a static route, so deleting a skill literally named "top"
/// lands here instead of on `delete_skill_handler`.
pub async fn delete_top_skill_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeletedSkillResponse>, ApiError> {
    delete_skill(&state, "top").await
}

async fn delete_skill(state: &AppState, name: &str) -> Result<Json<DeletedSkillResponse>, ApiError> {
    let (deleted_skill, skills) = state.store.delete_skill(name.trim()).await?;
    Ok(Json(DeletedSkillResponse {
        message: "Skill deleted successfully".to_string(),
        deleted_skill,
        skills,
    }))
}

/// Replace the whole skill list.
///
/// Entries are trimmed, those shorter than two characters are dropped, and
/// names repeated in a different case keep their first spelling.
#[utoipa::path(
    put,
    path = "/skills",
    tag = "skills",
    request_body = ReplaceSkillsRequest,
    responses(
        (status = 200, description = "Skills replaced", body = SkillsResponse),
        (status = 400, description = "`skills` is not an array", body = ErrorBody),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn replace_skills_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> Result<Json<SkillsResponse>, ApiError> {
    let request = ReplaceSkillsRequest::from_value(&body)?;
    let skills = state.store.replace_skills(&request.skills).await?;
    Ok(Json(SkillsResponse {
        message: "Skills updated successfully".to_string(),
        skills,
    }))
}
