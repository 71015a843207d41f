//! services/api/src/web/projects.rs
//!
//! Handlers for the project list. Entries are addressed by their position.

use crate::error::{ApiError, ErrorBody};
use crate::web::{extract::ApiJson, parse_index, payload::ProjectRequest, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use portfolio_core::domain::{ListKind, Project};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectsQuery {
    /// Only return projects with a skill containing this text (case-insensitive).
    pub skill: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProjectResponse {
    pub message: String,
    pub project: Project,
    pub projects: Vec<Project>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProjectResponse {
    pub message: String,
    pub deleted_project: Project,
    pub projects: Vec<Project>,
}

#[utoipa::path(
    get,
    path = "/projects",
    tag = "projects",
    params(ProjectsQuery),
    responses(
        (status = 200, description = "Projects, optionally filtered by skill", body = Vec<Project>),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn list_projects_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProjectsQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state.store.list_projects(query.skill.as_deref()).await?;
    Ok(Json(projects))
}

#[utoipa::path(
    post,
    path = "/projects",
    tag = "projects",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project appended", body = ProjectResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn add_project_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let project = request.into_new_project()?;
    let (project, projects) = state.store.add_project(project).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            message: "Project added successfully".to_string(),
            project,
            projects,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/projects/{index}",
    tag = "projects",
    params(("index" = usize, Path, description = "Zero-based position in the project list")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Project replaced", body = ProjectResponse),
        (status = 400, description = "Invalid index or validation failure", body = ErrorBody),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn update_project_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
    ApiJson(request): ApiJson<ProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = request.into_new_project()?;
    let index = parse_index(&index, ListKind::Projects)?;
    let (project, projects) = state.store.update_project_at(index, project).await?;
    Ok(Json(ProjectResponse {
        message: "Project updated successfully".to_string(),
        project,
        projects,
    }))
}

#[utoipa::path(
    delete,
    path = "/projects/{index}",
    tag = "projects",
    params(("index" = usize, Path, description = "Zero-based position in the project list")),
    responses(
        (status = 200, description = "Project removed", body = DeletedProjectResponse),
        (status = 400, description = "Invalid index", body = ErrorBody),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn delete_project_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Result<Json<DeletedProjectResponse>, ApiError> {
    let index = parse_index(&index, ListKind::Projects)?;
    let (deleted_project, projects) = state.store.delete_project_at(index).await?;
    Ok(Json(DeletedProjectResponse {
        message: "Project deleted successfully".to_string(),
        deleted_project,
        projects,
    }))
}
