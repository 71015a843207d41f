//! services/api/src/web/rest.rs
//!
//! Contains the cross-cutting REST handlers (health, search) and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorBody};
use crate::web::payload::{
    PreferencesRequest, ProfileRequest, ProjectRequest, ReplaceSkillsRequest, SkillRequest,
    WorkRequest,
};
use crate::web::{profile, projects, skills, state::AppState, work};
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::Utc;
use portfolio_core::domain::{
    Preferences, Profile, ProfileLinks, Project, ProjectLinks, ProjectStatus, WorkExperience,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        search_handler,
        profile::get_profile_handler,
        profile::upsert_profile_handler,
        profile::delete_profile_handler,
        projects::list_projects_handler,
        projects::add_project_handler,
        projects::update_project_handler,
        projects::delete_project_handler,
        work::list_work_handler,
        work::add_work_handler,
        work::update_work_handler,
        work::delete_work_handler,
        skills::list_skills_handler,
        skills::top_skills_handler,
        skills::add_skill_handler,
        skills::delete_skill_handler,
        skills::replace_skills_handler,
    ),
    components(
        schemas(
            Profile, ProfileLinks, Preferences, Project, ProjectLinks, ProjectStatus, WorkExperience,
            ProfileRequest, PreferencesRequest, ProjectRequest, WorkRequest, SkillRequest,
            ReplaceSkillsRequest, ErrorBody, HealthResponse,
            profile::ProfileResponse, profile::MessageResponse,
            projects::ProjectResponse, projects::DeletedProjectResponse,
            work::WorkResponse, work::DeletedWorkResponse,
            skills::SkillResponse, skills::DeletedSkillResponse, skills::SkillsResponse,
        )
    ),
    tags(
        (name = "profile", description = "The portfolio owner's profile document."),
        (name = "projects", description = "Projects, addressed by position."),
        (name = "work", description = "Work experience, addressed by position."),
        (name = "skills", description = "The de-duplicated skill list."),
        (name = "meta", description = "Search and service health.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Query Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `OK` while the process is serving requests.
    pub status: String,
    pub timestamp: String,
    /// `connected` or `disconnected`, depending on whether the store answers.
    pub store: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text to look for in project titles and descriptions.
    pub q: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness plus a store connectivity flag. Always answers 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "meta",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let connected = state.store.health().await;
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        store: if connected { "connected" } else { "disconnected" }.to_string(),
    })
}

/// Case-insensitive search over project titles and descriptions.
///
/// A missing or blank `q` returns an empty list without reading the profile.
#[utoipa::path(
    get,
    path = "/search",
    tag = "meta",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching projects", body = Vec<Project>),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let q = query.q.unwrap_or_default();
    if q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }
    Ok(Json(state.store.search_projects(&q).await?))
}

/// Fallback for every unmatched route.
pub async fn handler_not_found() -> ApiError {
    ApiError::RouteNotFound
}
