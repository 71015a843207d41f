//! services/api/src/web/profile.rs
//!
//! Handlers for the profile document itself.

use crate::error::{ApiError, ErrorBody};
use crate::web::{extract::ApiJson, payload::ProfileRequest, state::AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use portfolio_core::domain::Profile;
use portfolio_core::store::Upserted;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub message: String,
    pub profile: Profile,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Fetch the profile with all of its lists.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "profile",
    responses(
        (status = 200, description = "The stored profile", body = Profile),
        (status = 404, description = "No profile exists yet", body = ErrorBody)
    )
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(state.store.get_profile().await?))
}

/// Create the profile, or merge into it if it already exists.
///
/// Links and preferences are merged key by key; skills, projects and work are
/// never changed by this endpoint.
#[utoipa::path(
    post,
    path = "/profile",
    tag = "profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn upsert_profile_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = request.into_patch()?;
    let (profile, outcome) = state.store.upsert_profile(patch).await?;

    let (status, message) = match outcome {
        Upserted::Created => (StatusCode::CREATED, "Profile created successfully"),
        Upserted::Updated => (StatusCode::OK, "Profile updated successfully"),
    };
    Ok((
        status,
        Json(ProfileResponse {
            message: message.to_string(),
            profile,
        }),
    ))
}

/// Delete the profile together with every skill, project and work entry.
#[utoipa::path(
    delete,
    path = "/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Profile deleted", body = MessageResponse),
        (status = 404, description = "No profile exists", body = ErrorBody)
    )
)]
pub async fn delete_profile_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_profile().await?;
    Ok(Json(MessageResponse {
        message: "Profile deleted successfully".to_string(),
    }))
}
