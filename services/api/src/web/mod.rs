//! services/api/src/web/mod.rs
//!
//! The HTTP surface: routing, shared layers, and the handler modules.

pub mod extract;
pub mod payload;
pub mod profile;
pub mod projects;
pub mod rest;
pub mod skills;
pub mod state;
pub mod validation;
pub mod work;

use crate::config::{Config, ConfigError};
use crate::error::ApiError;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, put},
    Router,
};
use portfolio_core::domain::ListKind;
use portfolio_core::ports::PortError;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use rest::ApiDoc;
pub use state::AppState;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Parses a positional index from a path segment. Anything that is not a
/// non-negative integer is an invalid index, never a crash.
pub fn parse_index(raw: &str, list: ListKind) -> Result<usize, ApiError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ApiError::Port(PortError::InvalidIndex(list)))
}

/// The API routes with state attached, without any outer layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(rest::health_handler))
        .route("/search", get(rest::search_handler))
        .route(
            "/profile",
            get(profile::get_profile_handler)
                .post(profile::upsert_profile_handler)
                .delete(profile::delete_profile_handler),
        )
        .route(
            "/projects",
            get(projects::list_projects_handler).post(projects::add_project_handler),
        )
        .route(
            "/projects/{index}",
            put(projects::update_project_handler).delete(projects::delete_project_handler),
        )
        .route(
            "/work",
            get(work::list_work_handler).post(work::add_work_handler),
        )
        .route(
            "/work/{index}",
            put(work::update_work_handler).delete(work::delete_work_handler),
        )
        .route(
            "/skills",
            get(skills::list_skills_handler)
                .post(skills::add_skill_handler)
                .put(skills::replace_skills_handler),
        )
        .route(
            "/skills/top",
            get(skills::top_skills_handler).delete(skills::delete_top_skill_handler),
        )
        .route(
            "/skills/{skill}",
            axum::routing::delete(skills::delete_skill_handler),
        )
        .fallback(rest::handler_not_found)
        .with_state(state)
}

fn cors_layer(config: &Config) -> Result<CorsLayer, ConfigError> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                ConfigError::InvalidValue("CORS_ORIGINS".to_string(), e.to_string())
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]))
}

/// The complete application: API routes, Swagger UI, and the shared layers.
pub fn build_app(state: Arc<AppState>, config: &Config) -> Result<Router, ConfigError> {
    let api_router = router(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(config)?)
        .layer(TraceLayer::new_for_http());

    Ok(Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router))
}
