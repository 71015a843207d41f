//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use portfolio_core::ports::ProfileRepository;
use portfolio_core::store::ProfileStore;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: ProfileStore,
}

impl AppState {
    pub fn new(repo: Arc<dyn ProfileRepository>) -> Self {
        Self {
            store: ProfileStore::new(repo),
        }
    }
}
