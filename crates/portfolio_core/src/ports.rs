//! crates/portfolio_core/src/ports.rs
//!
//! Defines the storage contract for the profile aggregate.
//! The core only ever sees whole documents addressed by a key; how they are
//! persisted is up to the adapter.

use async_trait::async_trait;

use crate::domain::{ListKind, Profile};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type shared by the store and every repository adapter.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid {0} index")]
    InvalidIndex(ListKind),
    #[error("Skill '{0}' already exists")]
    DuplicateSkill(String),
    #[error("{message}")]
    Validation { field: &'static str, message: String },
    /// The stored document changed between read and write.
    #[error("Concurrent modification: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Repository Port
//=========================================================================================

/// The key the single profile document lives under.
pub const PROFILE_KEY: &str = "profile";

/// A stored value together with the revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision<T> {
    pub value: T,
    pub revision: i64,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn fetch(&self, key: &str) -> PortResult<Option<Revision<Profile>>>;

    /// Writes the whole document and returns its new revision.
    ///
    /// With `expected = None` the write only succeeds if nothing is stored under
    /// `key`; with `Some(rev)` only if the stored revision is still `rev`.
    /// Otherwise `PortError::Conflict` is returned and nothing is written.
    async fn save(&self, key: &str, profile: &Profile, expected: Option<i64>) -> PortResult<i64>;

    /// Deletes the document, returning what was stored.
    async fn remove(&self, key: &str) -> PortResult<Option<Profile>>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> PortResult<()>;
}
