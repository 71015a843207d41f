//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `ProfileRepository` port. Documents live in
//! a map behind an async `RwLock` and vanish with the process. Used for local
//! development (`STORE_BACKEND=memory`) and by the test suite.

use async_trait::async_trait;
use portfolio_core::domain::Profile;
use portfolio_core::ports::{PortError, PortResult, ProfileRepository, Revision};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryAdapter {
    docs: RwLock<HashMap<String, Revision<Profile>>>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryAdapter {
    async fn fetch(&self, key: &str) -> PortResult<Option<Revision<Profile>>> {
        let docs = self.docs.read().await;
        Ok(docs.get(key).cloned())
    }

    async fn save(&self, key: &str, profile: &Profile, expected: Option<i64>) -> PortResult<i64> {
        let mut docs = self.docs.write().await;
        let current = docs.get(key).map(|doc| doc.revision);
        if current != expected {
            return Err(PortError::Conflict(format!(
                "document '{}' is at revision {:?}, expected {:?}",
                key, current, expected
            )));
        }

        let revision = current.map_or(1, |rev| rev + 1);
        docs.insert(
            key.to_string(),
            Revision {
                value: profile.clone(),
                revision,
            },
        );
        Ok(revision)
    }

    async fn remove(&self, key: &str) -> PortResult<Option<Profile>> {
        let mut docs = self.docs.write().await;
        Ok(docs.remove(key).map(|doc| doc.value))
    }

    async fn ping(&self) -> PortResult<()> {
        Ok(())
    }
}
