//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `ProfileRepository` port from the `core` crate. The aggregate is kept as a
//! single JSONB document per key in PostgreSQL, accessed through `sqlx`.

use async_trait::async_trait;
use portfolio_core::domain::Profile;
use portfolio_core::ports::{PortError, PortResult, ProfileRepository, Revision};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `ProfileRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ProfileDocumentRecord {
    body: Json<Profile>,
    revision: i64,
}
impl ProfileDocumentRecord {
    fn to_domain(self) -> Revision<Profile> {
        Revision {
            value: self.body.0,
            revision: self.revision,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `ProfileRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProfileRepository for DbAdapter {
    async fn fetch(&self, key: &str) -> PortResult<Option<Revision<Profile>>> {
        let record = sqlx::query_as::<_, ProfileDocumentRecord>(
            "SELECT body, revision FROM profile_documents WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(ProfileDocumentRecord::to_domain))
    }

    async fn save(&self, key: &str, profile: &Profile, expected: Option<i64>) -> PortResult<i64> {
        let revision: Option<i64> = match expected {
            None => sqlx::query_scalar::<_, i64>(
                "INSERT INTO profile_documents (key, body, revision) VALUES ($1, $2, 1) \
                 ON CONFLICT (key) DO NOTHING RETURNING revision",
            )
            .bind(key)
            .bind(Json(profile))
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?,
            Some(expected) => sqlx::query_scalar::<_, i64>(
                "UPDATE profile_documents SET body = $2, revision = revision + 1, updated_at = now() \
                 WHERE key = $1 AND revision = $3 RETURNING revision",
            )
            .bind(key)
            .bind(Json(profile))
            .bind(expected)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?,
        };

        revision.ok_or_else(|| match expected {
            None => PortError::Conflict(format!("document '{}' already exists", key)),
            Some(rev) => PortError::Conflict(format!("document '{}' is no longer at revision {}", key, rev)),
        })
    }

    async fn remove(&self, key: &str) -> PortResult<Option<Profile>> {
        let body: Option<Json<Profile>> =
            sqlx::query_scalar::<_, Json<Profile>>("DELETE FROM profile_documents WHERE key = $1 RETURNING body")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(unexpected)?;

        Ok(body.map(|Json(profile)| profile))
    }

    async fn ping(&self) -> PortResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
