//! Backend-agnostic persistence interface for users and their saved profiles.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::profile::Profile;

/// Display-name parts supplied by the transport. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Storage for users and the history of their computed profiles.
///
/// Profiles are append-only; the newest one per user is the current one.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    /// Return the internal id for `external_id`, creating the user on first
    /// sight. Names are only recorded at creation.
    async fn get_or_create_user(
        &self,
        external_id: &str,
        info: &UserInfo,
    ) -> Result<i64, DatabaseError>;

    /// Append a profile row for an existing user.
    async fn save_parameters(&self, user_id: i64, profile: &Profile) -> Result<(), DatabaseError>;

    /// Most recent profile for the user, if any.
    async fn get_latest_parameters(
        &self,
        external_id: &str,
    ) -> Result<Option<Profile>, DatabaseError>;

    /// Whether the user has at least one saved profile.
    async fn has_profile(&self, external_id: &str) -> Result<bool, DatabaseError>;
}
