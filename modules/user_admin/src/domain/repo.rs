use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{Profile, User};

/// Persistence port for profiles.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ProfilesRepository: Send + Sync {
    /// All profiles in insertion order.
    async fn list(&self) -> anyhow::Result<Vec<Profile>>;
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Profile>>;
    /// Issue a fresh id from the repository's sequence; ids are never reused.
    async fn next_id(&self) -> anyhow::Result<String>;
    async fn insert(&self, p: Profile) -> anyhow::Result<()>;
    /// Replace the profile with the same id. Returns false if it is gone.
    async fn update(&self, p: Profile) -> anyhow::Result<bool>;
    /// Hard delete. Returns true if a profile was removed.
    async fn delete(&self, id: &str) -> anyhow::Result<bool>;
}

/// Persistence port for users.
///
/// "Live" means not soft-deleted; every read below sees live users only.
/// Returned users never carry a `profile`; the service attaches it.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Live users in insertion order.
    async fn list_live(&self) -> anyhow::Result<Vec<User>>;
    async fn find_live(&self, id: &str) -> anyhow::Result<Option<User>>;
    async fn list_live_by_profile(&self, profile_id: &str) -> anyhow::Result<Vec<User>>;
    /// Whether a live user other than `except_id` already uses `email`.
    async fn email_taken(&self, email: &str, except_id: Option<&str>) -> anyhow::Result<bool>;
    /// Append a fully-formed user. Service computes id/timestamps; repo persists.
    async fn insert(&self, u: User) -> anyhow::Result<()>;
    /// Replace the live user with the same id. Returns false if none.
    async fn update(&self, u: User) -> anyhow::Result<bool>;
    /// Mark the live user as deleted. Returns false if none.
    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> anyhow::Result<bool>;
}
