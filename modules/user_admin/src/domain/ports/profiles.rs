use async_trait::async_trait;

use crate::contract::model::Profile;
use crate::domain::error::DomainError;

/// Output port: how the user store reaches the profile store.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// The profile with `id`, or `DomainError::ProfileNotFound`.
    async fn find_profile(&self, id: &str) -> Result<Profile, DomainError>;
}
