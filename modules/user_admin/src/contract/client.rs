use async_trait::async_trait;

use crate::contract::{
    error::UserAdminError,
    model::{NewProfile, NewUser, Profile, ProfilePatch, User, UserPatch},
};

/// Public API trait for the user_admin module that other modules can use
#[async_trait]
pub trait UserAdminApi: Send + Sync {
    /// List all profiles in insertion order
    async fn list_profiles(&self) -> Result<Vec<Profile>, UserAdminError>;

    async fn get_profile(&self, id: &str) -> Result<Profile, UserAdminError>;

    async fn create_profile(&self, new_profile: NewProfile) -> Result<Profile, UserAdminError>;

    async fn update_profile(
        &self,
        id: &str,
        patch: ProfilePatch,
    ) -> Result<Profile, UserAdminError>;

    /// Permanently delete a profile
    async fn delete_profile(&self, id: &str) -> Result<(), UserAdminError>;

    /// List live users, each with its profile attached when it still exists
    async fn list_users(&self) -> Result<Vec<User>, UserAdminError>;

    async fn get_user(&self, id: &str) -> Result<User, UserAdminError>;

    /// Live users assigned to an existing profile
    async fn list_users_by_profile(&self, profile_id: &str) -> Result<Vec<User>, UserAdminError>;

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserAdminError>;

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, UserAdminError>;

    /// Soft-delete a user
    async fn delete_user(&self, id: &str) -> Result<(), UserAdminError>;

    async fn set_user_active(&self, id: &str, active: bool) -> Result<User, UserAdminError>;
}
