use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::UserAdminApi,
    error::UserAdminError,
    model::{NewProfile, NewUser, Profile, ProfilePatch, User, UserPatch},
};
use crate::domain::service::{ProfilesService, UsersService};

/// Local implementation of the UserAdminApi trait that delegates to the domain services
pub struct UserAdminLocalClient {
    profiles: Arc<ProfilesService>,
    users: Arc<UsersService>,
}

impl UserAdminLocalClient {
    pub fn new(profiles: Arc<ProfilesService>, users: Arc<UsersService>) -> Self {
        Self { profiles, users }
    }
}

#[async_trait]
impl UserAdminApi for UserAdminLocalClient {
    async fn list_profiles(&self) -> Result<Vec<Profile>, UserAdminError> {
        self.profiles.find_all().await.map_err(Into::into)
    }

    async fn get_profile(&self, id: &str) -> Result<Profile, UserAdminError> {
        self.profiles.find_one(id).await.map_err(Into::into)
    }

    async fn create_profile(&self, new_profile: NewProfile) -> Result<Profile, UserAdminError> {
        self.profiles.create(new_profile).await.map_err(Into::into)
    }

    async fn update_profile(
        &self,
        id: &str,
        patch: ProfilePatch,
    ) -> Result<Profile, UserAdminError> {
        self.profiles.update(id, patch).await.map_err(Into::into)
    }

    async fn delete_profile(&self, id: &str) -> Result<(), UserAdminError> {
        self.profiles.remove(id).await.map_err(Into::into)
    }

    async fn list_users(&self) -> Result<Vec<User>, UserAdminError> {
        self.users.find_all().await.map_err(Into::into)
    }

    async fn get_user(&self, id: &str) -> Result<User, UserAdminError> {
        self.users.find_one(id).await.map_err(Into::into)
    }

    async fn list_users_by_profile(&self, profile_id: &str) -> Result<Vec<User>, UserAdminError> {
        self.users
            .find_by_profile(profile_id)
            .await
            .map_err(Into::into)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserAdminError> {
        self.users.create(new_user).await.map_err(Into::into)
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, UserAdminError> {
        self.users.update(id, patch).await.map_err(Into::into)
    }

    async fn delete_user(&self, id: &str) -> Result<(), UserAdminError> {
        self.users.remove(id).await.map_err(Into::into)
    }

    async fn set_user_active(&self, id: &str, active: bool) -> Result<User, UserAdminError> {
        self.users
            .set_active_status(id, active)
            .await
            .map_err(Into::into)
    }
}
