use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::contract::model::{NewUser, Profile, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::ids::next_user_id;
use crate::domain::ports::ProfileLookup;
use crate::domain::repo::UsersRepository;

/// User store. Validates profile references and attaches profiles on read.
pub struct UsersService {
    repo: Arc<dyn UsersRepository>,
    profiles: Arc<dyn ProfileLookup>,
    // Serializes read-modify-write sequences
    write_lock: Mutex<()>,
}

impl UsersService {
    pub fn new(repo: Arc<dyn UsersRepository>, profiles: Arc<dyn ProfileLookup>) -> Self {
        Self {
            repo,
            profiles,
            write_lock: Mutex::new(()),
        }
    }

    #[instrument(
        name = "user_admin.service.create_user",
        skip(self),
        fields(email = %new_user.email, profile_id = %new_user.profile_id)
    )]
    pub async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");
        let _guard = self.write_lock.lock().await;

        self.require_profile(&new_user.profile_id).await?;

        if self
            .repo
            .email_taken(&new_user.email, None)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
        {
            return Err(DomainError::email_already_exists(new_user.email));
        }

        let live = self
            .repo
            .list_live()
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        let id = next_user_id(live.iter().map(|u| u.id.as_str()));

        let now = Utc::now();
        let user = User {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            is_active: true,
            profile_id: new_user.profile_id,
            profile: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.repo
            .insert(user.clone())
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        info!("Successfully created user with id={}", user.id);
        Ok(self.enrich(user).await)
    }

    #[instrument(name = "user_admin.service.list_users", skip(self))]
    pub async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let users = self
            .repo
            .list_live()
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        debug!("Listed {} users", users.len());
        Ok(self.enrich_all(users).await)
    }

    #[instrument(name = "user_admin.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn find_one(&self, id: &str) -> Result<User, DomainError> {
        let user = self.load_live(id).await?;
        Ok(self.enrich(user).await)
    }

    /// Live users of an existing profile. A missing profile is `NotFound`.
    #[instrument(name = "user_admin.service.list_users_by_profile", skip(self), fields(profile_id = %profile_id))]
    pub async fn find_by_profile(&self, profile_id: &str) -> Result<Vec<User>, DomainError> {
        self.profiles.find_profile(profile_id).await?;

        let users = self
            .repo
            .list_live_by_profile(profile_id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        debug!("Found {} users for profile", users.len());
        Ok(self.enrich_all(users).await)
    }

    #[instrument(name = "user_admin.service.update_user", skip(self, patch), fields(user_id = %id))]
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");
        let _guard = self.write_lock.lock().await;

        let mut current = self.load_live(id).await?;

        if let Some(profile_id) = patch.profile_id.as_deref() {
            self.require_profile(profile_id).await?;
        }

        if let Some(email) = patch.email.as_deref() {
            if self
                .repo
                .email_taken(email, Some(id))
                .await
                .map_err(|e| DomainError::storage(e.to_string()))?
            {
                return Err(DomainError::email_already_exists(email));
            }
        }

        if let Some(first_name) = patch.first_name {
            current.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            current.last_name = last_name;
        }
        if let Some(email) = patch.email {
            current.email = email;
        }
        if let Some(profile_id) = patch.profile_id {
            current.profile_id = profile_id;
        }
        if let Some(is_active) = patch.is_active {
            current.is_active = is_active;
        }
        current.updated_at = Utc::now();

        self.store(current.clone()).await?;

        info!("Successfully updated user");
        Ok(self.enrich(current).await)
    }

    /// Soft delete: the record stays stored but disappears from every read.
    #[instrument(name = "user_admin.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn remove(&self, id: &str) -> Result<(), DomainError> {
        info!("Deleting user");
        let _guard = self.write_lock.lock().await;

        let deleted = self
            .repo
            .soft_delete(id, Utc::now())
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    #[instrument(name = "user_admin.service.set_active_status", skip(self), fields(user_id = %id, active))]
    pub async fn set_active_status(&self, id: &str, active: bool) -> Result<User, DomainError> {
        info!("Changing user active status");
        let _guard = self.write_lock.lock().await;

        let mut current = self.load_live(id).await?;
        current.is_active = active;
        current.updated_at = Utc::now();

        self.store(current.clone()).await?;
        Ok(self.enrich(current).await)
    }

    async fn load_live(&self, id: &str) -> Result<User, DomainError> {
        self.repo
            .find_live(id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    async fn store(&self, user: User) -> Result<(), DomainError> {
        let id = user.id.clone();
        let updated = self
            .repo
            .update(user)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        if updated {
            Ok(())
        } else {
            Err(DomainError::user_not_found(id))
        }
    }

    /// A reference to a missing profile is the caller's mistake, not a missing resource.
    async fn require_profile(&self, profile_id: &str) -> Result<Profile, DomainError> {
        match self.profiles.find_profile(profile_id).await {
            Ok(profile) => Ok(profile),
            Err(DomainError::ProfileNotFound { id }) => Err(DomainError::UnknownProfile { id }),
            Err(other) => Err(other),
        }
    }

    /// The user's current profile, if it can be found.
    async fn profile_of(&self, user: &User) -> Option<Profile> {
        match self.profiles.find_profile(&user.profile_id).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                debug!(user_id = %user.id, "Profile enrichment skipped: {}", e);
                None
            }
        }
    }

    async fn enrich(&self, mut user: User) -> User {
        user.profile = self.profile_of(&user).await;
        user
    }

    async fn enrich_all(&self, users: Vec<User>) -> Vec<User> {
        let mut out = Vec::with_capacity(users.len());
        for user in users {
            out.push(self.enrich(user).await);
        }
        out
    }
}
