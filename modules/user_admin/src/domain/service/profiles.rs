use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::contract::model::{NewProfile, Profile, ProfilePatch};
use crate::domain::error::DomainError;
use crate::domain::ports::ProfileLookup;
use crate::domain::repo::ProfilesRepository;

/// Profile store. Leaf service: no other domain dependencies.
pub struct ProfilesService {
    repo: Arc<dyn ProfilesRepository>,
    // Serializes read-modify-write sequences
    write_lock: Mutex<()>,
}

impl ProfilesService {
    pub fn new(repo: Arc<dyn ProfilesRepository>) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    #[instrument(name = "user_admin.service.create_profile", skip(self), fields(name = %new_profile.name))]
    pub async fn create(&self, new_profile: NewProfile) -> Result<Profile, DomainError> {
        info!("Creating new profile");
        let _guard = self.write_lock.lock().await;

        let id = self
            .repo
            .next_id()
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        let profile = Profile {
            id,
            name: new_profile.name,
        };

        self.repo
            .insert(profile.clone())
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        info!("Successfully created profile with id={}", profile.id);
        Ok(profile)
    }

    #[instrument(name = "user_admin.service.list_profiles", skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Profile>, DomainError> {
        let profiles = self
            .repo
            .list()
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        debug!("Listed {} profiles", profiles.len());
        Ok(profiles)
    }

    #[instrument(name = "user_admin.service.get_profile", skip(self), fields(profile_id = %id))]
    pub async fn find_one(&self, id: &str) -> Result<Profile, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?
            .ok_or_else(|| DomainError::profile_not_found(id))
    }

    #[instrument(name = "user_admin.service.update_profile", skip(self, patch), fields(profile_id = %id))]
    pub async fn update(&self, id: &str, patch: ProfilePatch) -> Result<Profile, DomainError> {
        info!("Updating profile");
        let _guard = self.write_lock.lock().await;

        let mut current = self.find_one(id).await?;
        if let Some(name) = patch.name {
            current.name = name;
        }

        let updated = self
            .repo
            .update(current.clone())
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        if !updated {
            return Err(DomainError::profile_not_found(id));
        }

        info!("Successfully updated profile");
        Ok(current)
    }

    #[instrument(name = "user_admin.service.delete_profile", skip(self), fields(profile_id = %id))]
    pub async fn remove(&self, id: &str) -> Result<(), DomainError> {
        info!("Deleting profile");
        let _guard = self.write_lock.lock().await;

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;
        if !deleted {
            return Err(DomainError::profile_not_found(id));
        }

        info!("Successfully deleted profile");
        Ok(())
    }
}

#[async_trait]
impl ProfileLookup for ProfilesService {
    async fn find_profile(&self, id: &str) -> Result<Profile, DomainError> {
        self.find_one(id).await
    }
}
