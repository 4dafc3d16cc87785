use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::contract::model::{Profile, User};
use crate::domain::repo::{ProfilesRepository, UsersRepository};
use crate::infra::storage::entity::{ProfileEntity, UserEntity};
use crate::infra::storage::mapper::{
    profile_to_contract, profile_to_entity, user_to_contract, user_to_entity,
};

/// Profiles kept in insertion order, with a private id sequence.
pub struct InMemoryProfilesRepository {
    rows: RwLock<Vec<ProfileEntity>>,
    // Last issued id
    seq: AtomicU64,
}

impl InMemoryProfilesRepository {
    pub fn new() -> Self {
        Self::with_profiles(Vec::new())
    }

    /// Start from `profiles`; fresh ids continue after the highest numeric one.
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        let last = profiles
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            rows: RwLock::new(profiles.into_iter().map(profile_to_entity).collect()),
            seq: AtomicU64::new(last),
        }
    }
}

impl Default for InMemoryProfilesRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfilesRepository for InMemoryProfilesRepository {
    async fn list(&self) -> anyhow::Result<Vec<Profile>> {
        Ok(self.rows.read().iter().map(profile_to_contract).collect())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Profile>> {
        Ok(self
            .rows
            .read()
            .iter()
            .find(|p| p.id == id)
            .map(profile_to_contract))
    }

    async fn next_id(&self) -> anyhow::Result<String> {
        let next = self
            .seq
            .fetch_add(1, Ordering::SeqCst)
            .checked_add(1)
            .ok_or_else(|| anyhow::anyhow!("profile id sequence exhausted"))?;
        Ok(next.to_string())
    }

    async fn insert(&self, p: Profile) -> anyhow::Result<()> {
        let mut rows = self.rows.write();
        if rows.iter().any(|row| row.id == p.id) {
            anyhow::bail!("profile id {} already stored", p.id);
        }
        rows.push(profile_to_entity(p));
        Ok(())
    }

    async fn update(&self, p: Profile) -> anyhow::Result<bool> {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|row| row.id == p.id) {
            Some(row) => {
                *row = profile_to_entity(p);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let mut rows = self.rows.write();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() != before)
    }
}

/// Users kept in insertion order. Soft-deleted rows stay in the vector,
/// so the same id may appear once live and any number of times deleted.
#[derive(Default)]
pub struct InMemoryUsersRepository {
    rows: RwLock<Vec<UserEntity>>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            rows: RwLock::new(users.into_iter().map(user_to_entity).collect()),
        }
    }

    /// Every stored row, deleted ones included.
    pub fn stored_len(&self) -> usize {
        self.rows.read().len()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn list_live(&self) -> anyhow::Result<Vec<User>> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|u| u.is_live())
            .map(user_to_contract)
            .collect())
    }

    async fn find_live(&self, id: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .rows
            .read()
            .iter()
            .find(|u| u.is_live() && u.id == id)
            .map(user_to_contract))
    }

    async fn list_live_by_profile(&self, profile_id: &str) -> anyhow::Result<Vec<User>> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|u| u.is_live() && u.profile_id == profile_id)
            .map(user_to_contract)
            .collect())
    }

    async fn email_taken(&self, email: &str, except_id: Option<&str>) -> anyhow::Result<bool> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|u| u.is_live() && Some(u.id.as_str()) != except_id)
            .any(|u| u.email == email))
    }

    async fn insert(&self, u: User) -> anyhow::Result<()> {
        let mut rows = self.rows.write();
        if rows.iter().any(|row| row.is_live() && row.id == u.id) {
            anyhow::bail!("live user id {} already stored", u.id);
        }
        rows.push(user_to_entity(u));
        Ok(())
    }

    async fn update(&self, u: User) -> anyhow::Result<bool> {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|row| row.is_live() && row.id == u.id) {
            Some(row) => {
                *row = user_to_entity(u);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: &str, at: DateTime<Utc>) -> anyhow::Result<bool> {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|row| row.is_live() && row.id == id) {
            Some(row) => {
                row.deleted_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> Profile {
        Profile {
            id: id.into(),
            name: name.into(),
        }
    }

    fn user(id: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            email: email.into(),
            is_active: true,
            profile_id: "1".into(),
            profile: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn profile_sequence_continues_after_seeded_ids() {
        let repo = InMemoryProfilesRepository::with_profiles(vec![
            profile("1", "Administrador"),
            profile("3", "Moderador"),
            profile("abc", "Custom"),
        ]);
        assert_eq!(repo.next_id().await.unwrap(), "4");
        assert_eq!(repo.next_id().await.unwrap(), "5");
    }

    #[tokio::test]
    async fn profile_ids_are_not_reused_after_delete() {
        let repo = InMemoryProfilesRepository::new();
        let id = repo.next_id().await.unwrap();
        repo.insert(profile(&id, "Temp")).await.unwrap();
        assert!(repo.delete(&id).await.unwrap());
        assert_ne!(repo.next_id().await.unwrap(), id);
    }

    #[tokio::test]
    async fn profile_delete_and_update_report_missing_rows() {
        let repo = InMemoryProfilesRepository::new();
        assert!(!repo.delete("9").await.unwrap());
        assert!(!repo.update(profile("9", "Nobody")).await.unwrap());
    }

    #[tokio::test]
    async fn soft_deleted_rows_are_kept_but_hidden() {
        let repo = InMemoryUsersRepository::with_users(vec![user("1", "a@x.com")]);
        assert!(repo.soft_delete("1", Utc::now()).await.unwrap());

        assert_eq!(repo.stored_len(), 1);
        assert!(repo.list_live().await.unwrap().is_empty());
        assert!(repo.find_live("1").await.unwrap().is_none());
        assert!(!repo.soft_delete("1", Utc::now()).await.unwrap());
        assert!(!repo.email_taken("a@x.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn reused_id_targets_the_live_row() {
        let repo = InMemoryUsersRepository::with_users(vec![user("1", "old@x.com")]);
        repo.soft_delete("1", Utc::now()).await.unwrap();
        repo.insert(user("1", "new@x.com")).await.unwrap();

        let mut changed = user("1", "newer@x.com");
        changed.is_active = false;
        assert!(repo.update(changed).await.unwrap());

        let live = repo.find_live("1").await.unwrap().unwrap();
        assert_eq!(live.email, "newer@x.com");
        assert_eq!(repo.stored_len(), 2);
    }

    #[tokio::test]
    async fn email_check_can_exclude_one_id() {
        let repo = InMemoryUsersRepository::with_users(vec![user("1", "a@x.com")]);
        assert!(repo.email_taken("a@x.com", None).await.unwrap());
        assert!(!repo.email_taken("a@x.com", Some("1")).await.unwrap());
        assert!(!repo.email_taken("A@x.com", None).await.unwrap());
    }
}
