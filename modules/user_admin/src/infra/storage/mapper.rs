use crate::contract::model::{Profile, User};
use crate::infra::storage::entity::{ProfileEntity, UserEntity};

pub fn profile_to_contract(entity: &ProfileEntity) -> Profile {
    Profile {
        id: entity.id.clone(),
        name: entity.name.clone(),
    }
}

pub fn profile_to_entity(profile: Profile) -> ProfileEntity {
    ProfileEntity {
        id: profile.id,
        name: profile.name,
    }
}

/// Convert a stored row to a contract model without a profile attached.
pub fn user_to_contract(entity: &UserEntity) -> User {
    User {
        id: entity.id.clone(),
        first_name: entity.first_name.clone(),
        last_name: entity.last_name.clone(),
        email: entity.email.clone(),
        is_active: entity.is_active,
        profile_id: entity.profile_id.clone(),
        profile: None,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
        deleted_at: entity.deleted_at,
    }
}

/// Drops any attached profile; it is never persisted.
pub fn user_to_entity(user: User) -> UserEntity {
    UserEntity {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        is_active: user.is_active,
        profile_id: user.profile_id,
        created_at: user.created_at,
        updated_at: user.updated_at,
        deleted_at: user.deleted_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn attached_profile_is_not_persisted() {
        let now = Utc::now();
        let user = User {
            id: "1".into(),
            first_name: "Ana".into(),
            last_name: "Costa".into(),
            email: "ana@example.com".into(),
            is_active: true,
            profile_id: "1".into(),
            profile: Some(Profile {
                id: "1".into(),
                name: "Administrador".into(),
            }),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let back = user_to_contract(&user_to_entity(user.clone()));
        assert_eq!(back.profile, None);
        assert_eq!(back.email, user.email);
        assert_eq!(back.created_at, now);
    }
}
