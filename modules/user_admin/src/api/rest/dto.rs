use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::contract::model::{NewProfile, NewUser, Profile, ProfilePatch, User, UserPatch};

/// REST DTO for profile representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProfileReq {
    #[serde(default)]
    #[schema(required = true)]
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileReq {
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: Option<String>,
}

/// REST DTO for user representation; `profile` is present when it could be resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub profile_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// REST DTO for creating a new user. Missing strings are caught by validation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserReq {
    #[serde(default)]
    #[schema(required = true)]
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub first_name: String,

    #[serde(default)]
    #[schema(required = true)]
    #[validate(length(min = 1, message = "Sobrenome é obrigatório"))]
    pub last_name: String,

    #[serde(default)]
    #[schema(required = true)]
    #[validate(
        length(min = 1, message = "Email é obrigatório"),
        email(message = "Email deve ser um endereço de email válido")
    )]
    pub email: String,

    #[serde(default)]
    #[schema(required = true)]
    #[validate(length(min = 1, message = "Perfil é obrigatório"))]
    pub profile_id: String,

    /// Ignored: new users always start active.
    pub is_active: Option<bool>,
}

/// REST DTO for updating a user (partial)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Email deve ser um endereço de email válido"))]
    pub email: Option<String>,
    pub profile_id: Option<String>,
    pub is_active: Option<bool>,
}

// Conversion implementations between REST DTOs and contract models

impl From<Profile> for ProfileDto {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
        }
    }
}

impl From<CreateProfileReq> for NewProfile {
    fn from(req: CreateProfileReq) -> Self {
        Self { name: req.name }
    }
}

impl From<UpdateProfileReq> for ProfilePatch {
    fn from(req: UpdateProfileReq) -> Self {
        Self { name: req.name }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_active: user.is_active,
            profile_id: user.profile_id,
            profile: user.profile.map(ProfileDto::from),
            created_at: user.created_at,
            updated_at: user.updated_at,
            deleted_at: user.deleted_at,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            profile_id: req.profile_id,
            is_active: req.is_active,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            profile_id: req.profile_id,
            is_active: req.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_dto_uses_camel_case_and_hides_absent_fields() {
        let now = Utc::now();
        let dto = UserDto::from(User {
            id: "4".into(),
            first_name: "Ana".into(),
            last_name: "Costa".into(),
            email: "ana@x.com".into(),
            is_active: true,
            profile_id: "1".into(),
            profile: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["firstName"], "Ana");
        assert_eq!(v["profileId"], "1");
        assert_eq!(v["isActive"], true);
        assert!(v.get("profile").is_none());
        assert!(v.get("deletedAt").is_none());
    }

    #[test]
    fn create_user_rejects_unknown_fields() {
        let err = serde_json::from_value::<CreateUserReq>(json!({
            "firstName": "Ana",
            "lastName": "Costa",
            "email": "ana@x.com",
            "profileId": "1",
            "role": "admin"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("role"));
    }

    #[test]
    fn create_user_reports_every_missing_field() {
        let req: CreateUserReq = serde_json::from_value(json!({})).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 4);
        assert!(fields.keys().any(|k| k.to_string() == "profile_id"));
    }

    #[test]
    fn update_user_checks_email_only_when_present() {
        assert!(UpdateUserReq::default().validate().is_ok());

        let bad = UpdateUserReq {
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        let messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect();
        assert_eq!(messages, vec!["Email deve ser um endereço de email válido"]);
    }

    #[test]
    fn empty_profile_name_is_invalid_on_update() {
        let req = UpdateProfileReq {
            name: Some(String::new()),
        };
        assert!(req.validate().is_err());
    }
}
