use chrono::{DateTime, Utc};

/// Stored profile row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntity {
    pub id: String,
    pub name: String,
}

/// Stored user row. The profile is resolved on read and never kept here.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEntity {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub profile_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl UserEntity {
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}
