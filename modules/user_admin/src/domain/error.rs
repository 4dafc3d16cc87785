use thiserror::Error;

/// How an error surfaces to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Internal,
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Profile with ID {id} not found")]
    ProfileNotFound { id: String },

    /// A user refers to a profile that does not exist.
    #[error("Profile with ID {id} not found")]
    UnknownProfile { id: String },

    #[error("User with ID {id} not found")]
    UserNotFound { id: String },

    #[error("User with email {email} already exists")]
    EmailAlreadyExists { email: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn profile_not_found(id: impl Into<String>) -> Self {
        Self::ProfileNotFound { id: id.into() }
    }

    pub fn unknown_profile(id: impl Into<String>) -> Self {
        Self::UnknownProfile { id: id.into() }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProfileNotFound { .. } | Self::UserNotFound { .. } => ErrorKind::NotFound,
            Self::UnknownProfile { .. } | Self::EmailAlreadyExists { .. } => {
                ErrorKind::BadRequest
            }
            Self::Storage { .. } => ErrorKind::Internal,
        }
    }
}
