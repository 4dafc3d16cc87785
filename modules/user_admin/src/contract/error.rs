use thiserror::Error;

/// Errors that are safe to expose to other modules.
/// The message is the user-facing text, reproduced verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserAdminError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("Internal error")]
    Internal,
}

impl UserAdminError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for UserAdminError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::ErrorKind;
        match domain_error.kind() {
            ErrorKind::NotFound => Self::not_found(domain_error.to_string()),
            ErrorKind::BadRequest => Self::bad_request(domain_error.to_string()),
            ErrorKind::Internal => Self::internal(),
        }
    }
}
