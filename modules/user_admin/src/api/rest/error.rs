use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    Json,
};
use modkit::api::problem::{Problem, ProblemResponse, ValidationError};
use modkit::RequestMeta;
use validator::{Validate, ValidationErrors};

use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    meta: &RequestMeta,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code);
    meta.problem(problem)
}

/// Map domain error to RFC9457 ProblemResponse. `detail` is the domain message verbatim.
pub fn map_domain_error(e: &DomainError, meta: &RequestMeta) -> ProblemResponse {
    match e {
        DomainError::ProfileNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "PROFILE_NOT_FOUND",
            "Profile not found",
            e.to_string(),
            meta,
        ),
        DomainError::UnknownProfile { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "USER_PROFILE_INVALID",
            "Invalid profile",
            e.to_string(),
            meta,
        ),
        DomainError::UserNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            "User not found",
            e.to_string(),
            meta,
        ),
        DomainError::EmailAlreadyExists { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "USER_EMAIL_EXISTS",
            "Email already exists",
            e.to_string(),
            meta,
        ),
        DomainError::Storage { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Storage error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_STORAGE",
                "Internal error",
                "An internal storage error occurred",
                meta,
            )
        }
    }
}

/// Body that failed to parse: bad JSON, wrong types or unknown fields.
pub fn json_rejection(rejection: &JsonRejection, meta: &RequestMeta) -> ProblemResponse {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => from_parts(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_MEDIA_TYPE",
            "Unsupported media type",
            rejection.body_text(),
            meta,
        ),
        _ => from_parts(
            StatusCode::BAD_REQUEST,
            "INVALID_BODY",
            "Bad Request",
            rejection.body_text(),
            meta,
        ),
    }
}

/// Field-level validation failure with one entry per violated rule.
pub fn validation_failed(errors: &ValidationErrors, meta: &RequestMeta) -> ProblemResponse {
    let mut items: Vec<ValidationError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let pointer = format!("/{}", camel_case(&field.to_string()));
            errs.iter()
                .map(move |err| ValidationError {
                    detail: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                    pointer: pointer.clone(),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    items.sort_by(|a, b| a.pointer.cmp(&b.pointer));

    let detail = items
        .iter()
        .map(|i| i.detail.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    let problem = Problem::new(StatusCode::BAD_REQUEST, "Validation error", detail)
        .with_type("https://errors.example.com/VALIDATION_ERROR")
        .with_code("VALIDATION_ERROR")
        .with_errors(items);
    meta.problem(problem)
}

/// Unwrap a JSON body and run its validation rules.
pub fn validated<T: Validate>(
    payload: Result<Json<T>, JsonRejection>,
    meta: &RequestMeta,
) -> Result<T, ProblemResponse> {
    let Json(body) = payload.map_err(|rej| json_rejection(&rej, meta))?;
    body.validate().map_err(|e| validation_failed(&e, meta))?;
    Ok(body)
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> RequestMeta {
        RequestMeta {
            path: "/users/7".to_string(),
            request_id: Some("req-1".to_string()),
        }
    }

    #[test]
    fn not_found_keeps_domain_message() {
        let ProblemResponse(p) = map_domain_error(&DomainError::user_not_found("7"), &meta());
        assert_eq!(p.status, 404);
        assert_eq!(p.code, "USER_NOT_FOUND");
        assert_eq!(p.detail, "User with ID 7 not found");
        assert_eq!(p.instance, "/users/7");
        assert_eq!(p.trace_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn unknown_profile_is_a_bad_request() {
        let ProblemResponse(p) = map_domain_error(&DomainError::unknown_profile("999"), &meta());
        assert_eq!(p.status, 400);
        assert_eq!(p.detail, "Profile with ID 999 not found");
    }

    #[test]
    fn storage_details_are_hidden() {
        let ProblemResponse(p) =
            map_domain_error(&DomainError::storage("lock poisoned"), &meta());
        assert_eq!(p.status, 500);
        assert!(!p.detail.contains("poisoned"));
    }

    #[test]
    fn snake_fields_become_camel_pointers() {
        assert_eq!(camel_case("first_name"), "firstName");
        assert_eq!(camel_case("profile_id"), "profileId");
        assert_eq!(camel_case("email"), "email");
    }
}
