use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::api::problem::{Problem, ProblemResponse};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id stored in request extensions by the ingress middleware.
#[derive(Clone, Debug)]
pub struct XRequestId(pub String);

/// Per-request facts handlers need when reporting a problem.
#[derive(Clone, Debug)]
pub struct RequestMeta {
    pub path: String,
    pub request_id: Option<String>,
}

impl RequestMeta {
    /// Stamp `instance` and `traceId` onto a problem built from a domain error.
    pub fn problem(&self, problem: Problem) -> ProblemResponse {
        let problem = problem.with_instance(self.path.clone());
        match &self.request_id {
            Some(id) => problem.with_trace_id(id.clone()).into(),
            None => problem.into(),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .extensions
            .get::<XRequestId>()
            .map(|x| x.0.clone())
            .or_else(|| {
                parts
                    .headers
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            });

        Ok(Self {
            path: parts.uri.path().to_string(),
            request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn meta_for(req: Request<()>) -> RequestMeta {
        let (mut parts, _) = req.into_parts();
        RequestMeta::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn extension_wins_over_header() {
        let mut req = Request::builder()
            .uri("/users/7?x=1")
            .header(REQUEST_ID_HEADER, "from-header")
            .body(())
            .unwrap();
        req.extensions_mut().insert(XRequestId("from-ext".into()));

        let meta = meta_for(req).await;
        assert_eq!(meta.path, "/users/7");
        assert_eq!(meta.request_id.as_deref(), Some("from-ext"));
    }

    #[tokio::test]
    async fn header_is_used_without_extension() {
        let req = Request::builder()
            .uri("/profiles")
            .header(REQUEST_ID_HEADER, "abc")
            .body(())
            .unwrap();
        assert_eq!(meta_for(req).await.request_id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn problem_gets_instance_and_trace_id() {
        let req = Request::builder()
            .uri("/users/9")
            .header(REQUEST_ID_HEADER, "rid-1")
            .body(())
            .unwrap();
        let meta = meta_for(req).await;

        let resp = meta.problem(Problem::new(StatusCode::NOT_FOUND, "Not Found", "gone"));
        assert_eq!(resp.0.instance, "/users/9");
        assert_eq!(resp.0.trace_id.as_deref(), Some("rid-1"));
    }
}
