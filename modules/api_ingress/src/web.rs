use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
};
use modkit::{Problem, ProblemResponse, RequestMeta};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Fallback for unmatched routes, rendered as a problem like every other error.
pub async fn route_not_found(meta: RequestMeta) -> ProblemResponse {
    let detail = format!("Cannot find route {}", meta.path);
    meta.problem(
        Problem::new(StatusCode::NOT_FOUND, "Not Found", detail)
            .with_type("https://errors.example.com/ROUTE_NOT_FOUND")
            .with_code("ROUTE_NOT_FOUND"),
    )
}

pub async fn openapi_json(
    Extension(doc): Extension<Arc<utoipa::openapi::OpenApi>>,
) -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], Json((*doc).clone()))
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>User Admin API</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}
