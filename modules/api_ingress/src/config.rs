use serde::{Deserialize, Serialize};

/// API ingress configuration (`modules.api_ingress`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// `host:port` to listen on; the server section fills this in when absent.
    #[serde(default)]
    pub bind_addr: Option<String>,
    /// Serve `/openapi.json` and `/docs`.
    #[serde(default)]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    /// Exact origins allowed by CORS.
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
    /// Regular expressions matched against the whole `Origin` header.
    #[serde(default = "default_cors_allowed_origin_patterns")]
    pub cors_allowed_origin_patterns: Vec<String>,
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

fn default_cors_allowed_origins() -> Vec<String> {
    (3000..=3002)
        .map(|port| format!("http://localhost:{port}"))
        .collect()
}

fn default_cors_allowed_origin_patterns() -> Vec<String> {
    vec![
        r"^https?://.+\.vercel\.app$".to_string(),
        r"^https?://.+\.onrender\.com$".to_string(),
    ]
}

fn default_request_timeout_sec() -> u64 {
    30
}

fn default_body_limit_bytes() -> usize {
    1024 * 1024
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: None,
            enable_docs: false,
            cors_enabled: false,
            cors_allowed_origins: default_cors_allowed_origins(),
            cors_allowed_origin_patterns: default_cors_allowed_origin_patterns(),
            request_timeout_sec: default_request_timeout_sec(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl ApiIngressConfig {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }
}
