use axum::http::{header, HeaderValue, Method};
use regex::Regex;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ApiIngressConfig;

#[derive(Debug, Error)]
pub enum CorsConfigError {
    #[error("invalid CORS origin pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Origin policy: exact origins plus anchored regular expressions.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    exact: Vec<String>,
    patterns: Vec<Regex>,
}

impl OriginPolicy {
    pub fn from_config(cfg: &ApiIngressConfig) -> Result<Self, CorsConfigError> {
        let patterns = cfg
            .cors_allowed_origin_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| CorsConfigError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            exact: cfg
                .cors_allowed_origins
                .iter()
                .map(|o| o.trim_end_matches('/').to_string())
                .collect(),
            patterns,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.patterns.is_empty()
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.exact.iter().any(|o| o == origin) || self.patterns.iter().any(|p| p.is_match(origin))
    }
}

/// Build the CORS layer for the ingress router.
///
/// - disabled: `None`
/// - enabled with no origins and no patterns: permissive
/// - otherwise: only the listed origins / patterns, with credentials
pub fn build_cors_layer(cfg: &ApiIngressConfig) -> Result<Option<CorsLayer>, CorsConfigError> {
    if !cfg.cors_enabled {
        return Ok(None);
    }

    let policy = OriginPolicy::from_config(cfg)?;
    if policy.is_empty() {
        tracing::warn!("CORS enabled without an origin list; allowing any origin");
        return Ok(Some(CorsLayer::permissive()));
    }

    let layer = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts| {
                let allowed = origin.to_str().is_ok_and(|o| policy.allows(o));
                if !allowed {
                    tracing::debug!(origin = ?origin, "CORS origin rejected");
                }
                allowed
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Ok(Some(layer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> ApiIngressConfig {
        ApiIngressConfig {
            cors_enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn default_policy_matches_known_frontends() {
        let policy = OriginPolicy::from_config(&enabled()).unwrap();
        assert!(policy.allows("http://localhost:3001"));
        assert!(policy.allows("https://admin-ui.vercel.app"));
        assert!(policy.allows("https://api.onrender.com"));
        assert!(!policy.allows("http://localhost:4000"));
        assert!(!policy.allows("https://vercel.app.evil.com"));
    }

    #[test]
    fn trailing_slash_in_config_is_ignored() {
        let cfg = ApiIngressConfig {
            cors_allowed_origins: vec!["https://admin.example.com/".into()],
            cors_allowed_origin_patterns: vec![],
            ..enabled()
        };
        let policy = OriginPolicy::from_config(&cfg).unwrap();
        assert!(policy.allows("https://admin.example.com"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let cfg = ApiIngressConfig {
            cors_allowed_origin_patterns: vec!["(".into()],
            ..enabled()
        };
        let err = build_cors_layer(&cfg).unwrap_err();
        assert!(err.to_string().contains("invalid CORS origin pattern"));
    }

    #[test]
    fn disabled_yields_no_layer() {
        assert!(build_cors_layer(&ApiIngressConfig::default())
            .unwrap()
            .is_none());
    }
}
