//! HTTP host for the server modules: base router, global middleware,
//! the merged OpenAPI document and the listening socket.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use axum::{extract::Extension, middleware::from_fn, routing::get, Router};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod cors;
pub mod request_id;
mod web;

pub use config::{ApiIngressConfig, DEFAULT_BIND_ADDR};

const STOP_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns the HTTP server (REST host) and serves one OpenAPI document for all modules.
pub struct ApiIngress {
    // Read-mostly config, swapped in on init
    config: ArcSwap<ApiIngressConfig>,
    // Router produced by the REST phase, taken by `start`
    final_router: Mutex<Option<Router>>,
    local_addr: Mutex<Option<SocketAddr>>,
    server: Mutex<Option<JoinHandle<Result<()>>>>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            final_router: Mutex::new(None),
            local_addr: Mutex::new(None),
            server: Mutex::new(None),
        }
    }

    /// Current configuration (cheap clone from ArcSwap).
    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    /// Address the server is listening on, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }

    /// Wrap `router` in the global middleware stack.
    ///
    /// Order (outermost to innermost):
    /// PropagateRequestId -> SetRequestId -> push_req_id_to_extensions -> Trace -> Timeout -> CORS -> BodyLimit
    pub fn apply_middleware(&self, mut router: Router) -> Result<Router> {
        let config = self.get_config();
        let x_request_id = crate::request_id::header();

        // Layers added later wrap the earlier ones, so innermost goes first.
        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));

        if let Some(cors) = cors::build_cors_layer(&config)? {
            router = router.layer(cors);
        }

        if config.request_timeout_sec > 0 {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_sec,
            )));
        }

        router = router
            .layer(crate::request_id::create_trace_layer())
            .layer(from_fn(crate::request_id::push_req_id_to_extensions))
            .layer(SetRequestIdLayer::new(
                x_request_id.clone(),
                crate::request_id::MakeReqId,
            ))
            .layer(PropagateRequestIdLayer::new(x_request_id));

        Ok(router)
    }

    fn take_router(&self) -> Result<Router> {
        match self.final_router.lock().take() {
            Some(r) => {
                tracing::debug!("Using router from REST phase");
                Ok(r)
            }
            None => {
                tracing::debug!("No router from REST phase, serving health only");
                self.apply_middleware(Router::new().route("/health", get(web::health_check)))
            }
        }
    }
}

#[async_trait]
impl modkit::Module for ApiIngress {
    async fn init(&self, ctx: &modkit::ModuleCtx) -> Result<()> {
        let cfg = ctx.module_config::<ApiIngressConfig>()?;
        // Fail fast on bad origin patterns rather than at serve time.
        cors::OriginPolicy::from_config(&cfg)?;
        tracing::debug!(bind_addr = %cfg.bind_addr(), docs = cfg.enable_docs, "api_ingress configured");
        self.config.store(Arc::new(cfg));
        Ok(())
    }
}

impl modkit::RestHostModule for ApiIngress {
    fn rest_prepare(&self, _ctx: &modkit::ModuleCtx, router: Router) -> Result<Router> {
        tracing::debug!("REST host prepared base router with health check");
        Ok(router.route("/health", get(web::health_check)))
    }

    fn rest_finalize(
        &self,
        _ctx: &modkit::ModuleCtx,
        mut router: Router,
        mut openapi: utoipa::openapi::OpenApi,
    ) -> Result<Router> {
        let config = self.get_config();

        if config.enable_docs {
            openapi.info = utoipa::openapi::InfoBuilder::new()
                .title("User Admin API")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some("Users and access profiles administration"))
                .build();
            tracing::info!(paths = openapi.paths.paths.len(), "Serving OpenAPI document");

            router = router
                .route(
                    "/openapi.json",
                    get(web::openapi_json).layer(Extension(Arc::new(openapi))),
                )
                .route("/docs", get(web::serve_docs));
        }

        let router = self.apply_middleware(router.fallback(web::route_not_found))?;
        *self.final_router.lock() = Some(router.clone());

        tracing::debug!("REST host finalized router");
        Ok(router)
    }
}

#[async_trait]
impl modkit::StatefulModule for ApiIngress {
    async fn start(&self, cancel: CancellationToken) -> Result<()> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr()
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", cfg.bind_addr()))?;

        let router = self.take_router()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        let bound = listener.local_addr()?;
        *self.local_addr.lock() = Some(bound);
        tracing::info!("HTTP server bound on {}", bound);

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel.cancelled().await;
                    tracing::info!("HTTP server shutting down gracefully (cancellation)");
                })
                .await
                .map_err(anyhow::Error::from)
        });
        *self.server.lock() = Some(handle);
        Ok(())
    }

    async fn stop(&self, cancel: CancellationToken) -> Result<()> {
        cancel.cancel();
        let Some(handle) = self.server.lock().take() else {
            return Ok(());
        };
        match tokio::time::timeout(STOP_TIMEOUT, handle).await {
            Ok(joined) => joined.context("HTTP server task panicked")?,
            Err(_) => anyhow::bail!("HTTP server did not stop within {:?}", STOP_TIMEOUT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use modkit::{ModuleCtxBuilder, RestHostModule};
    use tower::ServiceExt;

    fn ctx() -> modkit::ModuleCtx {
        ModuleCtxBuilder::new(CancellationToken::new())
            .build()
            .for_module("api_ingress")
    }

    fn finalized(cfg: ApiIngressConfig) -> Router {
        let ingress = ApiIngress::new(cfg);
        let router = ingress.rest_prepare(&ctx(), Router::new()).unwrap();
        ingress
            .rest_finalize(
                &ctx(),
                router,
                utoipa::openapi::OpenApiBuilder::new().build(),
            )
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_served() {
        let resp = finalized(ApiIngressConfig::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        assert_eq!(body_json(resp).await["status"], "healthy");
    }

    #[tokio::test]
    async fn unknown_route_is_a_problem() {
        let resp = finalized(ApiIngressConfig::default())
            .oneshot(
                Request::get("/nope")
                    .header("x-request-id", "rid-404")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            modkit::APPLICATION_PROBLEM_JSON
        );
        let json = body_json(resp).await;
        assert_eq!(json["code"], "ROUTE_NOT_FOUND");
        assert_eq!(json["instance"], "/nope");
        assert_eq!(json["traceId"], "rid-404");
    }

    #[tokio::test]
    async fn openapi_only_when_docs_enabled() {
        let resp = finalized(ApiIngressConfig::default())
            .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = finalized(ApiIngressConfig {
            enable_docs: true,
            ..Default::default()
        })
        .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["info"]["title"], "User Admin API");
    }

    #[tokio::test]
    async fn body_limit_is_enforced() {
        let app = finalized(ApiIngressConfig {
            body_limit_bytes: 8,
            ..Default::default()
        });
        let resp = app
            .oneshot(
                Request::post("/health")
                    .header("content-length", "64")
                    .body(Body::from(vec![b'x'; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
