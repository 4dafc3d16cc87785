use async_trait::async_trait;
use axum::Router;
use tokio_util::sync::CancellationToken;

/// Core module: DI/wiring. Runs first, before any routes exist.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    async fn init(&self, ctx: &crate::context::ModuleCtx) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs AFTER init.
pub trait RestfulModule: Send + Sync {
    fn register_rest(
        &self,
        ctx: &crate::context::ModuleCtx,
        router: Router,
    ) -> anyhow::Result<Router>;

    /// OpenAPI fragment describing the routes added in `register_rest`.
    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        None
    }
}

/// REST host module: owns the base router and the merged API document.
/// Must be sync and must NOT start the server; that happens in `StatefulModule::start`.
pub trait RestHostModule: Send + Sync + 'static {
    /// Prepare a base Router (e.g. `/health`) before modules add their routes.
    fn rest_prepare(
        &self,
        ctx: &crate::context::ModuleCtx,
        router: Router,
    ) -> anyhow::Result<Router>;

    /// Finalize: attach the OpenAPI document, global middleware, and keep the Router.
    fn rest_finalize(
        &self,
        ctx: &crate::context::ModuleCtx,
        router: Router,
        openapi: utoipa::openapi::OpenApi,
    ) -> anyhow::Result<Router>;
}

#[async_trait]
pub trait StatefulModule: Send + Sync {
    async fn start(&self, cancel: CancellationToken) -> anyhow::Result<()>;
    async fn stop(&self, cancel: CancellationToken) -> anyhow::Result<()>;
}
