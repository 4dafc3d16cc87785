use axum::{body::Body, http::Request, routing::get, Router};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use utoipa::OpenApi;

use crate::{
    context::{ModuleCtx, ModuleCtxBuilder},
    contracts::{Module, RestHostModule, RestfulModule, StatefulModule},
    registry::{ModuleEntry, RegistryBuilder, RegistryError},
};

type CallTracker = Arc<Mutex<Vec<String>>>;

struct TestModule {
    name: &'static str,
    calls: CallTracker,
}

#[async_trait::async_trait]
impl Module for TestModule {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let scoped = ctx.current_module().unwrap_or("?").to_string();
        self.calls
            .lock()
            .unwrap()
            .push(format!("init:{}:{scoped}", self.name));
        Ok(())
    }
}

#[utoipa::path(get, path = "/ping", responses((status = 200, description = "pong")))]
async fn ping() -> &'static str {
    "pong"
}

#[derive(OpenApi)]
#[openapi(paths(ping))]
struct PingDoc;

impl RestfulModule for TestModule {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("rest:{}", self.name));
        Ok(router.route("/ping", get(ping)))
    }

    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(PingDoc::openapi())
    }
}

struct TestHost {
    calls: CallTracker,
    paths_seen: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Module for TestHost {
    async fn init(&self, _ctx: &ModuleCtx) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push("init:host".into());
        Ok(())
    }
}

impl RestHostModule for TestHost {
    fn rest_prepare(&self, _ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router> {
        self.calls.lock().unwrap().push("prepare".into());
        Ok(router.route("/health", get(|| async { "ok" })))
    }

    fn rest_finalize(
        &self,
        _ctx: &ModuleCtx,
        router: Router,
        openapi: utoipa::openapi::OpenApi,
    ) -> anyhow::Result<Router> {
        self.calls.lock().unwrap().push("finalize".into());
        *self.paths_seen.lock().unwrap() = openapi.paths.paths.keys().cloned().collect();
        Ok(router)
    }
}

#[async_trait::async_trait]
impl StatefulModule for TestHost {
    async fn start(&self, _cancel: CancellationToken) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push("start".into());
        Ok(())
    }

    async fn stop(&self, _cancel: CancellationToken) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push("stop".into());
        Ok(())
    }
}

fn base_ctx() -> ModuleCtx {
    ModuleCtxBuilder::new(CancellationToken::new()).build()
}

#[tokio::test]
async fn phases_run_in_order_and_compose_router() {
    let calls: CallTracker = Arc::default();
    let host = Arc::new(TestHost {
        calls: calls.clone(),
        paths_seen: Mutex::default(),
    });
    let users = Arc::new(TestModule {
        name: "users",
        calls: calls.clone(),
    });

    let registry = RegistryBuilder::default()
        .register(
            ModuleEntry::new("host", host.clone())
                .with_rest_host(host.clone())
                .with_stateful(host.clone()),
        )
        .register(ModuleEntry::new("users", users.clone()).with_rest(users))
        .build()
        .unwrap();

    let ctx = base_ctx();
    registry.run_init_phase(&ctx).await.unwrap();
    let router = registry.run_rest_phase(&ctx, Router::new()).unwrap();
    registry
        .run_start_phase(CancellationToken::new())
        .await
        .unwrap();
    registry.run_stop_phase(CancellationToken::new()).await;

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "init:host",
            "init:users:users",
            "prepare",
            "rest:users",
            "finalize",
            "start",
            "stop"
        ]
    );
    assert_eq!(*host.paths_seen.lock().unwrap(), vec!["/ping".to_string()]);

    let resp = router
        .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), axum::http::StatusCode::OK);
}

#[test]
fn rest_without_host_is_rejected() {
    let calls: CallTracker = Arc::default();
    let users = Arc::new(TestModule {
        name: "users",
        calls,
    });
    let err = RegistryBuilder::default()
        .register(ModuleEntry::new("users", users.clone()).with_rest(users))
        .build()
        .unwrap_err();
    assert!(matches!(err, RegistryError::RestRequiresHost));
}

#[test]
fn duplicate_names_are_rejected() {
    let calls: CallTracker = Arc::default();
    let a = Arc::new(TestModule {
        name: "a",
        calls: calls.clone(),
    });
    let b = Arc::new(TestModule { name: "a", calls });
    let err = RegistryBuilder::default()
        .register(ModuleEntry::new("a", a))
        .register(ModuleEntry::new("a", b))
        .build()
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateModule("a")));
}

#[tokio::test]
async fn run_stops_when_token_is_cancelled() {
    let calls: CallTracker = Arc::default();
    let host = Arc::new(TestHost {
        calls: calls.clone(),
        paths_seen: Mutex::default(),
    });
    let registry = RegistryBuilder::default()
        .register(
            ModuleEntry::new("host", host.clone())
                .with_rest_host(host.clone())
                .with_stateful(host),
        )
        .build()
        .unwrap();

    struct NoConfig;
    impl crate::context::ConfigProvider for NoConfig {
        fn get_module_config(&self, _module_name: &str) -> Option<&serde_json::Value> {
            None
        }
    }

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(crate::run(crate::RunOptions {
        modules_cfg: Arc::new(NoConfig),
        registry,
        shutdown: crate::ShutdownOptions::Token(cancel.clone()),
    }));

    cancel.cancel();
    handle.await.unwrap().unwrap();
    assert_eq!(calls.lock().unwrap().last().map(String::as_str), Some("stop"));
}
