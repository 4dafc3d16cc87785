use std::sync::Arc;

use modkit::{Module, ModuleCtxBuilder, RestHostModule, StatefulModule};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use api_ingress::ApiIngress;

struct IngressConfig(serde_json::Value);

impl modkit::ConfigProvider for IngressConfig {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        (module_name == "api_ingress").then_some(&self.0)
    }
}

#[tokio::test]
#[tracing_test::traced_test]
async fn serves_health_and_stops_on_cancel() {
    let cancel = CancellationToken::new();
    let ctx = ModuleCtxBuilder::new(cancel.clone())
        .with_config_provider(Arc::new(IngressConfig(serde_json::json!({
            "bind_addr": "127.0.0.1:0"
        }))))
        .build()
        .for_module("api_ingress");

    let ingress = ApiIngress::default();
    ingress.init(&ctx).await.unwrap();
    let router = ingress.rest_prepare(&ctx, axum::Router::new()).unwrap();
    ingress
        .rest_finalize(&ctx, router, utoipa::openapi::OpenApiBuilder::new().build())
        .unwrap();
    ingress.start(cancel.clone()).await.unwrap();

    let addr = ingress.local_addr().expect("bound address");
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {raw}");
    assert!(raw.contains("healthy"));

    ingress.stop(cancel).await.unwrap();
    assert!(logs_contain("HTTP server bound on"));
}

#[tokio::test]
async fn invalid_bind_addr_fails_start() {
    let ingress = ApiIngress::new(api_ingress::ApiIngressConfig {
        bind_addr: Some("not-an-address".into()),
        ..Default::default()
    });
    let err = ingress.start(CancellationToken::new()).await.unwrap_err();
    assert!(err.to_string().contains("Invalid bind address"));
}
