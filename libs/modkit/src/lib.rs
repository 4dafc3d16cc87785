//! # ModKit - small module kit
//!
//! Building blocks shared by the server modules:
//!
//! - **Contracts**: `Module` (wiring), `RestfulModule` (routes + OpenAPI),
//!   `RestHostModule` (the single HTTP host) and `StatefulModule` (background work).
//! - **Context**: `ModuleCtx` gives each module its own typed config section.
//! - **Registry**: explicit registration, ordered phases init → REST → start → stop.
//! - **Problem**: RFC 9457 error responses used by every REST handler.
//!
//! ## Example
//!
//! ```rust,ignore
//! let registry = RegistryBuilder::default()
//!     .register(
//!         ModuleEntry::new("api_ingress", ingress.clone())
//!             .with_rest_host(ingress.clone())
//!             .with_stateful(ingress),
//!     )
//!     .register(ModuleEntry::new("user_admin", users.clone()).with_rest(users))
//!     .build()?;
//!
//! modkit::run(RunOptions { modules_cfg, registry, shutdown: ShutdownOptions::Signals }).await
//! ```

pub use anyhow::Result;
pub use async_trait::async_trait;

// Core module contracts and traits
pub mod contracts;
pub use crate::contracts::*;

pub mod context;
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};

pub mod registry;
pub use registry::{ModuleEntry, ModuleRegistry, RegistryBuilder, RegistryError};

// HTTP API helpers
pub mod api;
pub use api::{RequestMeta, XRequestId};
pub use api::problem::{
    bad_request, internal_error, not_found, Problem, ProblemResponse, ValidationError,
    APPLICATION_PROBLEM_JSON,
};

pub mod runtime;
pub use runtime::{run, RunOptions, ShutdownOptions};

#[cfg(test)]
mod tests;
