//! HTTP API helpers shared by REST modules.

pub mod problem;
pub mod request;

pub use request::{RequestMeta, XRequestId, REQUEST_ID_HEADER};
