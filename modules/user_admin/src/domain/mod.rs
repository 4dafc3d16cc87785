pub mod error;
pub mod ids;
pub mod ports;
pub mod repo;
pub mod service;
