//! In-process storage. All state is volatile and lives as long as the module.

pub mod entity;
pub mod mapper;
pub mod memory;
pub mod seed;

pub use memory::{InMemoryProfilesRepository, InMemoryUsersRepository};
