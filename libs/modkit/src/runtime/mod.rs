mod runner;
pub mod shutdown;

pub use runner::{run, RunOptions, ShutdownOptions};
