// Core quiz library. The terminal front end in main.rs drives it through
// `session::lifecycle`; benchmarks and integration tests import it directly.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod session;
pub mod source;
pub mod store;
