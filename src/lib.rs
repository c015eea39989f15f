//! Entertainment engine library crate
//!
//! Re-exports core modules for the binary, integration tests and external use.

pub mod config;
pub mod error;
pub mod recommendation;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use recommendation::*;
