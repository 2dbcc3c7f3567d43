//! Core types for the violation detection engine: configuration and errors.

pub mod config;
pub mod errors;

pub use config::{ConfigError, EngineConfig};
pub use errors::{EngineError, EngineResult, Stage};
