//! # Core Runtime
//!
//! Shared runtime infrastructure for the renderer and artwork crates:
//! logging initialization and the common configuration error type.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
