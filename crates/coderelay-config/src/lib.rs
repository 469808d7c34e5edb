//! # CodeRelay Config
//!
//! TOML configuration for the relay: schema with defaults, a loader that
//! expands `${VAR}` references, and a validator that reports path-tagged
//! errors and warnings.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
