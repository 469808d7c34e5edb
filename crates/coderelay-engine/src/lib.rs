//! # CodeRelay Engine
//!
//! The automation core. An [`Engine`] owns three cooperating loops that share
//! one controlled page session:
//!
//! - **scan** samples the source, extracts a candidate and promotes it to the
//!   current target when it differs from the last candidate seen;
//! - **repeat** keeps sending the submit signal while a target exists;
//! - **reset** periodically reloads the page and re-injects the target.
//!
//! Loops are tokio tasks stopped through a shared cancellation token. Every
//! per-iteration failure is logged and swallowed; only configuration errors
//! and a failed session open surface from [`Engine::start`].

mod config;
mod context;
mod engine;
mod error;
mod extractor;
mod gate;
mod registry;
mod repeat;
mod reset;
mod scan;
mod state;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use extractor::{KeywordExtractor, PatternExtractor, extractor_for};
pub use gate::GatedDriver;
pub use registry::{Consideration, TargetRegistry};
pub use state::{EngineState, EngineStatus};
