//! Error types for the CodeRelay protocol layer.

mod capture;
mod driver;
mod kind;

pub use capture::*;
pub use driver::*;
pub use kind::*;
