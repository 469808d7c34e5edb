//! Value types flowing between sources, the engine and the driver.

mod observation;
mod region;
mod rule;

pub use observation::*;
pub use region::*;
pub use rule::*;
