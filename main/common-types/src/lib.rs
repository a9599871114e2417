//! Value types shared by the probe engine and the chunk patcher.
//!
//! All types validate their range on construction, so code receiving them can rely on it.
mod errors;
mod normalized_value;
mod probe_steps;

pub use errors::*;
pub use normalized_value::*;
pub use probe_steps::*;
