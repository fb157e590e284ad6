//! Pan/zoom view model
//!
//! Pure state and math; no windowing or GPU types appear here so the whole
//! interaction model can be exercised without a display.

mod state;
mod transform;

pub use state::*;
pub use transform::*;
