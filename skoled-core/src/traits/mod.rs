//! Hardware and host abstraction traits
//!
//! These traits define the interface between the sampling/render logic
//! and the display hardware on one side, the telemetry host on the other.

pub mod display;
pub mod source;

pub use display::{DisplayError, DisplayOpener, OledDisplay, TextStyle};
pub use source::{DataSource, PathValue};
