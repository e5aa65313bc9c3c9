//! Board-agnostic core logic for the skoled OLED renderer
//!
//! This crate contains everything that does not depend on a particular
//! display bus or telemetry host:
//!
//! - Hardware and host abstraction traits (display, data source)
//! - Plugin configuration and its validation
//! - Value transforms (offset/multiplier, position formatting)
//! - Slot sampling and the render cycle
//! - Lifecycle state machine

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod render;
pub mod state;
pub mod telemetry;
pub mod traits;

// Re-export key types
pub use config::{ActivationConfig, ConfigError, PluginConfig, SlotConfig};
pub use render::{render, run_cycle, CycleOutcome, Layout};
pub use state::{LifecycleEvent, LifecycleState};
pub use telemetry::{normalize, sample, sample_all, RenderState, SlotSample};
pub use traits::{DataSource, DisplayError, DisplayOpener, OledDisplay, PathValue, TextStyle};
