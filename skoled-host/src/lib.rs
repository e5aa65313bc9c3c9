//! Linux host for the skoled OLED renderer
//!
//! Wires the board-agnostic core to a real machine: TOML configuration,
//! a Signal K delta store fed from a stream, and a tokio timer driving the
//! render cycle against an SSD1306 on `/dev/i2c-N`.

pub mod config;
pub mod lifecycle;
pub mod signalk;

pub use config::{load_default, load_from_path, ConfigLoadError};
pub use lifecycle::Controller;
pub use signalk::{pump_deltas, DeltaError, SignalKStore};
