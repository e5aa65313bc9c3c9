//! Configuration type definitions
//!
//! These types mirror the plugin's settings. The host deserialises them from
//! TOML; defaults match what the display shows out of the box.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::render::Layout;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of slots a configuration may declare
pub const MAX_SLOTS: usize = 8;

/// Default refresh rate in seconds
pub const DEFAULT_REFRESH_RATE_S: f64 = 5.0;

/// Default I2C bus number (`/dev/i2c-1` on a Raspberry Pi)
pub const DEFAULT_BUS_NUMBER: u8 = 1;

/// Default SSD1306 address
pub const DEFAULT_BUS_ADDRESS: &str = "0x3c";

/// One display line: which path to show and how
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotConfig {
    /// Signal K path, e.g. `navigation.speedOverGround`
    pub path: String,
    /// Label printed before the value
    #[cfg_attr(feature = "serde", serde(default))]
    pub short_code: String,
    /// Added to numeric values before the multiplier
    #[cfg_attr(feature = "serde", serde(default = "default_offset"))]
    pub offset: f64,
    /// Applied to numeric values after the offset
    #[cfg_attr(feature = "serde", serde(default = "default_multiplier"))]
    pub multiplier: f64,
    /// Inactive slots are sampled but never drawn
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    pub active: bool,
}

#[cfg(feature = "serde")]
fn default_offset() -> f64 {
    0.0
}

#[cfg(feature = "serde")]
fn default_multiplier() -> f64 {
    1.0
}

#[cfg(feature = "serde")]
fn default_active() -> bool {
    true
}

impl SlotConfig {
    /// Active slot with no transform
    pub fn new(path: &str, short_code: &str) -> Self {
        Self {
            path: path.to_string(),
            short_code: short_code.to_string(),
            offset: 0.0,
            multiplier: 1.0,
            active: true,
        }
    }

    /// Set the offset
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the multiplier
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set whether the slot is drawn
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Which bus and device the display sits on
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BusConfig {
    /// I2C bus number
    pub number: u8,
    /// Hex-encoded 7-bit address, e.g. `"0x3c"`
    pub address: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            number: DEFAULT_BUS_NUMBER,
            address: DEFAULT_BUS_ADDRESS.to_string(),
        }
    }
}

/// Complete plugin configuration, as read from the config file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PluginConfig {
    /// Seconds between render cycles
    pub refresh_rate_seconds: f64,
    /// Display bus
    pub bus: BusConfig,
    /// Screen layout
    pub layout: Layout,
    /// Display lines, top to bottom
    pub slots: Vec<SlotConfig>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            refresh_rate_seconds: DEFAULT_REFRESH_RATE_S,
            bus: BusConfig::default(),
            layout: Layout::default(),
            slots: default_slots(),
        }
    }
}

/// Out-of-the-box slots: course, speed, position, outside temperature
pub fn default_slots() -> Vec<SlotConfig> {
    alloc::vec![
        SlotConfig::new("navigation.courseOverGroundTrue", "COG (rad)"),
        SlotConfig::new("navigation.speedOverGround", "SOG (m/s)"),
        SlotConfig::new("navigation.position", "POS"),
        SlotConfig::new("environment.outside.temperature", "TEMP (K)"),
    ]
}
