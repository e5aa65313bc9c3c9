//! Configuration validation
//!
//! Activation only starts once the configuration has been turned into an
//! [`ActivationConfig`]. Anything rejected here keeps the plugin stopped.

use core::fmt;

use heapless::Vec;
use skoled_hal::{AddressError, BusAddress};

use super::types::{PluginConfig, SlotConfig, MAX_SLOTS};
use crate::render::Layout;

/// Configuration errors that prevent activation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Refresh rate not a positive number of seconds (or rounds to 0 ms)
    InvalidRefreshRate(f64),
    /// Bus address string did not parse
    InvalidBusAddress(AddressError),
    /// More slots than the renderer supports
    TooManySlots(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRefreshRate(rate) => {
                write!(f, "refresh rate must be a positive number of seconds, got {}", rate)
            }
            ConfigError::InvalidBusAddress(e) => write!(f, "invalid bus address: {}", e),
            ConfigError::TooManySlots(count) => {
                write!(f, "{} slots configured, at most {} supported", count, MAX_SLOTS)
            }
        }
    }
}

/// Validated, immutable settings for one activation
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationConfig {
    /// Milliseconds between render cycles (always >= 1)
    pub refresh_interval_ms: u64,
    /// I2C bus number
    pub bus_number: u8,
    /// Display address on the bus
    pub address: BusAddress,
    /// Slots in display order
    pub slots: Vec<SlotConfig, MAX_SLOTS>,
    /// Screen layout
    pub layout: Layout,
}

impl PluginConfig {
    /// Validate the configuration for activation
    pub fn validate(&self) -> Result<ActivationConfig, ConfigError> {
        let refresh_interval_ms = refresh_interval_ms(self.refresh_rate_seconds)?;

        let address =
            BusAddress::parse(&self.bus.address).map_err(ConfigError::InvalidBusAddress)?;

        if self.slots.len() > MAX_SLOTS {
            return Err(ConfigError::TooManySlots(self.slots.len()));
        }
        let mut slots = Vec::new();
        for slot in &self.slots {
            // Length checked above
            let _ = slots.push(slot.clone());
        }

        Ok(ActivationConfig {
            refresh_interval_ms,
            bus_number: self.bus.number,
            address,
            slots,
            layout: self.layout,
        })
    }
}

/// Convert a refresh rate in seconds to whole milliseconds
fn refresh_interval_ms(rate_s: f64) -> Result<u64, ConfigError> {
    if !rate_s.is_finite() || rate_s <= 0.0 {
        return Err(ConfigError::InvalidRefreshRate(rate_s));
    }

    let ms = rate_s * 1000.0;
    // Round half up without libm; the cast saturates at u64::MAX
    let ms = (ms + 0.5) as u64;
    if ms == 0 {
        return Err(ConfigError::InvalidRefreshRate(rate_s));
    }
    Ok(ms)
}
