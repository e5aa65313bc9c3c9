//! I2C bus driver for Linux
//!
//! Provides I2C communication for peripherals like the SSD1306 OLED display
//! through `/dev/i2c-N` character devices.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use linux_embedded_hal::I2cdev;
use log::debug;
use skoled_hal::{BusAddress, I2cBus, I2cBusError, I2cBusProvider};

/// Default device node prefix; bus `n` lives at `/dev/i2c-n`
pub const DEFAULT_DEVICE_PREFIX: &str = "/dev/i2c-";

/// An open i2c-dev bus
pub struct LinuxI2c {
    dev: I2cdev,
}

impl LinuxI2c {
    /// Open the bus at `path`
    pub fn open(path: &str) -> Result<Self, I2cBusError> {
        let dev = I2cdev::new(path).map_err(|e| {
            debug!("opening {} failed: {}", path, e);
            I2cBusError::Open
        })?;
        Ok(Self { dev })
    }
}

impl I2cBus for LinuxI2c {
    fn write(&mut self, address: BusAddress, data: &[u8]) -> Result<(), I2cBusError> {
        self.dev
            .write(address.get(), data)
            .map_err(|e| map_error_kind(e.kind()))
    }
}

/// Opens `/dev/i2c-N` buses
#[derive(Debug, Clone)]
pub struct LinuxI2cProvider {
    prefix: String,
}

impl Default for LinuxI2cProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxI2cProvider {
    /// Provider for the standard `/dev/i2c-N` nodes
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_DEVICE_PREFIX)
    }

    /// Provider for a non-standard device node prefix
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
        }
    }

    /// Device node path for bus number `bus`
    pub fn device_path(&self, bus: u8) -> String {
        format!("{}{}", self.prefix, bus)
    }
}

impl I2cBusProvider for LinuxI2cProvider {
    type Bus = LinuxI2c;

    fn open(&mut self, bus: u8) -> Result<Self::Bus, I2cBusError> {
        LinuxI2c::open(&self.device_path(bus))
    }
}

/// Map an embedded-hal error kind onto the bus error taxonomy
fn map_error_kind(kind: ErrorKind) -> I2cBusError {
    match kind {
        ErrorKind::Bus => I2cBusError::Bus,
        ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
        ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
        ErrorKind::Overrun => I2cBusError::Overrun,
        _ => I2cBusError::Other,
    }
}
