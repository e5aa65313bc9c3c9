//! I2C bus abstractions
//!
//! Provides traits for I2C master operations that can be implemented
//! by platform-specific HALs, plus the 7-bit device address type used
//! throughout the configuration.

use core::fmt;
use core::str::FromStr;

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// The bus device could not be opened
    Open,
    /// Bus error (misplaced start/stop)
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received (nothing answering at the address)
    Nack,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}

impl fmt::Display for I2cBusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            I2cBusError::Open => "bus could not be opened",
            I2cBusError::Bus => "bus error",
            I2cBusError::ArbitrationLost => "arbitration lost",
            I2cBusError::Nack => "no acknowledge from device",
            I2cBusError::Overrun => "overrun",
            I2cBusError::Other => "i2c error",
        };
        f.write_str(msg)
    }
}

/// I2C bus master
///
/// The display only ever writes, so this is all a bus has to offer.
pub trait I2cBus {
    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: BusAddress, data: &[u8]) -> Result<(), I2cBusError>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    fn write(&mut self, address: BusAddress, data: &[u8]) -> Result<(), I2cBusError> {
        (**self).write(address, data)
    }
}

/// Opens I2C buses by number
///
/// On Linux bus `n` is `/dev/i2c-n`. The returned bus is owned by the caller
/// and released when dropped.
pub trait I2cBusProvider {
    /// Bus handle type
    type Bus: I2cBus;

    /// Open bus number `bus`
    fn open(&mut self, bus: u8) -> Result<Self::Bus, I2cBusError>;
}

/// Largest valid 7-bit address
const MAX_ADDRESS: u8 = 0x7F;

/// 7-bit I2C device address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusAddress(u8);

impl BusAddress {
    /// Default SSD1306 address (SA0 low)
    pub const SSD1306_DEFAULT: Self = Self(0x3C);

    /// Create an address, rejecting values outside the 7-bit range
    pub const fn new(raw: u8) -> Result<Self, AddressError> {
        if raw > MAX_ADDRESS {
            Err(AddressError::OutOfRange)
        } else {
            Ok(Self(raw))
        }
    }

    /// Raw 7-bit address
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Parse a hex-encoded address such as `"0x3c"`, `"0X3D"` or `"3c"`
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let text = text.trim();
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);

        if digits.is_empty() {
            return Err(AddressError::Empty);
        }

        let raw = u16::from_str_radix(digits, 16).map_err(|_| AddressError::NotHex)?;
        if raw > MAX_ADDRESS as u16 {
            return Err(AddressError::OutOfRange);
        }
        Ok(Self(raw as u8))
    }
}

impl Default for BusAddress {
    fn default() -> Self {
        Self::SSD1306_DEFAULT
    }
}

impl FromStr for BusAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// Reasons an address string was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Nothing after the optional `0x` prefix
    Empty,
    /// Contains non-hex characters
    NotHex,
    /// Larger than 0x7F
    OutOfRange,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            AddressError::Empty => "empty address",
            AddressError::NotHex => "address is not hexadecimal",
            AddressError::OutOfRange => "address is outside the 7-bit range",
        };
        f.write_str(msg)
    }
}
