//! Linux-specific HAL for skoled
//!
//! Implements the `skoled-hal` bus traits on top of the kernel's i2c-dev
//! interface, so the display driver can talk to an OLED wired to a
//! Raspberry Pi header (bus 1 on every board since the model B rev 2).
//!
//! # Usage
//!
//! ```ignore
//! let mut provider = LinuxI2cProvider::new();
//! let bus = provider.open(1)?; // /dev/i2c-1
//! ```

pub mod i2c;

pub use i2c::{LinuxI2c, LinuxI2cProvider};
