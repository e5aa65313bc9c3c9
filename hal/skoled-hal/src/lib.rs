//! skoled Hardware Abstraction Layer
//!
//! This crate defines the bus traits the display driver is written against,
//! so the same driver code runs on a Raspberry Pi (`/dev/i2c-N`) or on any
//! board that can provide a blocking I2C master.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  skoled-display (SSD1306 driver)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  skoled-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ skoled-hal-   │
//!             │    linux      │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`i2c::I2cBusProvider`] - Open a bus by its number

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;

// Re-export key types at crate root for convenience
pub use i2c::{AddressError, BusAddress, I2cBus, I2cBusError, I2cBusProvider};
