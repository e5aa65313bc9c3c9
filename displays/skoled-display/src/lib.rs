//! SSD1306 display support for skoled
//!
//! This crate provides:
//! - [`FrameBuffer`], a page-organised 128x64 buffer that is an
//!   embedded-graphics `DrawTarget` and knows how to lay out wrapped text
//! - [`Ssd1306`], a blocking I2C driver implementing `OledDisplay`
//! - [`Ssd1306Opener`], which opens a panel on a numbered bus per render
//!   cycle and hands it back initialised
//!
//! # Architecture
//!
//! The driver only sees the `I2cBus` trait from `skoled-hal`, so the same
//! code runs against Linux `/dev/i2c-*` devices and against recording
//! buses in tests.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod framebuffer;
pub mod ssd1306;

// Re-export key types
pub use framebuffer::{FrameBuffer, HEIGHT, PAGES, WIDTH};
pub use ssd1306::{Ssd1306, Ssd1306Opener};
