//! SSD1306 OLED Display Driver
//!
//! Driver for 128x64 SSD1306-based OLED displays via I2C. Drawing goes to
//! a local frame buffer; [`OledDisplay::flush`] pushes the whole frame.

use log::{debug, trace};

use skoled_core::{DisplayError, DisplayOpener, OledDisplay, TextStyle};
use skoled_hal::{BusAddress, I2cBus, I2cBusError, I2cBusProvider};

use crate::framebuffer::{FrameBuffer, PAGES, WIDTH};

/// Control byte: the rest of the transfer is commands
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: the rest of the transfer is display RAM
const CONTROL_DATA: u8 = 0x40;

/// Contrast used when not dimmed
const CONTRAST_NORMAL: u8 = 0xCF;
/// Contrast used when dimmed
const CONTRAST_DIM: u8 = 0x00;

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
}

/// Power-on sequence for a 128x64 panel with the internal charge pump
const INIT_SEQUENCE: &[&[u8]] = &[
    &[cmd::DISPLAY_OFF],
    &[cmd::SET_CLOCK_DIV, 0x80],
    &[cmd::SET_MUX_RATIO, 0x3F],
    &[cmd::SET_DISPLAY_OFFSET, 0x00],
    &[cmd::SET_START_LINE],
    &[cmd::SET_CHARGE_PUMP, 0x14],
    // Horizontal addressing: pages stream back to back after one window setup
    &[cmd::SET_MEMORY_MODE, 0x00],
    &[cmd::SET_SEG_REMAP],
    &[cmd::SET_COM_SCAN_DEC],
    &[cmd::SET_COM_PINS, 0x12],
    &[cmd::SET_CONTRAST, CONTRAST_NORMAL],
    &[cmd::SET_PRECHARGE, 0xF1],
    &[cmd::SET_VCOM_DETECT, 0x40],
    &[cmd::DISPLAY_RAM],
    &[cmd::SET_NORMAL],
    &[cmd::DEACTIVATE_SCROLL],
    &[cmd::DISPLAY_ON],
];

/// SSD1306 OLED driver
pub struct Ssd1306<B> {
    bus: B,
    address: BusAddress,
    frame: FrameBuffer,
    cursor: (u8, u8),
}

impl<B: I2cBus> Ssd1306<B> {
    /// Create a new SSD1306 driver; nothing is sent until [`Self::init`]
    pub fn new(bus: B, address: BusAddress) -> Self {
        Self {
            bus,
            address,
            frame: FrameBuffer::new(),
            cursor: (0, 0),
        }
    }

    /// Initialize the display
    pub fn init(&mut self) -> Result<(), I2cBusError> {
        for command in INIT_SEQUENCE {
            self.command(command)?;
        }
        debug!("ssd1306 at {} initialised", self.address);
        Ok(())
    }

    /// Send one command with up to two argument bytes
    fn command(&mut self, bytes: &[u8]) -> Result<(), I2cBusError> {
        let mut buf = [CONTROL_COMMAND; 4];
        let len = bytes.len().min(buf.len() - 1);
        buf[1..=len].copy_from_slice(&bytes[..len]);
        self.bus.write(self.address, &buf[..=len])
    }

    /// Local frame buffer
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Current text cursor
    pub fn cursor(&self) -> (u8, u8) {
        self.cursor
    }

    /// Release the bus
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: I2cBus> OledDisplay for Ssd1306<B> {
    fn power(&mut self, on: bool) -> Result<(), DisplayError> {
        let command = if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF };
        self.command(&[command])?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.frame.clear_all();
        self.cursor = (0, 0);
        Ok(())
    }

    fn dim(&mut self, on: bool) -> Result<(), DisplayError> {
        let contrast = if on { CONTRAST_DIM } else { CONTRAST_NORMAL };
        self.command(&[cmd::SET_CONTRAST, contrast])?;
        Ok(())
    }

    fn invert(&mut self, on: bool) -> Result<(), DisplayError> {
        let command = if on { cmd::SET_INVERSE } else { cmd::SET_NORMAL };
        self.command(&[command])?;
        Ok(())
    }

    fn set_cursor(&mut self, x: u8, y: u8) -> Result<(), DisplayError> {
        self.cursor = (x, y);
        Ok(())
    }

    fn write_text(&mut self, text: &str, style: &TextStyle) -> Result<(), DisplayError> {
        trace!("text at {:?}: {}", self.cursor, text);
        self.cursor = self.frame.draw_text(self.cursor, text, style)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.command(&[cmd::SET_COLUMN_ADDR, 0, (WIDTH - 1) as u8])?;
        self.command(&[cmd::SET_PAGE_ADDR, 0, (PAGES - 1) as u8])?;

        for page in 0..PAGES {
            let Some(bytes) = self.frame.page(page) else {
                continue;
            };
            let mut data = [0u8; WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(bytes);
            self.bus.write(self.address, &data)?;
        }

        Ok(())
    }
}

/// Opens SSD1306 panels on numbered I2C buses
pub struct Ssd1306Opener<P> {
    provider: P,
}

impl<P: I2cBusProvider> Ssd1306Opener<P> {
    /// Create an opener that takes buses from `provider`
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: I2cBusProvider> DisplayOpener for Ssd1306Opener<P> {
    type Display = Ssd1306<P::Bus>;

    fn open(&mut self, bus: u8, address: BusAddress) -> Result<Self::Display, DisplayError> {
        let i2c = self.provider.open(bus).map_err(DisplayError::Open)?;
        let mut display = Ssd1306::new(i2c, address);
        display.init().map_err(DisplayError::Open)?;
        Ok(display)
    }
}
