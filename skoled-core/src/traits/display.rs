//! Display driver traits for the monochrome OLED

use core::fmt;

use skoled_hal::{BusAddress, I2cBusError};

/// Errors that can occur while driving the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// The bus could not be opened or the panel did not take its init sequence
    Open(I2cBusError),
    /// A command or data write failed
    Communication(I2cBusError),
    /// Font size not supported by the renderer
    UnsupportedFontSize(u8),
}

impl From<I2cBusError> for DisplayError {
    fn from(e: I2cBusError) -> Self {
        DisplayError::Communication(e)
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Open(e) => write!(f, "display open failed: {}", e),
            DisplayError::Communication(e) => write!(f, "display write failed: {}", e),
            DisplayError::UnsupportedFontSize(size) => write!(f, "unsupported font size {}", size),
        }
    }
}

/// How a string is laid out by [`OledDisplay::write_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    /// Font size multiplier (1 = native 5x7 glyphs)
    pub size: u8,
    /// Wrap width in pixels, measured from the cursor column
    pub max_width_px: u8,
    /// Height of the band below the cursor the text may use; the rest is
    /// clipped
    pub max_height_px: u8,
    /// Continue on the next text row instead of clipping
    pub wrap: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 1,
            max_width_px: 127,
            max_height_px: 10,
            wrap: true,
        }
    }
}

/// A text-capable monochrome display
///
/// Drawing calls may be buffered; nothing is guaranteed to reach the panel
/// before [`OledDisplay::flush`] returns.
pub trait OledDisplay {
    /// Turn the panel on or off
    fn power(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Clear every pixel
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Dim (lowest contrast) or restore full contrast
    fn dim(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Invert or restore normal pixel polarity
    fn invert(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Move the text cursor to pixel `(x, y)`, top-left of the next glyph
    fn set_cursor(&mut self, x: u8, y: u8) -> Result<(), DisplayError>;

    /// Write `text` at the cursor and advance it
    fn write_text(&mut self, text: &str, style: &TextStyle) -> Result<(), DisplayError>;

    /// Push everything drawn so far to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;
}

impl<T: OledDisplay + ?Sized> OledDisplay for &mut T {
    fn power(&mut self, on: bool) -> Result<(), DisplayError> {
        (**self).power(on)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn dim(&mut self, on: bool) -> Result<(), DisplayError> {
        (**self).dim(on)
    }

    fn invert(&mut self, on: bool) -> Result<(), DisplayError> {
        (**self).invert(on)
    }

    fn set_cursor(&mut self, x: u8, y: u8) -> Result<(), DisplayError> {
        (**self).set_cursor(x, y)
    }

    fn write_text(&mut self, text: &str, style: &TextStyle) -> Result<(), DisplayError> {
        (**self).write_text(text, style)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        (**self).flush()
    }
}

/// Opens a display device on a bus
///
/// The returned handle is exclusive; dropping it releases the bus.
pub trait DisplayOpener {
    /// Display handle type
    type Display: OledDisplay;

    /// Open and initialise the display at `address` on bus `bus`
    fn open(&mut self, bus: u8, address: BusAddress) -> Result<Self::Display, DisplayError>;
}
