//! Fixed screen layout
//!
//! Slots are stacked vertically at a fixed column. With the defaults on a
//! 128x64 panel the four lines sit at y = 18, 28, 38 and 48, leaving the top
//! band free. Each slot owns the `row_spacing` rows below its position, and
//! text is clipped to that band.

use crate::traits::TextStyle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where and how slot lines are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Layout {
    /// Left edge of every line
    pub column_x: u8,
    /// Top of the first slot's line
    pub first_row_y: u8,
    /// Vertical distance between consecutive slots
    pub row_spacing: u8,
    /// Font size multiplier
    pub font_size: u8,
    /// Wrap width in pixels, capped at the panel edge
    pub wrap_width_px: u8,
    /// Wrap long lines instead of clipping them
    pub wrap: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            column_x: 1,
            first_row_y: 18,
            row_spacing: 10,
            font_size: 1,
            wrap_width_px: 127,
            wrap: true,
        }
    }
}

impl Layout {
    /// Cursor position for the slot at zero-based `index`
    pub fn position(&self, index: usize) -> (u8, u8) {
        let offset = (self.row_spacing as usize).saturating_mul(index);
        let y = (self.first_row_y as usize).saturating_add(offset);
        (self.column_x, y.min(u8::MAX as usize) as u8)
    }

    /// Style passed to every text write
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            size: self.font_size,
            max_width_px: self.wrap_width_px,
            max_height_px: self.row_spacing,
            wrap: self.wrap,
        }
    }
}
