//! Page-organised frame buffer
//!
//! 1 bit per pixel, 8 vertical pixels per byte, one 128-byte row per page:
//! the layout the controller expects on the wire. Glyphs are rasterised
//! through embedded-graphics so any mono font can be used.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTargetExt;
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_5X7};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use skoled_core::{DisplayError, TextStyle};

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
pub const PAGES: usize = HEIGHT / 8;

/// Gap between glyphs
const LETTER_SPACING: u32 = 1;

/// Extra space between wrapped lines
const LINE_LEADING: u32 = 3;

/// In-memory copy of the panel
#[derive(Clone)]
pub struct FrameBuffer {
    pages: [[u8; WIDTH]; PAGES],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Create a blank buffer
    pub const fn new() -> Self {
        Self {
            pages: [[0; WIDTH]; PAGES],
        }
    }

    /// Turn every pixel off
    pub fn clear_all(&mut self) {
        for page in self.pages.iter_mut() {
            page.fill(0);
        }
    }

    /// Raw bytes of one page
    pub fn page(&self, page: usize) -> Option<&[u8; WIDTH]> {
        self.pages.get(page)
    }

    /// Read back one pixel
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.pages[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Set or clear one pixel; out of range is ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let bit = 1 << (y % 8);
        if on {
            self.pages[y / 8][x] |= bit;
        } else {
            self.pages[y / 8][x] &= !bit;
        }
    }

    /// Whether any pixel is lit
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|page| page.iter().all(|&b| b == 0))
    }

    /// Draw `text` with its top-left at `origin`
    ///
    /// Wrapping happens only at spaces: a word that would cross the right
    /// limit (`origin.x + max_width_px`, capped at the panel edge) starts a
    /// new line at `origin.x`, unless it is already the first word on its
    /// line. Words are never split. Pixels past the panel edge or below
    /// `origin.y + max_height_px` are clipped, so a wrapped tail never
    /// reaches the rows under the text's band. Returns where the next write
    /// continues.
    pub fn draw_text(
        &mut self,
        origin: (u8, u8),
        text: &str,
        style: &TextStyle,
    ) -> Result<(u8, u8), DisplayError> {
        let font = font_for(style.size)?;
        let advance = font.character_size.width + LETTER_SPACING;
        let line_height = font.character_size.height + LINE_LEADING;

        let left = origin.0 as u32;
        let right = if style.wrap {
            (left + style.max_width_px as u32).min(WIDTH as u32)
        } else {
            u32::MAX
        };

        let band = Rectangle::new(
            Point::new(0, origin.1 as i32),
            Size::new(WIDTH as u32, style.max_height_px as u32),
        );
        let mut target = self.clipped(&band);

        let character_style = MonoTextStyle::new(font, BinaryColor::On);
        let mut x = left;
        let mut y = origin.1 as u32;

        for word in split_words(text) {
            let glyphs = word.trim_end_matches(' ').chars().count() as u32;
            let word_width = (glyphs * advance).saturating_sub(LETTER_SPACING);
            let word_fits = x + word_width <= right;
            let line_has_text = x > left;
            if style.wrap && glyphs > 0 && !word_fits && line_has_text {
                x = left;
                y += line_height;
            }

            for ch in word.chars() {
                if ch == ' ' {
                    x += advance;
                    continue;
                }
                let mut utf8 = [0u8; 4];
                let glyph = ch.encode_utf8(&mut utf8);
                let point = Point::new(x as i32, y as i32);
                // Infallible target
                let _ = Text::with_baseline(glyph, point, character_style, Baseline::Top)
                    .draw(&mut target);
                x += advance;
            }
        }

        Ok((clamp_u8(x), clamp_u8(y)))
    }
}

/// Split after each space so trailing spaces stay with their word
fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(' ')
}

fn clamp_u8(value: u32) -> u8 {
    value.min(u8::MAX as u32) as u8
}

/// Font for a size hint
fn font_for(size: u8) -> Result<&'static MonoFont<'static>, DisplayError> {
    match size {
        1 => Ok(&FONT_5X7),
        2 => Ok(&FONT_10X20),
        other => Err(DisplayError::UnsupportedFontSize(other)),
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0 && coord.y >= 0 {
                self.set_pixel(coord.x as usize, coord.y as usize, color.is_on());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_in_rows(fb: &FrameBuffer, rows: core::ops::Range<usize>) -> bool {
        rows.into_iter()
            .any(|y| (0..WIDTH).any(|x| fb.pixel(x, y)))
    }

    fn no_wrap() -> TextStyle {
        TextStyle {
            wrap: false,
            ..TextStyle::default()
        }
    }

    fn narrow(max_width_px: u8) -> TextStyle {
        TextStyle {
            max_width_px,
            max_height_px: u8::MAX,
            ..TextStyle::default()
        }
    }

    #[test]
    fn test_set_pixel_page_layout() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(3, 9, true);
        assert_eq!(fb.page(1).unwrap()[3], 0b0000_0010);
        assert!(fb.pixel(3, 9));

        fb.set_pixel(3, 9, false);
        assert!(fb.is_blank());
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(WIDTH, 0, true);
        fb.set_pixel(0, HEIGHT, true);
        assert!(fb.is_blank());
        assert!(fb.page(PAGES).is_none());
    }

    #[test]
    fn test_text_at_cursor() {
        let mut fb = FrameBuffer::new();
        let next = fb.draw_text((1, 18), "SOG: 1.235", &no_wrap()).unwrap();

        assert!(lit_in_rows(&fb, 18..25));
        assert!(!lit_in_rows(&fb, 0..18));
        assert!(!lit_in_rows(&fb, 25..HEIGHT));
        // Column 0 stays dark, text starts at x = 1
        assert!((0..HEIGHT).all(|y| !fb.pixel(0, y)));
        assert_eq!(next, (1 + 10 * 6, 18));
    }

    #[test]
    fn test_slot_line_fits_on_one_row() {
        let mut fb = FrameBuffer::new();
        let next = fb
            .draw_text((1, 18), "COG (rad): 1.234", &TextStyle::default())
            .unwrap();

        assert_eq!(next, (1 + 16 * 6, 18));
        assert!(lit_in_rows(&fb, 18..25));
        assert!(!lit_in_rows(&fb, 25..HEIGHT));
    }

    #[test]
    fn test_wraps_at_word_boundary() {
        let mut fb = FrameBuffer::new();
        let next = fb.draw_text((1, 18), "SOG: 1.235", &narrow(26)).unwrap();

        // "SOG: " fills the first line, "1.235" continues one line below
        assert_eq!(next, (1 + 5 * 6, 28));
        assert!(lit_in_rows(&fb, 28..35));
    }

    #[test]
    fn test_wrapped_tail_clipped_to_band() {
        let mut fb = FrameBuffer::new();
        let style = TextStyle {
            max_width_px: 26,
            ..TextStyle::default()
        };
        let next = fb.draw_text((1, 18), "SOG: 1.235", &style).unwrap();

        // Cursor still moves, but nothing lands below the 10 px band
        assert_eq!(next, (1 + 5 * 6, 28));
        assert!(lit_in_rows(&fb, 18..25));
        assert!(!lit_in_rows(&fb, 28..HEIGHT));
    }

    #[test]
    fn test_long_word_not_split() {
        let mut fb = FrameBuffer::new();
        let next = fb.draw_text((0, 0), "ABCD", &narrow(12)).unwrap();
        assert_eq!(next, (24, 0));
    }

    #[test]
    fn test_wrapped_lines_restart_at_origin_column() {
        let mut fb = FrameBuffer::new();
        let next = fb
            .draw_text((1, 0), "LON: 24.50000 LAT: 60.25000", &narrow(26))
            .unwrap();
        // One word per line
        assert_eq!(next, (1 + 8 * 6, 30));
        assert!(lit_in_rows(&fb, 30..37));
    }

    #[test]
    fn test_wrap_limit_capped_at_panel_edge() {
        let mut fb = FrameBuffer::new();
        let text = "0123456789 0123456789 0123456789";
        let next = fb.draw_text((1, 0), text, &narrow(255)).unwrap();
        assert_eq!(next.1, 10);
    }

    #[test]
    fn test_unsupported_font_size() {
        let mut fb = FrameBuffer::new();
        let style = TextStyle {
            size: 7,
            ..TextStyle::default()
        };
        assert_eq!(
            fb.draw_text((0, 0), "x", &style),
            Err(DisplayError::UnsupportedFontSize(7))
        );
        assert!(fb.is_blank());
    }

    #[test]
    fn test_clear_all() {
        let mut fb = FrameBuffer::new();
        fb.draw_text((0, 0), "HDG", &no_wrap()).unwrap();
        assert!(!fb.is_blank());
        fb.clear_all();
        assert!(fb.is_blank());
    }
}
