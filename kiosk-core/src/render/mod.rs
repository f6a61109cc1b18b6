//! Drawing surface abstraction and the scene painter.
//!
//! The panel driver implements [`Renderer`]; everything above it paints in
//! terms of rectangles, text runs, and 32x32 bitmaps.

#[cfg(feature = "graphics")]
pub mod graphics;
pub mod icons;
mod scenes;

pub use icons::Bitmap;
pub use scenes::{paint, paint_button, paint_flash, paint_pin_entry, paint_service_time, paint_wait_time};

use core::convert::Infallible;

use crate::screen::Rect;
use crate::touch::ScreenPoint;

/// 16-bit 5-6-5 colour as sent to the panel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const BLUE: Self = Self(0x001F);
    pub const YELLOW: Self = Self(0xFFE0);
    pub const CYAN: Self = Self(0x07FF);
    pub const MAGENTA: Self = Self(0xF81F);
    pub const NAVY: Self = Self(0x000F);
    pub const DARK_GREY: Self = Self(0x7BEF);
    pub const LIGHT_GREY: Self = Self(0xC618);

    /// Packs 8-bit channels, dropping the low bits.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        let r = ((r as u16) >> 3) << 11;
        let g = ((g as u16) >> 2) << 5;
        let b = (b as u16) >> 3;
        Self(r | g | b)
    }

    /// Expands back to 8-bit channels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 11) & 0x1F) as u8;
        let g = ((self.0 >> 5) & 0x3F) as u8;
        let b = (self.0 & 0x1F) as u8;
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }
}

pub const USER_BACKGROUND: Rgb565 = Rgb565::WHITE;
pub const ADMIN_BACKGROUND: Rgb565 = Rgb565::NAVY;

/// Font scale. Glyph cells are fixed so layout can centre text without the font.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextSize {
    Normal,
    Large,
}

impl TextSize {
    #[must_use]
    pub const fn glyph_width(self) -> u16 {
        match self {
            TextSize::Normal => 6,
            TextSize::Large => 10,
        }
    }

    #[must_use]
    pub const fn glyph_height(self) -> u16 {
        match self {
            TextSize::Normal => 10,
            TextSize::Large => 20,
        }
    }

    /// Pixel width of `text` rendered at this size.
    #[must_use]
    pub fn text_width(self, text: &str) -> u16 {
        u16::try_from(text.chars().count())
            .unwrap_or(u16::MAX)
            .saturating_mul(self.glyph_width())
    }
}

/// Pixel sink for the kiosk display.
pub trait Renderer {
    type Error;

    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), Self::Error>;

    /// One-pixel outline of `rect`.
    fn draw_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), Self::Error>;

    fn draw_pixel(&mut self, point: ScreenPoint, color: Rgb565) -> Result<(), Self::Error>;

    /// Draws `text` with its top-left corner at `cursor`.
    fn draw_text(
        &mut self,
        cursor: ScreenPoint,
        text: &str,
        size: TextSize,
        color: Rgb565,
    ) -> Result<(), Self::Error>;

    fn draw_bitmap(&mut self, origin: ScreenPoint, bitmap: &Bitmap) -> Result<(), Self::Error>;
}

/// Renderer that discards everything and counts calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullRenderer {
    pub calls: usize,
}

impl Renderer for NullRenderer {
    type Error = Infallible;

    fn fill_rect(&mut self, _rect: Rect, _color: Rgb565) -> Result<(), Self::Error> {
        self.calls += 1;
        Ok(())
    }

    fn draw_rect(&mut self, _rect: Rect, _color: Rgb565) -> Result<(), Self::Error> {
        self.calls += 1;
        Ok(())
    }

    fn draw_pixel(&mut self, _point: ScreenPoint, _color: Rgb565) -> Result<(), Self::Error> {
        self.calls += 1;
        Ok(())
    }

    fn draw_text(
        &mut self,
        _cursor: ScreenPoint,
        _text: &str,
        _size: TextSize,
        _color: Rgb565,
    ) -> Result<(), Self::Error> {
        self.calls += 1;
        Ok(())
    }

    fn draw_bitmap(&mut self, _origin: ScreenPoint, _bitmap: &Bitmap) -> Result<(), Self::Error> {
        self.calls += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb888_packing_matches_palette() {
        assert_eq!(Rgb565::from_rgb888(255, 0, 0), Rgb565::RED);
        assert_eq!(Rgb565::from_rgb888(255, 255, 255), Rgb565::WHITE);
        assert_eq!(Rgb565::from_rgb888(0, 255, 255), Rgb565::CYAN);
        assert_eq!(Rgb565::YELLOW.to_rgb888(), (255, 255, 0));
    }

    #[test]
    fn text_width_counts_glyphs() {
        assert_eq!(TextSize::Normal.text_width("OK"), 12);
        assert_eq!(TextSize::Large.text_width("#001"), 40);
    }
}
