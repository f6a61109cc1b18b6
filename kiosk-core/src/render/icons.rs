//! 32x32 icons expanded from 1-bit row masks at compile time.
//!
//! Each row is a `u32` with the most significant bit as the leftmost pixel.

use super::Rgb565;

pub const ICON_DIM: usize = 32;
pub const ICON_PIXELS: usize = ICON_DIM * ICON_DIM;

/// RGB565 bitmap stored row-major.
#[derive(Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u16,
    pub height: u16,
    pub pixels: &'static [Rgb565],
}

const fn expand(rows: &[u32; ICON_DIM], ink: Rgb565, paper: Rgb565) -> [Rgb565; ICON_PIXELS] {
    let mut pixels = [paper; ICON_PIXELS];
    let mut y = 0;
    while y < ICON_DIM {
        let mut x = 0;
        while x < ICON_DIM {
            if rows[y] & (1 << (31 - x)) != 0 {
                pixels[y * ICON_DIM + x] = ink;
            }
            x += 1;
        }
        y += 1;
    }
    pixels
}

#[allow(clippy::unreadable_literal)]
const GEAR_ROWS: [u32; ICON_DIM] = [
    0x00000000, 0x00000000, 0x0000F000, 0x0000F000,
    0x01C0E000, 0x03C0E000, 0x03EFF060, 0x01FFFCF0,
    0x00FFFFF0, 0x00FFFFF0, 0x01FFFFC0, 0x01FFFF80,
    0x33F81FC0, 0x3FF00FC0, 0x3FF00FC0, 0x3FF00FC0,
    0x03F00FFC, 0x03F00FFC, 0x03F00FFC, 0x03F81FCC,
    0x01FFFF80, 0x03FFFF80, 0x0FFFFF00, 0x0FFFFF00,
    0x0F3FFF80, 0x060FF7C0, 0x000703C0, 0x00070380,
    0x000F0000, 0x000F0000, 0x00000000, 0x00000000,
];

#[allow(clippy::unreadable_literal)]
const BACK_ROWS: [u32; ICON_DIM] = [
    0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x00000000, 0x00040000, 0x000C0000, 0x001C0000,
    0x003C0000, 0x007C0000, 0x00FC0000, 0x01FC0000,
    0x03FC0000, 0x07FFFFF0, 0x0FFFFFF0, 0x1FFFFFF0,
    0x1FFFFFF0, 0x0FFFFFF0, 0x07FFFFF0, 0x03FC0000,
    0x01FC0000, 0x00FC0000, 0x007C0000, 0x003C0000,
    0x001C0000, 0x000C0000, 0x00040000, 0x00000000,
    0x00000000, 0x00000000, 0x00000000, 0x00000000,
];

static GEAR_PIXELS: [Rgb565; ICON_PIXELS] =
    expand(&GEAR_ROWS, Rgb565::DARK_GREY, super::USER_BACKGROUND);
static BACK_PIXELS: [Rgb565; ICON_PIXELS] =
    expand(&BACK_ROWS, Rgb565::WHITE, super::ADMIN_BACKGROUND);

/// Settings gear opening the admin login.
pub static ADMIN_GEAR: Bitmap = Bitmap {
    width: 32,
    height: 32,
    pixels: &GEAR_PIXELS,
};

/// Left arrow leaving the admin menu.
pub static BACK_ARROW: Bitmap = Bitmap {
    width: 32,
    height: 32,
    pixels: &BACK_PIXELS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_is_leftmost_pixel() {
        let mut rows = [0u32; ICON_DIM];
        rows[2] = 0x8000_0001;
        let pixels = expand(&rows, Rgb565::RED, Rgb565::BLACK);
        assert_eq!(pixels[2 * ICON_DIM], Rgb565::RED);
        assert_eq!(pixels[2 * ICON_DIM + 31], Rgb565::RED);
        assert_eq!(pixels[2 * ICON_DIM + 1], Rgb565::BLACK);
    }

    #[test]
    fn icons_fill_their_grid() {
        assert_eq!(ADMIN_GEAR.pixels.len(), ICON_PIXELS);
        assert!(BACK_ARROW.pixels.contains(&Rgb565::WHITE));
        assert!(BACK_ARROW.pixels.contains(&super::super::ADMIN_BACKGROUND));
    }
}
