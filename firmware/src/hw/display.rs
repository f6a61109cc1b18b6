//! ST7789 panel driver exposed as an `embedded-graphics` draw target.
//!
//! The controller takes a command byte (DC low) followed by parameter bytes
//! (DC high). Pixels stream as big-endian RGB565 words into the window set by
//! CASET/RASET.

use core::iter;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

pub mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

pub const WIDTH: u16 = 240;
pub const HEIGHT: u16 = 320;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitStep {
    pub command: u8,
    pub data: &'static [u8],
    /// Settle time after the command, in milliseconds.
    pub delay_ms: u64,
}

/// Power-up sequence for a 240x320 portrait panel in 16-bit colour.
pub const INIT_SEQUENCE: &[InitStep] = &[
    InitStep {
        command: cmd::SWRESET,
        data: &[],
        delay_ms: 150,
    },
    InitStep {
        command: cmd::SLPOUT,
        data: &[],
        delay_ms: 10,
    },
    InitStep {
        command: cmd::COLMOD,
        data: &[0x55],
        delay_ms: 10,
    },
    InitStep {
        command: cmd::MADCTL,
        data: &[0x00],
        delay_ms: 0,
    },
    InitStep {
        command: cmd::INVON,
        data: &[],
        delay_ms: 10,
    },
    InitStep {
        command: cmd::NORON,
        data: &[],
        delay_ms: 10,
    },
    InitStep {
        command: cmd::DISPON,
        data: &[],
        delay_ms: 10,
    },
];

/// Command/data transport to the panel.
pub trait DisplayBus {
    type Error;

    fn command(&mut self, command: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Streams RGB565 words after a RAMWR.
    fn write_pixels<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = u16>;
}

pub struct St7789<B> {
    bus: B,
}

impl<B> St7789<B>
where
    B: DisplayBus,
{
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Selects `area` for the next pixel stream. Returns `false` if nothing is on screen.
    fn open_window(&mut self, area: &Rectangle) -> Result<bool, B::Error> {
        let Some((x0, y0, x1, y1)) = window_bounds(&area.intersection(&self.bounding_box())) else {
            return Ok(false);
        };
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.bus.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.bus.command(cmd::RASET, &[y0h, y0l, y1h, y1l])?;
        self.bus.command(cmd::RAMWR, &[])?;
        Ok(true)
    }
}

fn window_bounds(area: &Rectangle) -> Option<(u16, u16, u16, u16)> {
    let bottom_right = area.bottom_right()?;
    Some((
        u16::try_from(area.top_left.x).ok()?,
        u16::try_from(area.top_left.y).ok()?,
        u16::try_from(bottom_right.x).ok()?,
        u16::try_from(bottom_right.y).ok()?,
    ))
}

fn pixel_count(area: &Rectangle) -> usize {
    let pixels = area.size.width.saturating_mul(area.size.height);
    usize::try_from(pixels).unwrap_or(usize::MAX)
}

fn raw(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner()
}

impl<B> OriginDimensions for St7789<B> {
    fn size(&self) -> Size {
        Size::new(u32::from(WIDTH), u32::from(HEIGHT))
    }
}

impl<B> DrawTarget for St7789<B>
where
    B: DisplayBus,
{
    type Color = Rgb565;
    type Error = B::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if self.open_window(&Rectangle::new(point, Size::new(1, 1)))? {
                self.bus.write_pixels(iter::once(raw(color)))?;
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        if area.intersection(&self.bounding_box()) != *area {
            let pixels = area
                .points()
                .zip(colors)
                .map(|(point, color)| Pixel(point, color));
            return self.draw_iter(pixels);
        }
        if self.open_window(area)? {
            self.bus
                .write_pixels(colors.into_iter().take(pixel_count(area)).map(raw))?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.bounding_box());
        if self.open_window(&visible)? {
            self.bus
                .write_pixels(iter::repeat_n(raw(color), pixel_count(&visible)))?;
        }
        Ok(())
    }
}
