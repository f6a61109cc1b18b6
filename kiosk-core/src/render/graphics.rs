//! [`Renderer`] on top of any `embedded-graphics` RGB565 draw target.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565 as EgRgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use super::{Bitmap, Renderer, Rgb565, TextSize};
use crate::screen::Rect;
use crate::touch::ScreenPoint;

impl From<Rgb565> for EgRgb565 {
    fn from(color: Rgb565) -> Self {
        EgRgb565::from(RawU16::new(color.0))
    }
}

fn point(p: ScreenPoint) -> Point {
    Point::new(i32::from(p.x), i32::from(p.y))
}

fn rectangle(rect: Rect) -> Rectangle {
    Rectangle::new(
        Point::new(i32::from(rect.x), i32::from(rect.y)),
        Size::new(u32::from(rect.w), u32::from(rect.h)),
    )
}

/// Adapts a draw target such as a panel driver or a simulator framebuffer.
pub struct DrawTargetRenderer<D> {
    target: D,
}

impl<D> DrawTargetRenderer<D>
where
    D: DrawTarget<Color = EgRgb565>,
{
    pub const fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> Renderer for DrawTargetRenderer<D>
where
    D: DrawTarget<Color = EgRgb565>,
{
    type Error = D::Error;

    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), Self::Error> {
        self.target.fill_solid(&rectangle(rect), color.into())
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), Self::Error> {
        rectangle(rect)
            .into_styled(PrimitiveStyle::with_stroke(color.into(), 1))
            .draw(&mut self.target)
    }

    fn draw_pixel(&mut self, at: ScreenPoint, color: Rgb565) -> Result<(), Self::Error> {
        Pixel(point(at), color.into()).draw(&mut self.target)
    }

    fn draw_text(
        &mut self,
        cursor: ScreenPoint,
        text: &str,
        size: TextSize,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let font = match size {
            TextSize::Normal => &FONT_6X10,
            TextSize::Large => &FONT_10X20,
        };
        let style = MonoTextStyle::new(font, color.into());
        Text::with_baseline(text, point(cursor), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
    }

    fn draw_bitmap(&mut self, origin: ScreenPoint, bitmap: &Bitmap) -> Result<(), Self::Error> {
        let area = Rectangle::new(
            point(origin),
            Size::new(u32::from(bitmap.width), u32::from(bitmap.height)),
        );
        self.target
            .fill_contiguous(&area, bitmap.pixels.iter().map(|color| EgRgb565::from(*color)))
    }
}
