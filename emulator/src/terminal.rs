//! Text-mode stand-in for the panel.
//!
//! Keeps only the strings currently visible, keyed by their top-left corner.
//! Filling a rectangle erases the text that starts inside it, the same way the
//! real display loses it.

use core::convert::Infallible;

use crossterm::style::Color;
use kiosk_core::render::{Bitmap, Renderer, Rgb565, TextSize};
use kiosk_core::screen::Rect;
use kiosk_core::touch::ScreenPoint;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextCell {
    pub origin: ScreenPoint,
    pub text: String,
    pub size: TextSize,
    pub colour: Rgb565,
}

#[derive(Clone, Debug, Default)]
pub struct TerminalRenderer {
    cells: Vec<TextCell>,
    fills: usize,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible text in reading order.
    pub fn cells(&self) -> &[TextCell] {
        &self.cells
    }

    /// Rectangles filled so far; a full repaint always adds at least one.
    pub fn fills(&self) -> usize {
        self.fills
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.cells.iter().any(|cell| cell.text.contains(needle))
    }
}

impl Renderer for TerminalRenderer {
    type Error = Infallible;

    fn fill_rect(&mut self, rect: Rect, _color: Rgb565) -> Result<(), Self::Error> {
        self.fills += 1;
        self.cells.retain(|cell| !rect.contains(cell.origin));
        Ok(())
    }

    fn draw_rect(&mut self, _rect: Rect, _color: Rgb565) -> Result<(), Self::Error> {
        Ok(())
    }

    fn draw_pixel(&mut self, _point: ScreenPoint, _color: Rgb565) -> Result<(), Self::Error> {
        Ok(())
    }

    fn draw_text(
        &mut self,
        cursor: ScreenPoint,
        text: &str,
        size: TextSize,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        let cell = TextCell {
            origin: cursor,
            text: text.to_string(),
            size,
            colour: color,
        };
        let key = (cursor.y, cursor.x);
        match self
            .cells
            .binary_search_by_key(&key, |cell| (cell.origin.y, cell.origin.x))
        {
            Ok(index) => self.cells[index] = cell,
            Err(index) => self.cells.insert(index, cell),
        }
        Ok(())
    }

    fn draw_bitmap(&mut self, _origin: ScreenPoint, _bitmap: &Bitmap) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Terminal colour closest to a panel colour.
pub fn terminal_colour(colour: Rgb565) -> Color {
    let (r, g, b) = colour.to_rgb888();
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(renderer: &mut TerminalRenderer, x: u16, y: u16, value: &str) {
        renderer
            .draw_text(ScreenPoint::new(x, y), value, TextSize::Normal, Rgb565::BLACK)
            .unwrap();
    }

    #[test]
    fn cells_are_kept_in_reading_order() {
        let mut renderer = TerminalRenderer::new();
        text(&mut renderer, 50, 200, "third");
        text(&mut renderer, 10, 20, "first");
        text(&mut renderer, 90, 20, "second");

        let order: Vec<&str> = renderer.cells().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[test]
    fn fill_erases_text_inside_and_redraw_replaces() {
        let mut renderer = TerminalRenderer::new();
        text(&mut renderer, 10, 112, "Queue: 1");
        text(&mut renderer, 10, 300, "footer");

        renderer
            .fill_rect(Rect::new(0, 110, 240, 24), Rgb565::WHITE)
            .unwrap();
        assert!(!renderer.contains_text("Queue"));
        assert!(renderer.contains_text("footer"));

        text(&mut renderer, 10, 300, "footer 2");
        assert_eq!(renderer.cells().len(), 1);
        assert_eq!(renderer.fills(), 1);
    }

    #[test]
    fn palette_maps_to_true_colour() {
        assert_eq!(
            terminal_colour(Rgb565::RED),
            Color::Rgb { r: 255, g: 0, b: 0 }
        );
    }
}
