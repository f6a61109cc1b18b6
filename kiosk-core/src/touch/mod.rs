//! Raw touch acquisition, calibration, and debouncing.

pub mod calibration;
pub mod stabilizer;

pub use calibration::{AxisCalibration, CalibrationProfile};
pub use stabilizer::{StabilizerConfig, StabilizerState, TouchStabilizer};

use core::fmt;

/// Sensor-native reading from the resistive controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RawSample {
    pub raw_x: u16,
    pub raw_y: u16,
}

impl RawSample {
    #[must_use]
    pub const fn new(raw_x: u16, raw_y: u16) -> Self {
        Self { raw_x, raw_y }
    }
}

/// Pixel coordinate on the display, origin top-left.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: u16,
    pub y: u16,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Returns `true` when both axes differ from `other` by at most `tolerance`.
    #[must_use]
    pub const fn is_within(self, other: ScreenPoint, tolerance: u16) -> bool {
        self.x.abs_diff(other.x) <= tolerance && self.y.abs_diff(other.y) <= tolerance
    }

    /// Integer midpoint of the two points, rounded toward zero.
    #[must_use]
    pub const fn midpoint(self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint {
            x: self.x.midpoint(other.x),
            y: self.y.midpoint(other.y),
        }
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Display dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
}

impl ScreenSize {
    /// Portrait panel fitted to the kiosk.
    pub const PORTRAIT: Self = Self::new(240, 320);

    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

/// Touch controller as seen by the poll loop.
///
/// `is_touched` reports pen-down without disturbing the controller so it can be
/// called every cycle; `read_raw` performs the actual conversion.
pub trait TouchSensor {
    type Error;

    fn is_touched(&mut self) -> Result<bool, Self::Error>;

    fn read_raw(&mut self) -> Result<RawSample, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_truncates() {
        let a = ScreenPoint::new(10, 11);
        let b = ScreenPoint::new(15, 14);
        assert_eq!(a.midpoint(b), ScreenPoint::new(12, 12));
    }

    #[test]
    fn tolerance_checks_each_axis() {
        let anchor = ScreenPoint::new(100, 100);
        assert!(anchor.is_within(ScreenPoint::new(110, 90), 10));
        assert!(!anchor.is_within(ScreenPoint::new(111, 100), 10));
        assert!(!anchor.is_within(ScreenPoint::new(100, 89), 10));
    }
}
