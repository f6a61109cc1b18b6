//! Raw-to-screen coordinate mapping.
//!
//! The XPT2046 reports 12-bit readings along the panel's native axes. The kiosk
//! mounts the panel rotated, so the default profile swaps the axes and runs the
//! raw X reading backwards.

use super::{RawSample, ScreenPoint, ScreenSize};

/// Calibration for one raw axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AxisCalibration {
    /// Raw reading at the low edge of the screen axis (before inversion).
    pub raw_min: u16,
    /// Raw reading at the high edge of the screen axis (before inversion).
    pub raw_max: u16,
    /// Interpolate from `raw_max` down to `raw_min` instead.
    pub inverted: bool,
}

impl AxisCalibration {
    #[must_use]
    pub const fn forward(raw_min: u16, raw_max: u16) -> Self {
        Self {
            raw_min,
            raw_max,
            inverted: false,
        }
    }

    #[must_use]
    pub const fn inverted(raw_min: u16, raw_max: u16) -> Self {
        Self {
            raw_min,
            raw_max,
            inverted: true,
        }
    }

    /// Linearly maps `raw` onto `[0, dimension - 1]`.
    ///
    /// Interpolation targets `[0, dimension]` with truncating integer division and
    /// the result is clamped afterwards, so readings outside the calibrated span
    /// pin to the nearest edge. A zero-width span maps everything to 0.
    #[must_use]
    pub fn map(&self, raw: u16, dimension: u16) -> u16 {
        if dimension == 0 {
            return 0;
        }

        let (from, to) = if self.inverted {
            (self.raw_max, self.raw_min)
        } else {
            (self.raw_min, self.raw_max)
        };

        let span = i64::from(to) - i64::from(from);
        if span == 0 {
            return 0;
        }

        let scaled = (i64::from(raw) - i64::from(from)) * i64::from(dimension) / span;
        let clamped = scaled.clamp(0, i64::from(dimension - 1));
        u16::try_from(clamped).unwrap_or(dimension - 1)
    }
}

/// Full mapping from sensor space to screen space.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CalibrationProfile {
    /// Calibration applied to the raw X reading.
    pub x: AxisCalibration,
    /// Calibration applied to the raw Y reading.
    pub y: AxisCalibration,
    /// Raw Y drives screen X and raw X drives screen Y.
    pub axis_swap: bool,
}

/// Raw X reading at the calibrated edges of the deployed panel.
pub const DEFAULT_RAW_X: AxisCalibration = AxisCalibration::inverted(205, 3835);
/// Raw Y reading at the calibrated edges of the deployed panel.
pub const DEFAULT_RAW_Y: AxisCalibration = AxisCalibration::forward(435, 3715);

impl CalibrationProfile {
    #[must_use]
    pub const fn new(x: AxisCalibration, y: AxisCalibration, axis_swap: bool) -> Self {
        Self { x, y, axis_swap }
    }

    #[must_use]
    pub fn map(&self, raw: RawSample, size: ScreenSize) -> ScreenPoint {
        if self.axis_swap {
            ScreenPoint::new(
                self.y.map(raw.raw_y, size.width),
                self.x.map(raw.raw_x, size.height),
            )
        } else {
            ScreenPoint::new(
                self.x.map(raw.raw_x, size.width),
                self.y.map(raw.raw_y, size.height),
            )
        }
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::new(DEFAULT_RAW_X, DEFAULT_RAW_Y, true)
    }
}

/// Maps a raw sample through `profile` onto a `width` x `height` screen.
#[must_use]
pub fn map(raw: RawSample, profile: &CalibrationProfile, width: u16, height: u16) -> ScreenPoint {
    profile.map(raw, ScreenSize::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: ScreenSize = ScreenSize::PORTRAIT;

    #[test]
    fn calibrated_corners_land_on_screen_edges() {
        let profile = CalibrationProfile::default();

        let top_left = profile.map(RawSample::new(3835, 435), SIZE);
        assert_eq!(top_left, ScreenPoint::new(0, 0));

        let bottom_right = profile.map(RawSample::new(205, 3715), SIZE);
        assert_eq!(bottom_right, ScreenPoint::new(239, 319));
    }

    #[test]
    fn readings_outside_calibration_are_clamped() {
        let profile = CalibrationProfile::default();

        let below = profile.map(RawSample::new(4095, 0), SIZE);
        assert_eq!(below, ScreenPoint::new(0, 0));

        let above = profile.map(RawSample::new(0, 4095), SIZE);
        assert_eq!(above, ScreenPoint::new(239, 319));
    }

    #[test]
    fn every_12_bit_reading_stays_in_bounds() {
        let profile = CalibrationProfile::default();
        for raw in (0..=4095).step_by(7) {
            let point = profile.map(RawSample::new(raw, 4095 - raw), SIZE);
            assert!(point.x < SIZE.width);
            assert!(point.y < SIZE.height);
        }
    }

    #[test]
    fn interpolation_truncates() {
        // (2075 - 435) * 240 / 3280 = 120
        let axis = AxisCalibration::forward(435, 3715);
        assert_eq!(axis.map(2075, 240), 120);
        // (2076 - 435) * 240 / 3280 = 120.07
        assert_eq!(axis.map(2076, 240), 120);
    }

    #[test]
    fn inverted_axis_runs_backwards() {
        let axis = AxisCalibration::inverted(205, 3835);
        assert_eq!(axis.map(3835, 320), 0);
        assert_eq!(axis.map(2020, 320), 160);
    }

    #[test]
    fn direct_profile_keeps_axes() {
        let profile = CalibrationProfile::new(
            AxisCalibration::forward(0, 4095),
            AxisCalibration::forward(0, 4095),
            false,
        );
        let point = profile.map(RawSample::new(4095, 0), SIZE);
        assert_eq!(point, ScreenPoint::new(239, 0));
    }

    #[test]
    fn degenerate_span_maps_to_origin() {
        let axis = AxisCalibration::forward(1000, 1000);
        assert_eq!(axis.map(3000, 240), 0);
        assert_eq!(axis.map(0, 240), 0);
    }

    #[test]
    fn free_function_matches_profile() {
        let profile = CalibrationProfile::default();
        let raw = RawSample::new(1800, 2200);
        assert_eq!(map(raw, &profile, 240, 320), profile.map(raw, SIZE));
    }
}
