//! Jitter and debounce filtering for mapped touch samples.
//!
//! Resistive panels wander by a few pixels while a finger rests on them. The
//! stabilizer only reports a touch after `confirm_threshold` consecutive samples
//! stay inside a small box around the first one, then ignores the panel for a
//! settle window so one press yields one confirmed point.

use core::time::Duration;

use super::ScreenPoint;
use crate::clock::Millis;

/// Maximum per-axis drift, in pixels, tolerated between samples of one press.
pub const DEFAULT_AREA_TOLERANCE: u16 = 10;
/// Consecutive in-tolerance samples required before a touch is confirmed.
pub const DEFAULT_CONFIRM_THRESHOLD: u16 = 50;
/// Window after a confirmation during which the panel is ignored.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StabilizerConfig {
    pub area_tolerance: u16,
    pub confirm_threshold: u16,
    pub settle: Duration,
}

impl StabilizerConfig {
    #[must_use]
    pub const fn new(area_tolerance: u16, confirm_threshold: u16, settle: Duration) -> Self {
        Self {
            area_tolerance,
            confirm_threshold,
            settle,
        }
    }
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_AREA_TOLERANCE,
            DEFAULT_CONFIRM_THRESHOLD,
            DEFAULT_SETTLE,
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StabilizerState {
    /// No press in progress.
    Idle,
    /// Counting samples that stay close to `candidate`.
    Accumulating {
        candidate: ScreenPoint,
        latest: ScreenPoint,
        count: u16,
    },
    /// A touch was just confirmed; samples are ignored until the window ends.
    Settling { since: Millis },
}

/// Per-cycle touch filter.
#[derive(Clone, Debug)]
pub struct TouchStabilizer {
    config: StabilizerConfig,
    state: StabilizerState,
}

impl TouchStabilizer {
    #[must_use]
    pub const fn new(config: StabilizerConfig) -> Self {
        Self {
            config,
            state: StabilizerState::Idle,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> StabilizerState {
        self.state
    }

    /// Number of samples accumulated toward the current candidate.
    #[must_use]
    pub const fn count(&self) -> u16 {
        match self.state {
            StabilizerState::Accumulating { count, .. } => count,
            StabilizerState::Idle | StabilizerState::Settling { .. } => 0,
        }
    }

    pub fn reset(&mut self) {
        self.state = StabilizerState::Idle;
    }

    /// Feeds one poll cycle. `sample` is `None` when the panel reports no touch.
    ///
    /// Returns the confirmed point on the cycle the threshold is reached.
    pub fn sample(&mut self, now: Millis, sample: Option<ScreenPoint>) -> Option<ScreenPoint> {
        if let StabilizerState::Settling { since } = self.state {
            if !now.has_elapsed(since, self.config.settle) {
                return None;
            }
            self.state = StabilizerState::Idle;
        }

        let Some(point) = sample else {
            self.state = StabilizerState::Idle;
            return None;
        };

        let (candidate, count) = match self.state {
            StabilizerState::Accumulating {
                candidate, count, ..
            } if point.is_within(candidate, self.config.area_tolerance) => {
                (candidate, count.saturating_add(1))
            }
            _ => (point, 1),
        };

        if count >= self.config.confirm_threshold {
            self.state = if self.config.settle.is_zero() {
                StabilizerState::Idle
            } else {
                StabilizerState::Settling { since: now }
            };
            return Some(candidate.midpoint(point));
        }

        self.state = StabilizerState::Accumulating {
            candidate,
            latest: point,
            count,
        };
        None
    }
}

impl Default for TouchStabilizer {
    fn default() -> Self {
        Self::new(StabilizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(
        stabilizer: &mut TouchStabilizer,
        start: u32,
        samples: u16,
        point: ScreenPoint,
    ) -> Option<ScreenPoint> {
        let mut confirmed = None;
        for offset in 0..u32::from(samples) {
            if let Some(hit) = stabilizer.sample(Millis::new(start + offset), Some(point)) {
                confirmed = Some(hit);
            }
        }
        confirmed
    }

    #[test]
    fn forty_nine_samples_do_not_confirm() {
        let mut stabilizer = TouchStabilizer::default();
        let confirmed = feed(&mut stabilizer, 0, 49, ScreenPoint::new(120, 250));
        assert_eq!(confirmed, None);
        assert_eq!(stabilizer.count(), 49);
    }

    #[test]
    fn fiftieth_sample_confirms_once() {
        let mut stabilizer = TouchStabilizer::default();
        let point = ScreenPoint::new(120, 250);
        assert_eq!(feed(&mut stabilizer, 0, 49, point), None);
        assert_eq!(stabilizer.sample(Millis::new(49), Some(point)), Some(point));
        assert!(matches!(
            stabilizer.state(),
            StabilizerState::Settling { .. }
        ));
    }

    #[test]
    fn confirmation_reports_midpoint_of_first_and_last() {
        let mut stabilizer = TouchStabilizer::new(StabilizerConfig::new(10, 3, DEFAULT_SETTLE));
        let now = Millis::ZERO;
        assert_eq!(stabilizer.sample(now, Some(ScreenPoint::new(100, 100))), None);
        assert_eq!(stabilizer.sample(now, Some(ScreenPoint::new(104, 98))), None);
        assert_eq!(
            stabilizer.sample(now, Some(ScreenPoint::new(108, 96))),
            Some(ScreenPoint::new(104, 98))
        );
    }

    #[test]
    fn release_resets_the_count() {
        let mut stabilizer = TouchStabilizer::default();
        let point = ScreenPoint::new(30, 30);
        feed(&mut stabilizer, 0, 30, point);
        assert_eq!(stabilizer.sample(Millis::new(30), None), None);
        assert_eq!(stabilizer.count(), 0);
        assert_eq!(feed(&mut stabilizer, 31, 49, point), None);
    }

    #[test]
    fn drift_outside_tolerance_restarts_the_press() {
        let mut stabilizer = TouchStabilizer::default();
        feed(&mut stabilizer, 0, 40, ScreenPoint::new(30, 30));
        assert_eq!(
            stabilizer.sample(Millis::new(40), Some(ScreenPoint::new(41, 30))),
            None
        );
        assert_eq!(stabilizer.count(), 1);
    }

    #[test]
    fn settle_window_swallows_samples() {
        let mut stabilizer = TouchStabilizer::new(StabilizerConfig::new(10, 1, DEFAULT_SETTLE));
        let point = ScreenPoint::new(10, 10);
        assert_eq!(stabilizer.sample(Millis::new(0), Some(point)), Some(point));
        assert_eq!(stabilizer.sample(Millis::new(50), Some(point)), None);
        assert_eq!(stabilizer.sample(Millis::new(60), None), None);
        assert_eq!(stabilizer.sample(Millis::new(99), Some(point)), None);
        assert_eq!(stabilizer.sample(Millis::new(100), Some(point)), Some(point));
    }

    #[test]
    fn untouched_cycle_does_not_end_settle_early() {
        let mut stabilizer = TouchStabilizer::new(StabilizerConfig::new(10, 1, DEFAULT_SETTLE));
        let point = ScreenPoint::new(10, 10);
        stabilizer.sample(Millis::new(0), Some(point));
        stabilizer.sample(Millis::new(10), None);
        assert!(matches!(
            stabilizer.state(),
            StabilizerState::Settling { .. }
        ));
    }
}
