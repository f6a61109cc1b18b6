//! Millisecond timestamps with wrap-safe arithmetic.
//!
//! The board exposes a free-running 32-bit millisecond counter. Every elapsed
//! computation goes through [`Millis::elapsed_since`], which subtracts with
//! wrapping so the roll-over after ~49 days never produces a bogus interval.

use core::fmt;
use core::ops::Add;
use core::time::Duration;

/// Monotonic millisecond timestamp.
///
/// Deliberately not `Ord`: once the counter wraps, comparing two raw values
/// says nothing about which came first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Millis(u32);

impl Millis {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Time elapsed from `earlier` up to `self`.
    #[must_use]
    pub fn elapsed_since(self, earlier: Millis) -> Duration {
        Duration::from_millis(u64::from(self.0.wrapping_sub(earlier.0)))
    }

    /// Returns `true` once at least `period` has passed since `start`.
    #[must_use]
    pub fn has_elapsed(self, start: Millis, period: Duration) -> bool {
        self.elapsed_since(start) >= period
    }
}

impl Add<Duration> for Millis {
    type Output = Millis;

    fn add(self, rhs: Duration) -> Self::Output {
        // Truncation is the wrap-around we want.
        #[allow(clippy::cast_possible_truncation)]
        let delta = rhs.as_millis() as u32;
        Millis(self.0.wrapping_add(delta))
    }
}

impl From<u32> for Millis {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of the current timestamp.
pub trait Clock {
    fn now(&self) -> Millis;
}
