//! Construction-time settings for a kiosk instance.

use core::time::Duration;

use crate::queue::DEFAULT_QUEUE_CAPACITY;
use crate::screen::session::DEFAULT_PASSWORD;
use crate::timing::DEFAULT_PER_TICKET_SECONDS;
use crate::touch::{CalibrationProfile, ScreenSize, StabilizerConfig};

/// Confirmation screens fall back to the customer view after this long.
pub const DEFAULT_REVERT_AFTER: Duration = Duration::from_secs(10);
/// How long a pressed button stays highlighted.
pub const DEFAULT_FLASH: Duration = Duration::from_millis(100);
/// Minimum spacing between partial redraws of the wait-time line.
pub const DEFAULT_WAIT_REFRESH: Duration = Duration::from_secs(1);
/// Pacing of the main loop between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KioskConfig {
    pub screen: ScreenSize,
    pub calibration: CalibrationProfile,
    pub stabilizer: StabilizerConfig,
    pub queue_capacity: usize,
    pub revert_after: Duration,
    pub flash: Duration,
    pub wait_refresh: Duration,
    pub poll_interval: Duration,
    /// Must be four hex digits; anything else makes login impossible.
    pub default_password: &'static str,
    pub per_ticket_seconds: u8,
}

impl KioskConfig {
    #[must_use]
    pub const fn with_per_ticket_seconds(mut self, seconds: u8) -> Self {
        self.per_ticket_seconds = seconds;
        self
    }

    #[must_use]
    pub const fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            screen: ScreenSize::PORTRAIT,
            calibration: CalibrationProfile::default(),
            stabilizer: StabilizerConfig::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            revert_after: DEFAULT_REVERT_AFTER,
            flash: DEFAULT_FLASH,
            wait_refresh: DEFAULT_WAIT_REFRESH,
            poll_interval: DEFAULT_POLL_INTERVAL,
            default_password: DEFAULT_PASSWORD,
            per_ticket_seconds: DEFAULT_PER_TICKET_SECONDS,
        }
    }
}
