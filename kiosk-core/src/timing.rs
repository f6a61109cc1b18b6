//! Service-time bookkeeping and wait estimates.

use core::fmt;
use core::time::Duration;

use crate::clock::Millis;

pub const MIN_PER_TICKET_SECONDS: u8 = 1;
pub const MAX_PER_TICKET_SECONDS: u8 = 99;
pub const DEFAULT_PER_TICKET_SECONDS: u8 = 60;

/// Administrator-adjustable service time per ticket.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    per_ticket_seconds: u8,
}

impl TimingConfig {
    /// Creates a config, clamping `per_ticket_seconds` into `[1, 99]`.
    #[must_use]
    pub const fn new(per_ticket_seconds: u8) -> Self {
        let per_ticket_seconds = if per_ticket_seconds < MIN_PER_TICKET_SECONDS {
            MIN_PER_TICKET_SECONDS
        } else if per_ticket_seconds > MAX_PER_TICKET_SECONDS {
            MAX_PER_TICKET_SECONDS
        } else {
            per_ticket_seconds
        };
        Self { per_ticket_seconds }
    }

    #[must_use]
    pub const fn per_ticket_seconds(&self) -> u8 {
        self.per_ticket_seconds
    }

    #[must_use]
    pub fn per_ticket(&self) -> Duration {
        Duration::from_secs(u64::from(self.per_ticket_seconds))
    }

    /// Adds one second. Returns `false` when already at the maximum.
    pub fn increment(&mut self) -> bool {
        if self.per_ticket_seconds >= MAX_PER_TICKET_SECONDS {
            return false;
        }
        self.per_ticket_seconds += 1;
        true
    }

    /// Removes one second. Returns `false` when already at the minimum.
    pub fn decrement(&mut self) -> bool {
        if self.per_ticket_seconds <= MIN_PER_TICKET_SECONDS {
            return false;
        }
        self.per_ticket_seconds -= 1;
        true
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PER_TICKET_SECONDS)
    }
}

/// Whole-second wait estimate rendered as `MM:SS`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct WaitTime {
    seconds: u32,
}

impl WaitTime {
    pub const ZERO: Self = Self { seconds: 0 };

    #[must_use]
    pub const fn from_secs(seconds: u32) -> Self {
        Self { seconds }
    }

    #[must_use]
    pub const fn as_secs(self) -> u32 {
        self.seconds
    }

    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.seconds / 60
    }

    #[must_use]
    pub const fn seconds_part(self) -> u32 {
        self.seconds % 60
    }
}

impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes(), self.seconds_part())
    }
}

/// Seconds left on the ticket currently being served.
#[must_use]
pub fn remaining_for_current(per_ticket_seconds: u8, since_last_process: Duration) -> u32 {
    let elapsed = u32::try_from(since_last_process.as_secs()).unwrap_or(u32::MAX);
    u32::from(per_ticket_seconds).saturating_sub(elapsed)
}

/// Wait until a ticket at the back of a queue of `queue_len` is served.
///
/// The front ticket contributes only its remaining time; every ticket behind it
/// a full service period. An empty queue has no wait.
#[must_use]
pub fn total_remaining(
    per_ticket_seconds: u8,
    since_last_process: Duration,
    queue_len: usize,
) -> WaitTime {
    if queue_len == 0 {
        return WaitTime::ZERO;
    }
    let behind = u32::try_from(queue_len - 1).unwrap_or(u32::MAX);
    let seconds = remaining_for_current(per_ticket_seconds, since_last_process)
        .saturating_add(behind.saturating_mul(u32::from(per_ticket_seconds)));
    WaitTime::from_secs(seconds)
}

/// Timestamps driving the time-based screen rules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Clocks {
    /// Entry into TicketIssued or QueueFull.
    pub ticket_issue_time: Millis,
    /// Start of service for the ticket at the front of the queue.
    pub last_process_time: Millis,
    /// Last partial redraw of the wait-time line.
    pub last_wait_display_update: Millis,
}

impl Clocks {
    /// All clocks start at `now`.
    #[must_use]
    pub const fn starting_at(now: Millis) -> Self {
        Self {
            ticket_issue_time: now,
            last_process_time: now,
            last_wait_display_update: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn wait_for_three_tickets_ten_seconds_in() {
        let wait = total_remaining(60, Duration::from_secs(10), 3);
        assert_eq!(wait.as_secs(), 170);

        let mut text: heapless::String<8> = heapless::String::new();
        write!(text, "{wait}").expect("fits");
        assert_eq!(text.as_str(), "02:50");
    }

    #[test]
    fn overdue_front_ticket_contributes_nothing() {
        assert_eq!(remaining_for_current(5, Duration::from_secs(9)), 0);
        assert_eq!(total_remaining(5, Duration::from_secs(9), 2).as_secs(), 5);
    }

    #[test]
    fn empty_queue_has_no_wait() {
        assert_eq!(total_remaining(60, Duration::ZERO, 0), WaitTime::ZERO);
    }

    #[test]
    fn partial_seconds_are_truncated() {
        assert_eq!(remaining_for_current(60, Duration::from_millis(10_999)), 50);
    }

    #[test]
    fn service_time_is_clamped() {
        assert_eq!(TimingConfig::new(0).per_ticket_seconds(), 1);
        assert_eq!(TimingConfig::new(150).per_ticket_seconds(), 99);

        let mut timing = TimingConfig::new(99);
        assert!(!timing.increment());
        assert_eq!(timing.per_ticket_seconds(), 99);

        let mut timing = TimingConfig::new(1);
        assert!(!timing.decrement());
        assert!(timing.increment());
        assert_eq!(timing.per_ticket_seconds(), 2);
    }
}
