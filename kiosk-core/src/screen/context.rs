use core::time::Duration;

use super::session::AdminSession;
use crate::clock::Millis;
use crate::config::KioskConfig;
use crate::queue::{Ticket, TicketDispenser, TicketQueue};
use crate::timing::{self, Clocks, TimingConfig, WaitTime};

/// Snapshot shown on the ticket-issued screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IssuedTicket {
    pub ticket: Ticket,
    /// One-based place in the queue at issue time.
    pub position: usize,
    pub wait: WaitTime,
}

/// Queue slot picked in the admin list, pending confirmation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub ticket: Ticket,
}

/// Everything the screen machine reads and mutates.
#[derive(Clone, Debug)]
pub struct KioskContext {
    pub queue: TicketQueue,
    pub dispenser: TicketDispenser,
    pub timing: TimingConfig,
    pub admin: AdminSession,
    pub clocks: Clocks,
    pub issued: Option<IssuedTicket>,
    pub selection: Option<Selection>,
    pub revert_after: Duration,
    pub wait_refresh: Duration,
}

impl KioskContext {
    #[must_use]
    pub fn new(config: &KioskConfig, now: Millis) -> Self {
        Self {
            queue: TicketQueue::new(config.queue_capacity),
            dispenser: TicketDispenser::new(),
            timing: TimingConfig::new(config.per_ticket_seconds),
            admin: AdminSession::new(config.default_password),
            clocks: Clocks::starting_at(now),
            issued: None,
            selection: None,
            revert_after: config.revert_after,
            wait_refresh: config.wait_refresh,
        }
    }

    /// Estimated wait for a customer at the back of the queue right now.
    #[must_use]
    pub fn current_wait(&self, now: Millis) -> WaitTime {
        timing::total_remaining(
            self.timing.per_ticket_seconds(),
            now.elapsed_since(self.clocks.last_process_time),
            self.queue.len(),
        )
    }
}

impl Default for KioskContext {
    fn default() -> Self {
        Self::new(&KioskConfig::default(), Millis::ZERO)
    }
}
