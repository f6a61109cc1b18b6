//! Bounded history of notable kiosk events.
//!
//! The front-ends mirror every record to their log sink: the firmware through
//! `defmt`, the emulator on stdout. The ring keeps the most recent
//! [`HISTORY_CAPACITY`] records for the console `history` command.

use core::fmt;

use heapless::{HistoryBuf, OldestOrdered};

use crate::clock::Millis;
use crate::queue::Ticket;
use crate::screen::ScreenState;
use crate::timing::WaitTime;
use crate::touch::ScreenPoint;

pub const HISTORY_CAPACITY: usize = 64;

pub type EventId = u32;

/// Why a ticket left the queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ServeReason {
    /// Service period elapsed.
    Timer,
    /// Removed from the admin queue list.
    Admin,
}

impl fmt::Display for ServeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServeReason::Timer => "timer",
            ServeReason::Admin => "admin",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KioskEvent {
    Started,
    TouchConfirmed(ScreenPoint),
    ScreenChanged {
        from: ScreenState,
        to: ScreenState,
    },
    TicketIssued {
        ticket: Ticket,
        position: usize,
        wait: WaitTime,
    },
    QueueFull {
        capacity: usize,
    },
    TicketServed {
        ticket: Ticket,
        reason: ServeReason,
    },
    LoginAccepted,
    LoginRejected,
    PasswordChanged,
    ServiceTimeChanged {
        seconds: u8,
    },
}

impl fmt::Display for KioskEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KioskEvent::Started => f.write_str("started"),
            KioskEvent::TouchConfirmed(point) => write!(f, "touch {point}"),
            KioskEvent::ScreenChanged { from, to } => write!(f, "screen {from} -> {to}"),
            KioskEvent::TicketIssued {
                ticket,
                position,
                wait,
            } => write!(f, "issued {ticket} position={position} wait={wait}"),
            KioskEvent::QueueFull { capacity } => write!(f, "queue full capacity={capacity}"),
            KioskEvent::TicketServed { ticket, reason } => {
                write!(f, "served {ticket} by {reason}")
            }
            KioskEvent::LoginAccepted => f.write_str("login accepted"),
            KioskEvent::LoginRejected => f.write_str("login rejected"),
            KioskEvent::PasswordChanged => f.write_str("password changed"),
            KioskEvent::ServiceTimeChanged { seconds } => {
                write!(f, "service time {seconds}s")
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    pub id: EventId,
    pub timestamp: Millis,
    pub event: KioskEvent,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>4}] {:>8}ms {}",
            self.id,
            self.timestamp.as_u32(),
            self.event
        )
    }
}

/// Ring buffer of [`EventRecord`]s with monotonically increasing ids.
pub struct EventRecorder<const CAPACITY: usize = HISTORY_CAPACITY> {
    ring: HistoryBuf<EventRecord, CAPACITY>,
    next_event_id: EventId,
}

impl<const CAPACITY: usize> EventRecorder<CAPACITY> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_event_id: 0,
        }
    }

    pub fn record(&mut self, event: KioskEvent, timestamp: Millis) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);
        self.ring.write(EventRecord {
            id,
            timestamp,
            event,
        });
        id
    }

    /// Recorded events in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, EventRecord> {
        self.ring.oldest_ordered()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&EventRecord> {
        self.ring.recent()
    }

    /// Id the next recorded event will receive.
    #[must_use]
    pub const fn next_id(&self) -> EventId {
        self.next_event_id
    }

    /// Records with an id at or after `cursor`, oldest first.
    ///
    /// Front-ends keep the cursor from [`Self::next_id`] to mirror each event
    /// exactly once. Records already overwritten by the ring are skipped.
    pub fn since(&self, cursor: EventId) -> impl Iterator<Item = &EventRecord> + '_ {
        let pending = self.next_event_id.wrapping_sub(cursor);
        self.oldest_first()
            .filter(move |record| self.next_event_id.wrapping_sub(record.id) <= pending)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

impl<const CAPACITY: usize> Default for EventRecorder<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}
