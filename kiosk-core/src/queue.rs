//! Bounded, ordered ticket queue.

use core::fmt;
use core::slice;

use heapless::Vec;

/// Storage reserved for the queue. Runtime capacity may be set lower.
pub const MAX_QUEUE_CAPACITY: usize = 32;
/// Capacity used by the deployed kiosk.
pub const DEFAULT_QUEUE_CAPACITY: usize = 20;

/// Customer-facing ticket number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u32);

impl Ticket {
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03}", self.0)
    }
}

/// Issues consecutive ticket numbers starting at 1.
#[derive(Clone, Debug, Default)]
pub struct TicketDispenser {
    issued: u32,
}

impl TicketDispenser {
    #[must_use]
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    /// Ticket that the next call to [`Self::advance`] will hand out.
    #[must_use]
    pub const fn peek(&self) -> Ticket {
        Ticket(self.issued.wrapping_add(1))
    }

    /// Consumes the next ticket number.
    pub fn advance(&mut self) -> Ticket {
        self.issued = self.issued.wrapping_add(1);
        Ticket(self.issued)
    }

    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.issued
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// The queue already holds `capacity` tickets.
    Full { capacity: usize },
    /// No ticket at `index`; the queue holds `len`.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full { capacity } => write!(f, "queue full ({capacity} tickets)"),
            QueueError::IndexOutOfRange { index, len } => {
                write!(f, "no ticket at slot {index} (queue holds {len})")
            }
        }
    }
}

/// FIFO of outstanding tickets with arbitrary-slot removal.
#[derive(Clone, Debug)]
pub struct TicketQueue {
    tickets: Vec<Ticket, MAX_QUEUE_CAPACITY>,
    capacity: usize,
}

impl TicketQueue {
    /// Creates an empty queue. `capacity` is limited to [`MAX_QUEUE_CAPACITY`].
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        let capacity = if capacity > MAX_QUEUE_CAPACITY {
            MAX_QUEUE_CAPACITY
        } else {
            capacity
        };
        Self {
            tickets: Vec::new(),
            capacity,
        }
    }

    /// Appends `ticket` at the tail.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] when the queue already holds `capacity` tickets.
    pub fn enqueue(&mut self, ticket: Ticket) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }
        self.tickets.push(ticket).map_err(|_| QueueError::Full {
            capacity: self.capacity,
        })
    }

    /// Removes the ticket at `index`, shifting later tickets forward.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::IndexOutOfRange`] when `index >= len`.
    pub fn dequeue_at(&mut self, index: usize) -> Result<Ticket, QueueError> {
        if index >= self.tickets.len() {
            return Err(QueueError::IndexOutOfRange {
                index,
                len: self.tickets.len(),
            });
        }
        Ok(self.tickets.remove(index))
    }

    #[must_use]
    pub fn front(&self) -> Option<Ticket> {
        self.tickets.first().copied()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Ticket> {
        self.tickets.get(index).copied()
    }

    /// Zero-based slot currently holding `ticket`.
    #[must_use]
    pub fn position_of(&self, ticket: Ticket) -> Option<usize> {
        self.tickets.iter().position(|queued| *queued == ticket)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.tickets.len() >= self.capacity
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> slice::Iter<'_, Ticket> {
        self.tickets.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Naive wait for the whole queue: `len * per_ticket_seconds`.
    #[must_use]
    pub fn wait_seconds(&self, per_ticket_seconds: u8) -> u32 {
        u32::try_from(self.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(u32::from(per_ticket_seconds))
    }
}

impl Default for TicketQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl<'a> IntoIterator for &'a TicketQueue {
    type Item = &'a Ticket;
    type IntoIter = slice::Iter<'a, Ticket>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
