//! `status` command rendering.
//!
//! Front-ends build a [`StatusSnapshot`] from their kiosk and hand it to
//! [`StatusFormatter`], so the emulator and a serial console print identical
//! lines.

use core::fmt;
use core::time::Duration;

use crate::clock::Millis;
use crate::kiosk::Kiosk;
use crate::queue::Ticket;
use crate::render::Renderer;
use crate::screen::ScreenState;
use crate::timing::WaitTime;
use crate::touch::{StabilizerState, TouchSensor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub now: Millis,
    pub screen: ScreenState,
    pub queue_len: usize,
    pub queue_capacity: usize,
    pub front: Option<Ticket>,
    pub tickets_issued: u32,
    pub per_ticket_seconds: u8,
    pub wait: WaitTime,
    pub serving_for: Duration,
    pub since_issue: Duration,
    pub stabilizer: StabilizerState,
    pub flashing: bool,
}

impl StatusSnapshot {
    /// Captures the kiosk's state at `now`.
    pub fn capture<S, R>(kiosk: &Kiosk<S, R>, now: Millis) -> Self
    where
        S: TouchSensor,
        R: Renderer,
    {
        let ctx = kiosk.context();
        Self {
            now,
            screen: kiosk.state(),
            queue_len: ctx.queue.len(),
            queue_capacity: ctx.queue.capacity(),
            front: ctx.queue.front(),
            tickets_issued: ctx.dispenser.issued(),
            per_ticket_seconds: ctx.timing.per_ticket_seconds(),
            wait: ctx.current_wait(now),
            serving_for: now.elapsed_since(ctx.clocks.last_process_time),
            since_issue: now.elapsed_since(ctx.clocks.ticket_issue_time),
            stabilizer: kiosk.stabilizer().state(),
            flashing: kiosk.is_flashing(),
        }
    }
}

/// Renders a [`StatusSnapshot`] into human-readable lines.
#[derive(Clone, Copy, Debug)]
pub struct StatusFormatter<'a> {
    snapshot: &'a StatusSnapshot,
}

impl<'a> StatusFormatter<'a> {
    #[must_use]
    pub const fn new(snapshot: &'a StatusSnapshot) -> Self {
        Self { snapshot }
    }

    /// Writes the screen line (e.g. `screen user-main at 1500ms touch=idle flash=off`).
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write_screen_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(
            writer,
            "screen {} at {} touch=",
            self.snapshot.screen, self.snapshot.now
        )?;
        match self.snapshot.stabilizer {
            StabilizerState::Idle => writer.write_str("idle")?,
            StabilizerState::Accumulating { count, .. } => write!(writer, "pressing({count})")?,
            StabilizerState::Settling { .. } => writer.write_str("settling")?,
        }
        writer.write_str(" flash=")?;
        writer.write_str(if self.snapshot.flashing { "on" } else { "off" })
    }

    /// Writes the queue line (e.g. `queue 3/20 front=#001 issued=3 wait=02:50`).
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write_queue_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(
            writer,
            "queue {}/{} front=",
            self.snapshot.queue_len, self.snapshot.queue_capacity
        )?;
        match self.snapshot.front {
            Some(ticket) => write!(writer, "{ticket}")?,
            None => writer.write_str("none")?,
        }
        write!(
            writer,
            " issued={} wait={}",
            self.snapshot.tickets_issued, self.snapshot.wait
        )
    }

    /// Writes the timing line (e.g. `timing per-ticket=60s serving=+12.3s issued=+1.0s`).
    ///
    /// # Errors
    ///
    /// Propagates writer failures.
    pub fn write_timing_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(
            writer,
            "timing per-ticket={}s serving=",
            self.snapshot.per_ticket_seconds
        )?;
        write_duration(writer, self.snapshot.serving_for)?;
        writer.write_str(" issued=")?;
        write_duration(writer, self.snapshot.since_issue)
    }
}

pub(crate) fn write_duration<W: fmt::Write>(writer: &mut W, duration: Duration) -> fmt::Result {
    if duration >= Duration::from_secs(1) {
        let millis = duration.as_millis();
        write!(writer, "+{}.{}s", millis / 1_000, (millis % 1_000) / 100)
    } else {
        write!(writer, "+{}ms", duration.as_millis())
    }
}
