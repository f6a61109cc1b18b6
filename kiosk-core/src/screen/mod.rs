//! Screen state machine.
//!
//! [`step`] is a pure transition function over a [`KioskContext`]: it consumes
//! one confirmed touch or one tick and reports the next screen together with the
//! drawing and bookkeeping [`Effect`]s the runtime has to carry out.

mod context;
pub mod layout;
mod machine;
pub mod session;
mod state;

pub use context::{IssuedTicket, KioskContext, Selection};
pub use layout::{Control, Rect, Region};
pub use machine::step;
pub use session::{AdminSession, AuthError, PinEntry};
pub use state::ScreenState;

use heapless::Vec;

use crate::telemetry::KioskEvent;
use crate::touch::ScreenPoint;

/// Upper bound on effects produced by one step.
pub const MAX_EFFECTS: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// Stabilized touch at a screen coordinate.
    Touch(ScreenPoint),
    /// One poll cycle elapsed.
    Tick,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Redraw the whole of [`Step::next`].
    Repaint,
    /// Redraw only the wait-time line on the customer screen.
    RefreshWaitTime,
    /// Redraw the PIN field on a keypad screen.
    RefreshPinEntry,
    /// Redraw the value on the service-time screen.
    RefreshServiceTime,
    /// Highlight a pressed button until the flash window ends.
    Flash(Region),
    Record(KioskEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub next: ScreenState,
    pub effects: Vec<Effect, MAX_EFFECTS>,
}

impl Step {
    /// Remains on `state` with no effects.
    #[must_use]
    pub const fn stay(state: ScreenState) -> Self {
        Self {
            next: state,
            effects: Vec::new(),
        }
    }

    /// Moves to `next` and schedules a full repaint.
    #[must_use]
    pub fn goto(mut self, next: ScreenState) -> Self {
        self.next = next;
        self.push(Effect::Repaint);
        self
    }

    #[must_use]
    pub fn with(mut self, effect: Effect) -> Self {
        self.push(effect);
        self
    }

    /// Adds `effect`, dropping duplicate repaints.
    pub fn push(&mut self, effect: Effect) {
        if effect == Effect::Repaint && self.repaints() {
            return;
        }
        // MAX_EFFECTS covers the longest sequence any transition emits.
        let _ = self.effects.push(effect);
    }

    #[must_use]
    pub fn repaints(&self) -> bool {
        self.effects.contains(&Effect::Repaint)
    }

    /// Events to append to the history, in emission order.
    pub fn events(&self) -> impl Iterator<Item = KioskEvent> + '_ {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Record(event) => Some(*event),
            _ => None,
        })
    }
}
