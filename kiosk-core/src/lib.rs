#![no_std]

// Shared logic for the ticket kiosk.
//
// Everything here runs on the MCU firmware and in the host emulator alike, so the
// crate avoids the standard library and reaches hardware only through traits.

pub mod clock;
pub mod config;
pub mod console;
pub mod kiosk;
pub mod queue;
pub mod render;
pub mod screen;
pub mod telemetry;
pub mod timing;
pub mod touch;

pub use clock::{Clock, Millis};
pub use config::KioskConfig;
pub use kiosk::Kiosk;
pub use queue::{QueueError, Ticket, TicketQueue};
pub use screen::ScreenState;
