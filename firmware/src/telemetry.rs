//! Mirrors kiosk events to the debug log.
//!
//! The kiosk keeps its own bounded history; this module only remembers how far
//! it has already logged so every record goes out once.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

use kiosk_core::telemetry::{EventId, EventRecord, EventRecorder};

pub struct EventMirror {
    cursor: EventId,
}

impl EventMirror {
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Logs every record added since the previous call; returns how many.
    pub fn flush<const N: usize>(&mut self, history: &EventRecorder<N>) -> usize {
        let mut logged = 0;
        for record in history.since(self.cursor) {
            emit_log(record);
            logged += 1;
        }
        self.cursor = history.next_id();
        logged
    }
}

impl Default for EventMirror {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "none")]
fn emit_log(record: &EventRecord) {
    defmt::info!("kiosk: {}", defmt::Display2Format(record));
}

#[cfg(not(target_os = "none"))]
fn emit_log(record: &EventRecord) {
    println!("kiosk: {record}");
}
