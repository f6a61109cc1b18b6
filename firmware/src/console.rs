//! Serial console plumbing for the board.
//!
//! [`LineAssembler`] turns the CDC byte stream into lines, and [`KioskTarget`]
//! lets the shared [`ConsoleExecutor`] drive the live kiosk. Commands that need
//! a simulated panel or clock are refused.

#![cfg_attr(not(target_os = "none"), allow(dead_code))]

use core::fmt::Write;
use core::str;
use core::time::Duration;

use heapless::{String, Vec};
use kiosk_core::console::{ConsoleExecutor, ConsoleTarget, StatusSnapshot, TargetError};
use kiosk_core::render::Renderer;
use kiosk_core::telemetry::EventRecorder;
use kiosk_core::touch::{RawSample, ScreenPoint, TouchSensor};
use kiosk_core::{Clock, Kiosk, Millis, ScreenState, Ticket};

/// Maximum number of bytes accepted on a single line (excluding terminator).
pub const MAX_LINE_LEN: usize = 96;
/// Reply buffer size; `history` is the longest reply and is truncated to fit.
pub const MAX_REPLY_LEN: usize = 1024;

pub type Reply = String<MAX_REPLY_LEN>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineError {
    /// The line outgrew [`MAX_LINE_LEN`]; input is dropped until the next terminator.
    Overflow,
    InvalidUtf8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LinkState {
    Disconnected,
    Connected,
    /// Skipping the rest of an overlong line.
    Discarding,
}

pub struct LineAssembler {
    buffer: Vec<u8, MAX_LINE_LEN>,
    state: LinkState,
}

impl LineAssembler {
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            state: LinkState::Disconnected,
        }
    }

    /// Host opened the port.
    pub fn on_connect(&mut self) {
        self.state = LinkState::Connected;
        self.buffer.clear();
    }

    /// Host closed the port.
    pub fn on_disconnect(&mut self) {
        self.state = LinkState::Disconnected;
        self.buffer.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.state != LinkState::Disconnected
    }

    /// Feeds one byte. A terminator hands the completed line to `on_line`.
    ///
    /// # Errors
    ///
    /// Reports overflow once per overlong line and lines that are not UTF-8.
    pub fn ingest<F>(&mut self, byte: u8, on_line: F) -> Result<(), LineError>
    where
        F: FnOnce(&str),
    {
        match (self.state, byte) {
            (LinkState::Disconnected, _) => Ok(()),
            (LinkState::Discarding, b'\r' | b'\n') => {
                self.state = LinkState::Connected;
                Ok(())
            }
            (LinkState::Discarding, _) => Ok(()),
            (LinkState::Connected, b'\r' | b'\n') => self.finish_line(on_line),
            (LinkState::Connected, 0x08 | 0x7f) => {
                self.buffer.pop();
                Ok(())
            }
            (LinkState::Connected, value) => {
                if self.buffer.push(value).is_err() {
                    self.buffer.clear();
                    self.state = LinkState::Discarding;
                    return Err(LineError::Overflow);
                }
                Ok(())
            }
        }
    }

    fn finish_line<F>(&mut self, on_line: F) -> Result<(), LineError>
    where
        F: FnOnce(&str),
    {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let result = match str::from_utf8(&self.buffer) {
            Ok(line) => {
                on_line(line.trim());
                Ok(())
            }
            Err(_) => Err(LineError::InvalidUtf8),
        };
        self.buffer.clear();
        result
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Console view of a kiosk running on real hardware.
pub struct KioskTarget<'a, S, R, C> {
    kiosk: &'a mut Kiosk<S, R>,
    clock: &'a C,
}

impl<'a, S, R, C> KioskTarget<'a, S, R, C> {
    pub fn new(kiosk: &'a mut Kiosk<S, R>, clock: &'a C) -> Self {
        Self { kiosk, clock }
    }
}

impl<S, R, C> ConsoleTarget for KioskTarget<'_, S, R, C>
where
    S: TouchSensor,
    R: Renderer,
    C: Clock,
{
    fn now(&self) -> Millis {
        self.clock.now()
    }

    fn tap(&mut self, point: ScreenPoint) -> Result<(), TargetError> {
        self.kiosk
            .inject_touch(point, self.clock.now())
            .map_err(|_| TargetError::Device)
    }

    fn press(&mut self, _raw: RawSample, _samples: u16) -> Result<Option<ScreenPoint>, TargetError> {
        Err(TargetError::Unsupported("press on hardware"))
    }

    fn release(&mut self) -> Result<(), TargetError> {
        self.kiosk
            .poll(self.clock.now())
            .map(|_| ())
            .map_err(|_| TargetError::Device)
    }

    fn advance(&mut self, _by: Duration) -> Result<(), TargetError> {
        Err(TargetError::Unsupported("advance on hardware"))
    }

    fn screen(&self) -> ScreenState {
        self.kiosk.state()
    }

    fn status(&self) -> StatusSnapshot {
        StatusSnapshot::capture(self.kiosk, self.clock.now())
    }

    fn tickets(&self) -> &[Ticket] {
        self.kiosk.context().queue.as_slice()
    }

    fn history(&self) -> &EventRecorder {
        self.kiosk.history()
    }
}

/// Runs one console line against `kiosk` and returns the reply text.
pub fn respond<S, R, C>(kiosk: &mut Kiosk<S, R>, clock: &C, line: &str, samples: u16) -> Reply
where
    S: TouchSensor,
    R: Renderer,
    C: Clock,
{
    let mut executor = ConsoleExecutor::new(KioskTarget::new(kiosk, clock), samples);
    let mut reply = Reply::new();
    if let Err(err) = executor.execute(line, &mut reply) {
        // A full buffer still carries the lines that fit.
        let _ = writeln!(reply, "ERR {err}");
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_core::console::BenchSensor;
    use kiosk_core::render::NullRenderer;
    use kiosk_core::KioskConfig;

    struct FixedClock(u32);

    impl Clock for FixedClock {
        fn now(&self) -> Millis {
            Millis::new(self.0)
        }
    }

    fn kiosk() -> Kiosk<BenchSensor, NullRenderer> {
        let mut kiosk = Kiosk::new(
            BenchSensor::default(),
            NullRenderer::default(),
            &KioskConfig::default(),
            Millis::ZERO,
        );
        kiosk.start(Millis::ZERO).unwrap();
        kiosk
    }

    fn feed(assembler: &mut LineAssembler, bytes: &[u8]) -> (usize, Result<(), LineError>) {
        let mut lines = 0;
        let mut last = Ok(());
        for byte in bytes {
            last = assembler.ingest(*byte, |_| lines += 1);
        }
        (lines, last)
    }

    #[test]
    fn bytes_are_ignored_until_connected() {
        let mut assembler = LineAssembler::new();
        assert_eq!(feed(&mut assembler, b"status\n").0, 0);

        assembler.on_connect();
        assert_eq!(feed(&mut assembler, b"status\r\n").0, 1);
    }

    #[test]
    fn backspace_edits_the_line() {
        let mut assembler = LineAssembler::new();
        assembler.on_connect();
        let mut seen = String::<16>::new();
        for byte in b"queux\x08e" {
            assembler.ingest(*byte, |_| {}).unwrap();
        }
        assembler
            .ingest(b'\n', |line| seen.push_str(line).unwrap())
            .unwrap();
        assert_eq!(seen.as_str(), "queue");
    }

    #[test]
    fn overlong_line_is_dropped_whole() {
        let mut assembler = LineAssembler::new();
        assembler.on_connect();
        for _ in 0..MAX_LINE_LEN {
            assembler.ingest(b'a', |_| {}).unwrap();
        }
        assert_eq!(assembler.ingest(b'b', |_| {}), Err(LineError::Overflow));
        assert_eq!(feed(&mut assembler, b"ccc\n"), (0, Ok(())));
        assert_eq!(feed(&mut assembler, b"help\n").0, 1);
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut assembler = LineAssembler::new();
        assembler.on_connect();
        assert_eq!(feed(&mut assembler, &[0xFF, b'\n']).1, Err(LineError::InvalidUtf8));
    }

    #[test]
    fn tap_drives_the_live_kiosk() {
        let mut kiosk = kiosk();
        let reply = respond(&mut kiosk, &FixedClock(500), "tap 120 250", 50);
        assert_eq!(reply.as_str(), "OK tap (120, 250) screen=ticket-issued\n");
        assert_eq!(kiosk.context().queue.len(), 1);
    }

    #[test]
    fn simulation_only_commands_are_refused() {
        let mut kiosk = kiosk();
        let clock = FixedClock(0);
        assert_eq!(
            respond(&mut kiosk, &clock, "advance 1s", 50).as_str(),
            "ERR unsupported advance on hardware\n"
        );
        assert_eq!(
            respond(&mut kiosk, &clock, "press 1 2", 50).as_str(),
            "ERR unsupported press on hardware\n"
        );
    }
}
