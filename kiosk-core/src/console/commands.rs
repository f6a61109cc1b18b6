//! Console command dispatcher.
//!
//! [`ConsoleExecutor`] parses a line, drives a [`ConsoleTarget`], and writes
//! the reply into any `fmt::Write` sink. It stays `no_std` so a serial console
//! on the board can reuse it.

use core::fmt;
use core::time::Duration;

use crate::clock::Millis;
use crate::queue::Ticket;
use crate::screen::ScreenState;
use crate::telemetry::EventRecorder;
use crate::touch::{RawSample, ScreenPoint};

use super::catalog::{self, COMMANDS};
use super::grammar::{self, Command};
use super::status::{StatusFormatter, StatusSnapshot};

/// Failures reported by a [`ConsoleTarget`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetError {
    /// The target cannot perform this command (e.g. moving a hardware clock).
    Unsupported(&'static str),
    /// Sensor or display driver failure.
    Device,
}

/// Kiosk front-end the console drives.
pub trait ConsoleTarget {
    fn now(&self) -> Millis;

    /// Delivers a confirmed touch.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Device`] when the resulting redraw fails.
    fn tap(&mut self, point: ScreenPoint) -> Result<(), TargetError>;

    /// Holds the panel at `raw` for `samples` poll cycles, then lifts the pen.
    ///
    /// Returns the first touch confirmed while held.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError`] when the target cannot simulate the panel.
    fn press(&mut self, raw: RawSample, samples: u16) -> Result<Option<ScreenPoint>, TargetError>;

    /// Runs one untouched poll cycle.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Device`] on driver failure.
    fn release(&mut self) -> Result<(), TargetError>;

    /// Moves the clock forward, polling along the way.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Unsupported`] for targets with a real clock.
    fn advance(&mut self, by: Duration) -> Result<(), TargetError>;

    fn screen(&self) -> ScreenState;

    fn status(&self) -> StatusSnapshot;

    fn tickets(&self) -> &[Ticket];

    fn history(&self) -> &EventRecorder;
}

/// What a successfully executed line did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Tapped { screen: ScreenState },
    Pressed {
        confirmed: Option<ScreenPoint>,
        screen: ScreenState,
    },
    Released { screen: ScreenState },
    Advanced { now: Millis, screen: ScreenState },
    /// Only printed information.
    Reported,
}

/// Errors surfaced while executing a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError<'a> {
    Parse(grammar::ParseError<'a>),
    UnknownTopic(&'a str),
    Target(TargetError),
    Output,
}

impl<'a> From<grammar::ParseError<'a>> for CommandError<'a> {
    fn from(error: grammar::ParseError<'a>) -> Self {
        Self::Parse(error)
    }
}

impl From<TargetError> for CommandError<'_> {
    fn from(error: TargetError) -> Self {
        Self::Target(error)
    }
}

impl From<fmt::Error> for CommandError<'_> {
    fn from(_: fmt::Error) -> Self {
        Self::Output
    }
}

impl fmt::Display for CommandError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Parse(err) => write!(f, "syntax {err}"),
            CommandError::UnknownTopic(topic) => write!(f, "no help for `{topic}`"),
            CommandError::Target(TargetError::Unsupported(what)) => {
                write!(f, "unsupported {what}")
            }
            CommandError::Target(TargetError::Device) => f.write_str("device error"),
            CommandError::Output => f.write_str("output overflow"),
        }
    }
}

type CommandResult<'a> = Result<CommandOutcome, CommandError<'a>>;

pub struct ConsoleExecutor<T> {
    target: T,
    default_samples: u16,
}

impl<T> ConsoleExecutor<T> {
    /// `default_samples` is used by `press` without `samples=`; the touch
    /// confirmation threshold makes a single press register.
    pub const fn new(target: T, default_samples: u16) -> Self {
        Self {
            target,
            default_samples,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_inner(self) -> T {
        self.target
    }
}

impl<T> ConsoleExecutor<T>
where
    T: ConsoleTarget,
{
    /// Parses and executes one console line, writing the reply to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] for syntax errors, target failures, and a full
    /// output sink.
    pub fn execute<'a, W: fmt::Write>(&mut self, line: &'a str, out: &mut W) -> CommandResult<'a> {
        let command = grammar::parse(line)?;
        self.dispatch(command, out)
    }

    fn dispatch<'a, W: fmt::Write>(&mut self, command: Command<'a>, out: &mut W) -> CommandResult<'a> {
        match command {
            Command::Tap { x, y } => {
                let point = ScreenPoint::new(x, y);
                self.target.tap(point)?;
                let screen = self.target.screen();
                writeln!(out, "OK tap {point} screen={screen}")?;
                Ok(CommandOutcome::Tapped { screen })
            }
            Command::Press {
                raw_x,
                raw_y,
                samples,
            } => {
                let samples = samples.unwrap_or(self.default_samples);
                let confirmed = self.target.press(RawSample::new(raw_x, raw_y), samples)?;
                let screen = self.target.screen();
                match confirmed {
                    Some(point) => writeln!(out, "OK press confirmed {point} screen={screen}")?,
                    None => writeln!(out, "OK press unconfirmed after {samples} samples")?,
                }
                Ok(CommandOutcome::Pressed { confirmed, screen })
            }
            Command::Release => {
                self.target.release()?;
                let screen = self.target.screen();
                writeln!(out, "OK release screen={screen}")?;
                Ok(CommandOutcome::Released { screen })
            }
            Command::Advance(by) => {
                self.target.advance(by)?;
                let now = self.target.now();
                let screen = self.target.screen();
                writeln!(out, "OK now={now} screen={screen}")?;
                Ok(CommandOutcome::Advanced { now, screen })
            }
            Command::Status => {
                let snapshot = self.target.status();
                let formatter = StatusFormatter::new(&snapshot);
                formatter.write_screen_line(out)?;
                out.write_char('\n')?;
                formatter.write_queue_line(out)?;
                out.write_char('\n')?;
                formatter.write_timing_line(out)?;
                out.write_char('\n')?;
                Ok(CommandOutcome::Reported)
            }
            Command::Queue => {
                let tickets = self.target.tickets();
                if tickets.is_empty() {
                    writeln!(out, "queue empty")?;
                }
                for (index, ticket) in tickets.iter().enumerate() {
                    writeln!(out, "{:>2}. {ticket}", index + 1)?;
                }
                Ok(CommandOutcome::Reported)
            }
            Command::History => {
                let history = self.target.history();
                if history.is_empty() {
                    writeln!(out, "history empty")?;
                }
                for record in history.oldest_first() {
                    writeln!(out, "{record}")?;
                }
                Ok(CommandOutcome::Reported)
            }
            Command::Help { topic: None } => {
                for spec in COMMANDS {
                    writeln!(out, "{:<36} {}", spec.usage, spec.summary)?;
                }
                Ok(CommandOutcome::Reported)
            }
            Command::Help { topic: Some(topic) } => {
                let spec = catalog::find(topic).ok_or(CommandError::UnknownTopic(topic))?;
                writeln!(out, "usage: {}", spec.usage)?;
                writeln!(out, "{}", spec.summary)?;
                Ok(CommandOutcome::Reported)
            }
        }
    }
}
