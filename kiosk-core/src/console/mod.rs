//! Bench console shared by the emulator and serial front-ends.

pub mod bench;
pub mod catalog;
pub mod commands;
pub mod grammar;
pub mod status;

pub use bench::{Bench, BenchClock, BenchSensor};
pub use commands::{CommandError, CommandOutcome, ConsoleExecutor, ConsoleTarget, TargetError};
pub use grammar::{Command, ParseError, parse};
pub use status::{StatusFormatter, StatusSnapshot};
