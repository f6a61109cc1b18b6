use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use kiosk_core::console::{Bench, ConsoleExecutor, ConsoleTarget};
use kiosk_core::render::Rgb565;
use kiosk_core::telemetry::EventId;
use kiosk_core::{KioskConfig, Millis};

use crate::terminal::TerminalRenderer;

/// Scripted scenario a transcript is recorded under.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TranscriptProfile {
    Customer,
    Admin,
    Service,
}

impl TranscriptProfile {
    pub const ALL: [TranscriptProfile; 3] = [
        TranscriptProfile::Customer,
        TranscriptProfile::Admin,
        TranscriptProfile::Service,
    ];

    pub fn log_path(self) -> &'static str {
        match self {
            TranscriptProfile::Customer => "transcripts/emulator-customer.log",
            TranscriptProfile::Admin => "transcripts/emulator-admin.log",
            TranscriptProfile::Service => "transcripts/emulator-service.log",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            TranscriptProfile::Customer => "Ticket kiosk emulator customer transcript",
            TranscriptProfile::Admin => "Ticket kiosk emulator admin transcript",
            TranscriptProfile::Service => "Ticket kiosk emulator service-time transcript",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, String> {
        Self::ALL
            .into_iter()
            .find(|profile| profile.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| format!("Unknown transcript profile `{tag}`"))
    }

    pub fn tag(self) -> &'static str {
        match self {
            TranscriptProfile::Customer => "customer",
            TranscriptProfile::Admin => "admin",
            TranscriptProfile::Service => "service",
        }
    }
}

/// How a reply line should be shown on a colour terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tone {
    Plain,
    Ok,
    Error,
    Event,
    /// Text copied off the simulated panel, in its panel colour.
    Panel(Rgb565),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reply {
    pub text: String,
    pub tone: Tone,
}

impl Reply {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

pub struct Session {
    executor: ConsoleExecutor<Bench<TerminalRenderer>>,
    transcript: Option<TranscriptLogger>,
    event_cursor: EventId,
}

impl Session {
    /// Session that records every exchange under `profile`'s transcript path.
    pub fn new(profile: TranscriptProfile, config: &KioskConfig) -> io::Result<Self> {
        let transcript = TranscriptLogger::new(profile)?;
        let mut session = Self::detached(config);
        session.transcript = Some(transcript);
        Ok(session)
    }

    /// Session without a transcript file.
    pub fn detached(config: &KioskConfig) -> Self {
        let Ok(bench) = Bench::new(TerminalRenderer::new(), config);
        let executor = ConsoleExecutor::new(bench, config.stabilizer.confirm_threshold);
        Self {
            executor,
            transcript: None,
            event_cursor: 0,
        }
    }

    pub fn now(&self) -> Millis {
        self.executor.target().now()
    }

    pub fn renderer(&self) -> &TerminalRenderer {
        self.executor.target().kiosk().renderer()
    }

    pub fn handle_command(&mut self, line: &str) -> io::Result<Vec<Reply>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let issued_at = self.now();
        self.log(issued_at, TranscriptRole::Host, trimmed)?;

        let mut replies = if trimmed.eq_ignore_ascii_case("screen") {
            self.panel_replies()
        } else {
            self.execute(trimmed)
        };
        replies.extend(self.drain_events());

        let now = self.now();
        for reply in &replies {
            self.log(now, TranscriptRole::Emulator, &reply.text)?;
        }
        Ok(replies)
    }

    fn execute(&mut self, line: &str) -> Vec<Reply> {
        let mut output = String::new();
        match self.executor.execute(line, &mut output) {
            Ok(_) => output
                .lines()
                .map(|text| {
                    let tone = if text.starts_with("OK") {
                        Tone::Ok
                    } else {
                        Tone::Plain
                    };
                    Reply::new(text, tone)
                })
                .collect(),
            Err(err) => vec![Reply::new(format!("ERR {err}"), Tone::Error)],
        }
    }

    fn panel_replies(&self) -> Vec<Reply> {
        let screen = self.executor.target().screen();
        let mut replies = vec![Reply::new(format!("panel {screen}"), Tone::Plain)];
        replies.extend(self.renderer().cells().iter().map(|cell| {
            Reply::new(
                format!("{:>3},{:>3} {}", cell.origin.x, cell.origin.y, cell.text),
                Tone::Panel(cell.colour),
            )
        }));
        replies
    }

    fn drain_events(&mut self) -> Vec<Reply> {
        let history = self.executor.target().history();
        let replies = history
            .since(self.event_cursor)
            .map(|record| Reply::new(format!("event {record}"), Tone::Event))
            .collect();
        self.event_cursor = history.next_id();
        replies
    }

    fn log(&mut self, at: Millis, role: TranscriptRole, line: &str) -> io::Result<()> {
        match self.transcript.as_mut() {
            Some(transcript) => transcript.append_line(at, role, line),
            None => Ok(()),
        }
    }
}

struct TranscriptLogger {
    writer: BufWriter<std::fs::File>,
}

impl TranscriptLogger {
    fn new(profile: TranscriptProfile) -> io::Result<Self> {
        let path = Path::new(profile.log_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut logger = Self {
            writer: BufWriter::new(file),
        };

        logger.write_header(profile)?;
        Ok(logger)
    }

    fn write_header(&mut self, profile: TranscriptProfile) -> io::Result<()> {
        writeln!(self.writer, "# {}", profile.header())?;
        writeln!(
            self.writer,
            "# Timestamps are simulated kiosk milliseconds"
        )?;
        writeln!(self.writer)?;
        self.writer.flush()
    }

    fn append_line(&mut self, at: Millis, role: TranscriptRole, line: &str) -> io::Result<()> {
        writeln!(
            self.writer,
            "[+{:>6} ms] {} {}",
            at.as_u32(),
            role.prefix(),
            line
        )?;
        self.writer.flush()
    }
}

enum TranscriptRole {
    Host,
    Emulator,
}

impl TranscriptRole {
    fn prefix(&self) -> &'static str {
        match self {
            TranscriptRole::Host => "HOST>",
            TranscriptRole::Emulator => "EMU <",
        }
    }
}
