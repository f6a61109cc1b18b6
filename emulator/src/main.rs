mod session;
mod terminal;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use crossterm::style::{Color, Stylize};
use kiosk_core::KioskConfig;
use session::{Reply, Session, Tone, TranscriptProfile};

const USAGE: &str = "Usage: kiosk-emulator [--profile <customer|admin|service>] [--per-ticket <1-99>]";

struct Options {
    profile: Option<TranscriptProfile>,
    per_ticket: Option<u8>,
}

fn main() -> io::Result<()> {
    let options = parse_options().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("{USAGE}");
        process::exit(2);
    });

    let mut config = KioskConfig::default();
    if let Some(seconds) = options.per_ticket {
        config = config.with_per_ticket_seconds(seconds);
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut session = match options.profile {
        Some(profile) => Session::new(profile, &config)?,
        None => Session::detached(&config),
    };
    let mut line = String::new();

    writeln!(
        writer,
        "Ticket Kiosk Emulator ready. Type `help` for commands, `screen` to view the panel, or `exit` to quit."
    )?;

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        for reply in session.handle_command(trimmed)? {
            write_reply(&mut writer, &reply)?;
        }
    }

    Ok(())
}

fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> io::Result<()> {
    let text = reply.text.as_str();
    match reply.tone {
        Tone::Plain => writeln!(writer, "{text}"),
        Tone::Ok => writeln!(writer, "{}", text.green()),
        Tone::Error => writeln!(writer, "{}", text.red()),
        Tone::Event => writeln!(writer, "{}", text.with(Color::Cyan)),
        Tone::Panel(colour) => writeln!(writer, "{}", text.with(terminal::terminal_colour(colour))),
    }
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_options() -> Result<Options, String> {
    let mut options = Options {
        profile: None,
        per_ticket: None,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--profile=") {
            options.profile = Some(TranscriptProfile::from_tag(value)?);
        } else if arg == "--profile" {
            let value = args.next().ok_or("Expected value after --profile")?;
            options.profile = Some(TranscriptProfile::from_tag(&value)?);
        } else if let Some(value) = arg.strip_prefix("--per-ticket=") {
            options.per_ticket = Some(parse_per_ticket(value)?);
        } else if arg == "--per-ticket" {
            let value = args.next().ok_or("Expected value after --per-ticket")?;
            options.per_ticket = Some(parse_per_ticket(&value)?);
        } else {
            return Err(format!("Unexpected argument `{arg}`"));
        }
    }
    Ok(options)
}

fn parse_per_ticket(value: &str) -> Result<u8, String> {
    match value.parse::<u8>() {
        Ok(seconds @ 1..=99) => Ok(seconds),
        _ => Err(format!("Service time must be 1-99 seconds, got `{value}`")),
    }
}
