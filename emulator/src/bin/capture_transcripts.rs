use std::io;

#[allow(dead_code)]
#[path = "../session.rs"]
mod session;

#[allow(dead_code)]
#[path = "../terminal.rs"]
mod terminal;

use kiosk_core::KioskConfig;
use session::{Session, TranscriptProfile};

fn main() -> io::Result<()> {
    for profile in TranscriptProfile::ALL {
        record_profile(profile)?;
    }
    Ok(())
}

fn record_profile(profile: TranscriptProfile) -> io::Result<()> {
    match profile {
        TranscriptProfile::Customer => {
            let mut session = Session::new(profile, &KioskConfig::default())?;
            record_customer(&mut session)
        }
        TranscriptProfile::Admin => {
            let mut session = Session::new(profile, &KioskConfig::default())?;
            record_admin(&mut session)
        }
        TranscriptProfile::Service => {
            let config = KioskConfig::default().with_per_ticket_seconds(5);
            let mut session = Session::new(profile, &config)?;
            record_service(&mut session)
        }
    }
}

fn run(session: &mut Session, lines: &[&str]) -> io::Result<()> {
    for line in lines {
        let _ = session.handle_command(line)?;
    }
    Ok(())
}

fn record_customer(session: &mut Session) -> io::Result<()> {
    run(
        session,
        &[
            "help",
            "press 860 2075 samples=50",
            "screen",
            "advance 10s",
            "tap 120 250",
            "tap 120 275",
            "status",
            "queue",
        ],
    )
}

fn record_admin(session: &mut Session) -> io::Result<()> {
    run(
        session,
        &[
            "tap 120 250",
            "tap 120 275",
            "tap 120 250",
            "tap 120 275",
            // Admin icon, then 1 2 3 4 ENTER.
            "tap 216 24",
            "tap 96 110",
            "tap 148 110",
            "tap 200 110",
            "tap 44 154",
            "tap 207 292",
            "tap 120 95",
            "screen",
            // Second slot, then YES.
            "tap 177 55",
            "tap 74 192",
            "queue",
            "history",
        ],
    )
}

fn record_service(session: &mut Session) -> io::Result<()> {
    run(
        session,
        &[
            "tap 120 250",
            "tap 120 275",
            "tap 120 250",
            "tap 120 275",
            "status",
            "advance 5s",
            "queue",
            "advance 5s",
            "status",
        ],
    )
}
