//! Command table shared by the parser and the `help` output.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandTag {
    Tap,
    Press,
    Release,
    Advance,
    Status,
    Queue,
    History,
    Help,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub tag: CommandTag,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "tap",
        tag: CommandTag::Tap,
        usage: "tap <x> <y>",
        summary: "deliver a confirmed touch at screen coordinates",
    },
    CommandSpec {
        name: "press",
        tag: CommandTag::Press,
        usage: "press <raw-x> <raw-y> [samples=<n>]",
        summary: "hold the panel at a raw reading for n poll cycles",
    },
    CommandSpec {
        name: "release",
        tag: CommandTag::Release,
        usage: "release",
        summary: "run one untouched poll cycle",
    },
    CommandSpec {
        name: "advance",
        tag: CommandTag::Advance,
        usage: "advance <duration>",
        summary: "move the clock forward, e.g. 500ms or 10s",
    },
    CommandSpec {
        name: "status",
        tag: CommandTag::Status,
        usage: "status",
        summary: "screen, queue depth, service time, and clocks",
    },
    CommandSpec {
        name: "queue",
        tag: CommandTag::Queue,
        usage: "queue",
        summary: "list outstanding tickets",
    },
    CommandSpec {
        name: "history",
        tag: CommandTag::History,
        usage: "history",
        summary: "recorded kiosk events",
    },
    CommandSpec {
        name: "help",
        tag: CommandTag::Help,
        usage: "help [command]",
        summary: "list commands or describe one",
    },
];

/// Looks up a command keyword, ignoring ASCII case.
#[must_use]
pub fn find(keyword: &str) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(keyword))
}
