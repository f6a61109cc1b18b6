#![allow(clippy::module_name_repetitions)]

//! Lexer and parser for bench console lines.
//!
//! `regal` turns a line into a bounded token buffer; `winnow` combinators then
//! walk the tokens and build a [`Command`].

use core::fmt;
use core::ops::Range;
use core::time::Duration;

use heapless::Vec as HeaplessVec;
use regal::IncrementalError;
use regal::TokenCache;
use regal_macros::RegalLexer;
use winnow::combinator::opt;
use winnow::error::{ErrMode, ParserError};
use winnow::prelude::*;
use winnow::stream::Stream;

use super::catalog::{self, CommandTag};

/// Maximum number of tokens per console line.
pub const MAX_TOKENS: usize = 16;
const MAX_CACHE_RECORDS: usize = MAX_TOKENS * 2;

#[derive(RegalLexer, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TokenKind {
    /// Integer followed by `ms` or `s`.
    #[regex(r"[0-9]+(?:ms|s)", priority = 2)]
    Duration,
    #[regex(r"[0-9]+")]
    Integer,
    /// Keyword or option name (case-insensitive match performed later).
    #[regex(r"[A-Za-z][A-Za-z0-9-]*")]
    Ident,
    #[token("=")]
    Equals,
    #[regex(r"[ \t]+", skip)]
    Whitespace,
    #[token("\r\n")]
    #[token("\n")]
    #[token("\r")]
    Eol,
    #[default]
    #[regex(r".", priority = 1024)]
    Error,
}

/// Token with its byte span in the source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: Range<usize>,
}

pub type TokenBuffer<'a> = HeaplessVec<Token<'a>, MAX_TOKENS>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    TooManyTokens { processed: usize },
    Engine,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::TooManyTokens { processed } => {
                write!(f, "line too long after {processed} tokens")
            }
            LexError::Engine => f.write_str("lexer engine error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrammarErrorKind<'a> {
    UnexpectedToken {
        expected: &'static str,
        found: Option<TokenKind>,
        span: Range<usize>,
    },
    UnexpectedEnd {
        expected: &'static str,
    },
    UnknownCommand {
        lexeme: &'a str,
    },
    InvalidInteger {
        span: Range<usize>,
    },
    InvalidDuration {
        span: Range<usize>,
    },
    InvalidToken {
        span: Range<usize>,
        lexeme: &'a str,
    },
}

impl fmt::Display for GrammarErrorKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarErrorKind::UnexpectedToken {
                expected,
                found,
                span,
            } => write!(f, "expected {expected}, found {found:?} at {span:?}"),
            GrammarErrorKind::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            GrammarErrorKind::UnknownCommand { lexeme } => {
                write!(f, "unknown command `{lexeme}`")
            }
            GrammarErrorKind::InvalidInteger { span } => {
                write!(f, "integer out of range at {span:?}")
            }
            GrammarErrorKind::InvalidDuration { span } => {
                write!(f, "invalid duration literal at {span:?}")
            }
            GrammarErrorKind::InvalidToken { span, lexeme } => {
                write!(f, "unsupported token `{lexeme}` at {span:?}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarError<'a> {
    pub kind: GrammarErrorKind<'a>,
}

impl fmt::Display for GrammarError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl<'a> GrammarError<'a> {
    fn unexpected(expected: &'static str, token: Option<&Token<'a>>) -> Self {
        GrammarError {
            kind: match token {
                Some(tok) => GrammarErrorKind::UnexpectedToken {
                    expected,
                    found: Some(tok.kind),
                    span: tok.span.clone(),
                },
                None => GrammarErrorKind::UnexpectedEnd { expected },
            },
        }
    }

    fn unknown_command(token: &Token<'a>) -> Self {
        GrammarError {
            kind: GrammarErrorKind::UnknownCommand {
                lexeme: token.lexeme,
            },
        }
    }

    fn invalid_integer(token: &Token<'a>) -> Self {
        GrammarError {
            kind: GrammarErrorKind::InvalidInteger {
                span: token.span.clone(),
            },
        }
    }

    fn invalid_duration(token: &Token<'a>) -> Self {
        GrammarError {
            kind: GrammarErrorKind::InvalidDuration {
                span: token.span.clone(),
            },
        }
    }

    fn invalid_token(token: &Token<'a>) -> Self {
        GrammarError {
            kind: GrammarErrorKind::InvalidToken {
                span: token.span.clone(),
                lexeme: token.lexeme,
            },
        }
    }
}

type Input<'src, 'slice> = &'slice [Token<'src>];
type GrammarResult<'src, T> = Result<T, ErrMode<GrammarError<'src>>>;

impl<'src, 'slice> ParserError<Input<'src, 'slice>> for GrammarError<'src>
where
    'src: 'slice,
{
    type Inner = Self;

    fn from_input(input: &Input<'src, 'slice>) -> Self {
        GrammarError::unexpected("token", input.first())
    }

    fn append(
        self,
        _input: &Input<'src, 'slice>,
        _token_start: &<Input<'src, 'slice> as Stream>::Checkpoint,
    ) -> Self {
        self
    }

    fn into_inner(self) -> Result<Self::Inner, Self> {
        Ok(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError<'a> {
    Lex(LexError),
    Grammar(GrammarError<'a>),
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(err) => err.fmt(f),
            ParseError::Grammar(err) => err.fmt(f),
        }
    }
}

/// Parsed console command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Tap { x: u16, y: u16 },
    Press {
        raw_x: u16,
        raw_y: u16,
        samples: Option<u16>,
    },
    Release,
    Advance(Duration),
    Status,
    Queue,
    History,
    Help { topic: Option<&'a str> },
}

/// Tokenize the provided line.
///
/// # Errors
///
/// Returns [`LexError::TooManyTokens`] when the line overflows the token buffer.
pub fn lex(line: &str) -> Result<TokenBuffer<'_>, LexError> {
    let compiled = TokenKind::lexer();
    let mut cache: TokenCache<TokenKind, MAX_CACHE_RECORDS> = TokenCache::new();
    let partial = cache
        .rebuild(compiled, line)
        .map_err(map_incremental_error)?;
    let mut buffer = TokenBuffer::new();

    for record in cache.tokens() {
        if record.skipped {
            continue;
        }
        push_token(
            &mut buffer,
            Token {
                kind: record.token,
                lexeme: &line[record.start..record.end],
                span: record.start..record.end,
            },
        )?;
    }

    if let Some(partial) = partial.filter(|partial| !partial.fragment.is_empty()) {
        let end = partial.start + partial.fragment.len();
        push_token(
            &mut buffer,
            Token {
                kind: TokenKind::Error,
                lexeme: partial.fragment,
                span: partial.start..end,
            },
        )?;
    }

    Ok(buffer)
}

fn push_token<'a>(buffer: &mut TokenBuffer<'a>, token: Token<'a>) -> Result<(), LexError> {
    buffer.push(token).map_err(|_| LexError::TooManyTokens {
        processed: MAX_TOKENS + 1,
    })
}

fn map_incremental_error(error: IncrementalError) -> LexError {
    match error {
        IncrementalError::TokenOverflow => LexError::TooManyTokens {
            processed: MAX_TOKENS,
        },
        _ => LexError::Engine,
    }
}

/// Parse a console command from the provided line.
///
/// # Errors
///
/// Returns [`ParseError`] for lexing failures, unknown commands, and malformed
/// arguments.
pub fn parse(line: &str) -> Result<Command<'_>, ParseError<'_>> {
    let tokens = lex(line).map_err(ParseError::Lex)?;

    if let Some(token) = tokens.iter().find(|token| token.kind == TokenKind::Error) {
        return Err(ParseError::Grammar(GrammarError::invalid_token(token)));
    }

    let mut input = tokens.as_slice();
    let command = match command(&mut input) {
        Ok(command) => command,
        Err(ErrMode::Backtrack(err) | ErrMode::Cut(err)) => {
            return Err(ParseError::Grammar(err));
        }
        Err(ErrMode::Incomplete(_)) => {
            return Err(ParseError::Grammar(GrammarError::unexpected(
                "token",
                input.first(),
            )));
        }
    };

    match input.iter().find(|token| token.kind != TokenKind::Eol) {
        Some(extra) => Err(ParseError::Grammar(GrammarError::unexpected(
            "end of command",
            Some(extra),
        ))),
        None => Ok(command),
    }
}

fn command<'src, 'slice>(input: &mut Input<'src, 'slice>) -> GrammarResult<'src, Command<'src>>
where
    'src: 'slice,
{
    let keyword = expect_kind(TokenKind::Ident, "command keyword").parse_next(input)?;
    let Some(spec) = catalog::find(keyword.lexeme) else {
        return Err(ErrMode::Cut(GrammarError::unknown_command(&keyword)));
    };

    match spec.tag {
        CommandTag::Tap => {
            let x = integer(input, "x coordinate")?;
            let y = integer(input, "y coordinate")?;
            Ok(Command::Tap { x, y })
        }
        CommandTag::Press => {
            let raw_x = integer(input, "raw x reading")?;
            let raw_y = integer(input, "raw y reading")?;
            let samples = opt(|i: &mut Input<'src, 'slice>| assignment(i, "samples"))
                .parse_next(input)?;
            Ok(Command::Press {
                raw_x,
                raw_y,
                samples,
            })
        }
        CommandTag::Release => Ok(Command::Release),
        CommandTag::Advance => {
            let token = expect_kind(TokenKind::Duration, "duration").parse_next(input)?;
            parse_duration(&token)
                .map(Command::Advance)
                .map_err(ErrMode::Cut)
        }
        CommandTag::Status => Ok(Command::Status),
        CommandTag::Queue => Ok(Command::Queue),
        CommandTag::History => Ok(Command::History),
        CommandTag::Help => {
            let topic = opt(expect_kind(TokenKind::Ident, "topic")).parse_next(input)?;
            Ok(Command::Help {
                topic: topic.map(|token| token.lexeme),
            })
        }
    }
}

fn integer<'src, 'slice>(
    input: &mut Input<'src, 'slice>,
    label: &'static str,
) -> GrammarResult<'src, u16>
where
    'src: 'slice,
{
    let token = expect_kind(TokenKind::Integer, label).parse_next(input)?;
    token
        .lexeme
        .parse::<u16>()
        .map_err(|_| ErrMode::Cut(GrammarError::invalid_integer(&token)))
}

/// `<name>=<integer>`; backtracks unless the name matches.
fn assignment<'src, 'slice>(
    input: &mut Input<'src, 'slice>,
    name: &'static str,
) -> GrammarResult<'src, u16>
where
    'src: 'slice,
{
    match input.split_first() {
        Some((token, rest))
            if token.kind == TokenKind::Ident && token.lexeme.eq_ignore_ascii_case(name) =>
        {
            *input = rest;
        }
        other => {
            return Err(ErrMode::Backtrack(GrammarError::unexpected(
                name,
                other.map(|(token, _)| token),
            )));
        }
    }
    expect_kind(TokenKind::Equals, "=")
        .parse_next(input)
        .map_err(ErrMode::cut)?;
    integer(input, "integer").map_err(ErrMode::cut)
}

fn expect_kind<'src, 'slice>(
    kind: TokenKind,
    label: &'static str,
) -> impl Parser<Input<'src, 'slice>, Token<'src>, ErrMode<GrammarError<'src>>>
where
    'src: 'slice,
{
    move |input: &mut Input<'src, 'slice>| match input.split_first() {
        Some((token, rest)) if token.kind == kind => {
            *input = rest;
            Ok(token.clone())
        }
        Some((token, _)) => Err(ErrMode::Backtrack(GrammarError::unexpected(
            label,
            Some(token),
        ))),
        None => Err(ErrMode::Backtrack(GrammarError::unexpected(label, None))),
    }
}

fn parse_duration<'a>(token: &Token<'a>) -> Result<Duration, GrammarError<'a>> {
    let text = token.lexeme;
    if let Some(rest) = text.strip_suffix("ms") {
        let millis = rest
            .parse::<u32>()
            .map_err(|_| GrammarError::invalid_duration(token))?;
        Ok(Duration::from_millis(millis.into()))
    } else if let Some(rest) = text.strip_suffix('s') {
        let seconds = rest
            .parse::<u32>()
            .map_err(|_| GrammarError::invalid_duration(token))?;
        Ok(Duration::from_secs(seconds.into()))
    } else {
        Err(GrammarError::invalid_duration(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> Command<'_> {
        parse(input).expect("command should parse")
    }

    #[test]
    fn parses_tap() {
        assert_eq!(parse_ok("tap 120 250"), Command::Tap { x: 120, y: 250 });
    }

    #[test]
    fn parses_press_with_and_without_samples() {
        assert_eq!(
            parse_ok("press 860 2075"),
            Command::Press {
                raw_x: 860,
                raw_y: 2075,
                samples: None
            }
        );
        assert_eq!(
            parse_ok("press 860 2075 samples=50\r\n"),
            Command::Press {
                raw_x: 860,
                raw_y: 2075,
                samples: Some(50)
            }
        );
    }

    #[test]
    fn parses_durations() {
        assert_eq!(
            parse_ok("advance 250ms"),
            Command::Advance(Duration::from_millis(250))
        );
        assert_eq!(
            parse_ok("advance 10s"),
            Command::Advance(Duration::from_secs(10))
        );
    }

    #[test]
    fn parses_bare_commands_case_insensitively() {
        assert_eq!(parse_ok("STATUS"), Command::Status);
        assert_eq!(parse_ok("Queue"), Command::Queue);
        assert_eq!(parse_ok("history\n"), Command::History);
        assert_eq!(parse_ok("release"), Command::Release);
    }

    #[test]
    fn parses_help_topic() {
        assert_eq!(parse_ok("help"), Command::Help { topic: None });
        assert_eq!(
            parse_ok("help press"),
            Command::Help {
                topic: Some("press")
            }
        );
    }

    #[test]
    fn rejects_unknown_command() {
        match parse("reboot now") {
            Err(ParseError::Grammar(err)) => assert_eq!(
                err.kind,
                GrammarErrorKind::UnknownCommand { lexeme: "reboot" }
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_coordinate() {
        match parse("tap 70000 1") {
            Err(ParseError::Grammar(err)) => {
                assert!(matches!(err.kind, GrammarErrorKind::InvalidInteger { .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_argument() {
        match parse("tap 10") {
            Err(ParseError::Grammar(err)) => assert_eq!(
                err.kind,
                GrammarErrorKind::UnexpectedEnd {
                    expected: "y coordinate"
                }
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_trailing_tokens() {
        assert!(matches!(
            parse("status now"),
            Err(ParseError::Grammar(GrammarError {
                kind: GrammarErrorKind::UnexpectedToken {
                    expected: "end of command",
                    ..
                }
            }))
        ));
    }

    #[test]
    fn rejects_unsupported_symbol() {
        match parse("tap 1 2$") {
            Err(ParseError::Grammar(err)) => {
                assert!(matches!(err.kind, GrammarErrorKind::InvalidToken { .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn lexer_skips_whitespace() {
        let tokens = lex("advance \t 5s").expect("lexing should succeed");
        let kinds: HeaplessVec<TokenKind, 4> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds.as_slice(), &[TokenKind::Ident, TokenKind::Duration]);
    }
}
