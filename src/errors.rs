use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Display, Write};

use serde::Serialize;

use crate::ast::NbtArrayType;
use crate::parse::token::{write_escaped, Token};
use crate::position::{HasPos, Position};
use crate::source::SourceFile;

pub const DEFAULT_RENDER_WIDTH: usize = 80;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum TokenErrorKind {
    UnterminatedString,
    NumberOutOfRange { digits: String, bits: u32 },
    UnrecognizedCharacter(char),
}

impl Display for TokenErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "the quoted string is not terminated"),

            Self::NumberOutOfRange { digits, bits } => {
                write!(f, "the number literal `{digits}` does not fit in a {bits}-bit integer")
            }

            Self::UnrecognizedCharacter(c) => {
                write!(f, "encountered an unrecognized character '\\u{{{:04x}}}'", *c as u32)
            }
        }
    }
}

/// A malformed lexeme.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenError {
    pub kind: TokenErrorKind,
    pub pos: Position,
}

impl TokenError {
    pub fn new(kind: TokenErrorKind, pos: Position) -> Self {
        Self { kind, pos }
    }

    pub fn render(&self, source: &SourceFile, width: usize) -> String {
        let message = format!("tokenization failed: {}", self.kind);

        render(source, &message, self.pos, width)
    }
}

impl Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tokenization failed: {} at {}", self.kind, self.pos)
    }
}

impl StdError for TokenError {}

impl HasPos for TokenError {
    fn pos(&self) -> Position {
        self.pos
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedToken { expected: Cow<'static, str> },
    ExpectedEndOfArgument,
    ExpectedEndOfCommand,
    UnknownSubcommand(String),
    UnknownSelectorArgument(String),
    NonInvertibleArgument(String),
    InvalidSelectorVariable(String),
    InvalidEnumValue { expected: &'static [&'static str], actual: String },
    EmptyRange,
    MissingCoordinate,
    MixedLocalCoordinates,
    LocalCoordinatesNotAllowed,
    InvalidSwizzle(String),
    InvalidResourceLocation(String),
    TagNotAllowed,
    DuplicateKey(String),
    IntOutOfRange(i64),
    NbtListTypeMismatch { expected: NbtArrayType },
    SingleQuotedPathKey,
    InvalidTimeUnit(String),
    RecursionLimit,
}

/// A frame of the "while parsing ..." trail attached to a propagating error.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ContextFrame {
    pub construct: Cow<'static, str>,
    pub pos: Position,
}

/// Well-formed tokens in an invalid arrangement.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub pos: Position,
    /// The offending token rendered as `kind:'payload'`, if there was one.
    pub found: Option<String>,
    /// Innermost frame first.
    pub context: Vec<ContextFrame>,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, pos: Position) -> Self {
        Self {
            kind,
            pos,
            found: None,
            context: Vec::new(),
        }
    }

    /// Builds an error positioned at `token` (or at `end` if the input is exhausted).
    pub fn at(kind: SyntaxErrorKind, token: Option<&Token<'_>>, end: Position) -> Self {
        match token {
            Some(token) => Self::new(kind, token.pos).with_found(token),
            None => Self::new(kind, end),
        }
    }

    pub fn with_found(mut self, token: &Token<'_>) -> Self {
        self.found = Some(token.to_string());

        self
    }

    pub fn push_context(mut self, construct: impl Into<Cow<'static, str>>, pos: Position) -> Self {
        self.context.push(ContextFrame {
            construct: construct.into(),
            pos,
        });

        self
    }

    fn found_or_eoi(&self) -> &str {
        self.found.as_deref().unwrap_or("end of input")
    }

    /// The error message without the context trail.
    pub fn message(&self) -> String {
        let found = self.found_or_eoi();

        match &self.kind {
            SyntaxErrorKind::UnexpectedToken { expected } => {
                format!("expected {expected}, found {found}")
            }

            SyntaxErrorKind::ExpectedEndOfArgument => {
                format!("expected end of argument, found {found}")
            }

            SyntaxErrorKind::ExpectedEndOfCommand => {
                format!("expected end of command, found {found}")
            }

            SyntaxErrorKind::UnknownSubcommand(name) => {
                format!("unknown execute sub-command `{name}`")
            }

            SyntaxErrorKind::UnknownSelectorArgument(key) => {
                format!("unknown selector argument `{key}`")
            }

            SyntaxErrorKind::NonInvertibleArgument(key) => {
                format!("the selector argument `{key}` cannot be inverted")
            }

            SyntaxErrorKind::InvalidSelectorVariable(var) => {
                format!("`@{var}` is not a valid selector variable (expected @a, @p, @r, @s or @e)")
            }

            SyntaxErrorKind::InvalidEnumValue { expected, actual } => {
                format!("expected one of {}, found `{actual}`", expected.join(", "))
            }

            SyntaxErrorKind::EmptyRange => "a range needs at least one bound".to_owned(),

            SyntaxErrorKind::MissingCoordinate => {
                format!("expected a coordinate, found {found}")
            }

            SyntaxErrorKind::MixedLocalCoordinates => {
                "local coordinates (`^`) cannot be mixed with world coordinates".to_owned()
            }

            SyntaxErrorKind::LocalCoordinatesNotAllowed => {
                "local coordinates (`^`) are not allowed here".to_owned()
            }

            SyntaxErrorKind::InvalidSwizzle(swizzle) => {
                format!("`{swizzle}` is not a valid swizzle (expected 2 or 3 distinct axes out of x, y, z)")
            }

            SyntaxErrorKind::InvalidResourceLocation(id) => {
                format!("`{id}` is not a valid resource location")
            }

            SyntaxErrorKind::TagNotAllowed => "a tag is not allowed here".to_owned(),

            SyntaxErrorKind::DuplicateKey(key) => format!("`{key}` is given more than once"),

            SyntaxErrorKind::IntOutOfRange(value) => {
                format!("the integer {value} does not fit in 32 bits")
            }

            SyntaxErrorKind::NbtListTypeMismatch { expected } => {
                format!("expected a {expected} element, found {found}")
            }

            SyntaxErrorKind::SingleQuotedPathKey => {
                "NBT path keys must be quoted with double quotes".to_owned()
            }

            SyntaxErrorKind::InvalidTimeUnit(unit) => {
                format!("`{unit}` is not a valid time unit (expected d, s or t)")
            }

            SyntaxErrorKind::RecursionLimit => {
                "the recursion limit has been reached while parsing".to_owned()
            }
        }
    }

    /// Renders the message and the excerpt, followed by the context trail (outermost first).
    pub fn render(&self, source: &SourceFile, width: usize) -> String {
        let mut out = render(source, &self.message(), self.pos, width);
        let pad = " ".repeat((self.pos.line + 1).to_string().len());

        for frame in self.context.iter().rev() {
            let _ = write!(
                out,
                "\n{pad} = while parsing {} at {}",
                frame.construct, frame.pos
            );
        }

        out
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.context.iter().rev() {
            writeln!(f, "while parsing {} at {}", frame.construct, frame.pos)?;
        }

        write!(f, "{} at {}", self.message(), self.pos)
    }
}

impl StdError for SyntaxError {}

impl HasPos for SyntaxError {
    fn pos(&self) -> Position {
        self.pos
    }
}

/// Annotates a propagating [`SyntaxError`] with the construct being parsed.
pub trait ResultExt<T> {
    fn context(self, construct: &'static str, pos: Position) -> Result<T, SyntaxError>;

    fn with_context<F>(self, construct: F, pos: Position) -> Result<T, SyntaxError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, SyntaxError> {
    fn context(self, construct: &'static str, pos: Position) -> Result<T, SyntaxError> {
        self.map_err(|e| e.push_context(construct, pos))
    }

    fn with_context<F>(self, construct: F, pos: Position) -> Result<T, SyntaxError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.push_context(construct(), pos))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Token(TokenError),
    Syntax(SyntaxError),
}

impl From<TokenError> for Error {
    fn from(e: TokenError) -> Self {
        Self::Token(e)
    }
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(e) => write!(f, "{}", e),
            Self::Syntax(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Token(e) => Some(e),
            Self::Syntax(e) => Some(e),
        }
    }
}

impl HasPos for Error {
    fn pos(&self) -> Position {
        match self {
            Self::Token(e) => e.pos,
            Self::Syntax(e) => e.pos,
        }
    }
}

impl Error {
    pub fn render(&self, source: &SourceFile, width: usize) -> String {
        match self {
            Self::Token(e) => e.render(source, width),
            Self::Syntax(e) => e.render(source, width),
        }
    }
}

fn escaped_width(c: char) -> usize {
    match c {
        '\n' | '\r' | '\t' => 2,
        _ => 1,
    }
}

/// Renders `message` followed by the source line at `pos` with a caret under the column.
///
/// The line is clipped to `width` columns around the caret.
pub fn render(source: &SourceFile, message: &dyn Display, pos: Position, width: usize) -> String {
    let line_no = (pos.line + 1).to_string();
    let pad = " ".repeat(line_no.len());
    let line = source.line(pos.line).unwrap_or_default();

    let mut cells = String::new();
    let mut caret = 0;

    for (col, c) in line.chars().enumerate() {
        if col < pos.col {
            caret += escaped_width(c);
        }

        // writing into a String never fails
        let _ = write_escaped(&mut cells, c.encode_utf8(&mut [0; 4]));
    }

    if pos.col > line.chars().count() {
        caret += pos.col - line.chars().count();
    }

    let cells: Vec<char> = cells.chars().collect();
    let available = width.saturating_sub(line_no.len() + 3).max(10);

    let start = if cells.len() <= available {
        0
    } else {
        caret
            .saturating_sub(available / 2)
            .min(cells.len() - available)
    };
    let visible: String = cells.iter().skip(start).take(available).collect();
    let caret = caret - start;

    let mut out = String::new();
    let _ = writeln!(out, "error: {message}");
    let _ = writeln!(out, "{pad}--> {}:{pos}", source.path().display());
    let _ = writeln!(out, "{pad} |");
    let _ = writeln!(out, "{line_no} | {visible}");
    let _ = write!(out, "{pad} | {}^", " ".repeat(caret));

    out
}
