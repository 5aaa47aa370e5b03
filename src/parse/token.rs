use std::borrow::Cow;
use std::fmt::{self, Display};

use serde::Serialize;

use crate::parse::cursor::Step;
use crate::position::{HasPos, Position};

/// Single-character punctuation recognized by the lexer.
///
/// `..` is the only two-character control token.
pub const CONTROL_CHARS: &[char] = &[
    '.', ',', ':', ';', '=', '!', '@', '~', '^', '-', '+', '/', '*', '%', '<', '>', '|', '&', '$',
    '?', '#',
];

/// Control characters that the normalizer may fuse into a single literal when
/// they appear back to back (`->`, `**`, `+-`...).
///
/// Separators and prefixes (`=`, `!`, `:`, `,`, `@`, `#`, `~`, `^`, `.`) stay
/// separate so the grammars can match them one by one.
pub const MERGEABLE_CONTROL_CHARS: &[char] = &['-', '+', '*', '/', '%', '<', '>', '|', '&', '$', '?'];

pub const BRACKET_CHARS: &[char] = &['[', ']', '{', '}', '(', ')'];

#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '"' => Some(Self::Double),
            '\'' => Some(Self::Single),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
        }
    }
}

/// The one-letter type suffix of an NBT numeral.
#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum NumberSuffix {
    Byte,
    Short,
    Long,
    Float,
    Double,
}

impl NumberSuffix {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(Self::Byte),
            's' => Some(Self::Short),
            'l' => Some(Self::Long),
            'f' => Some(Self::Float),
            'd' => Some(Self::Double),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Byte => 'b',
            Self::Short => 's',
            Self::Long => 'l',
            Self::Float => 'f',
            Self::Double => 'd',
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum TokenKind {
    Space,
    Literal,
    Control,
    Bracket,
    Comment,
    Newline,
    Number,
    Boolean,
    QuotedString,
    Int,
    Float,
    Unknown,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Space => "space",
            Self::Literal => "literal",
            Self::Control => "control",
            Self::Bracket => "bracket",
            Self::Comment => "comment",
            Self::Newline => "newline",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::QuotedString => "quoted-string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum TokenValue<'src> {
    Space,
    Literal,
    Control,
    Bracket(char),
    Comment,
    Newline,
    /// An untyped run of digits; the normalizer turns it into `Int` or `Float`.
    Number,
    Boolean(bool),
    QuotedString {
        quote: Quote,
        value: Cow<'src, str>,
    },
    Int {
        value: i64,
        suffix: Option<NumberSuffix>,
    },
    Float {
        value: f64,
        suffix: Option<NumberSuffix>,
    },
    Unknown,
}

impl TokenValue<'_> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Space => TokenKind::Space,
            Self::Literal => TokenKind::Literal,
            Self::Control => TokenKind::Control,
            Self::Bracket(_) => TokenKind::Bracket,
            Self::Comment => TokenKind::Comment,
            Self::Newline => TokenKind::Newline,
            Self::Number => TokenKind::Number,
            Self::Boolean(_) => TokenKind::Boolean,
            Self::QuotedString { .. } => TokenKind::QuotedString,
            Self::Int { .. } => TokenKind::Int,
            Self::Float { .. } => TokenKind::Float,
            Self::Unknown => TokenKind::Unknown,
        }
    }
}

/// A lexeme together with its original text and starting position.
///
/// `text` always holds the exact source text the token covers, so
/// concatenating the text of every token reproduces the input.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Token<'src> {
    pub value: TokenValue<'src>,
    pub text: Cow<'src, str>,
    pub pos: Position,
}

impl<'src> Token<'src> {
    pub fn new(value: TokenValue<'src>, text: impl Into<Cow<'src, str>>, pos: Position) -> Self {
        Self {
            value,
            text: text.into(),
            pos,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.value.kind()
    }

    /// Returns the position immediately after the token.
    pub fn end(&self) -> Position {
        self.pos.advance_str(&self.text)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub fn is_control(&self, text: &str) -> bool {
        self.is(TokenKind::Control) && self.text == text
    }

    pub fn is_literal(&self, text: &str) -> bool {
        self.is(TokenKind::Literal) && self.text == text
    }

    pub fn is_bracket(&self, c: char) -> bool {
        self.value == TokenValue::Bracket(c)
    }

    pub fn is_space(&self) -> bool {
        self.is(TokenKind::Space)
    }

    pub fn is_newline(&self) -> bool {
        self.is(TokenKind::Newline)
    }

    /// Spaces, newlines and comments carry no meaning for the grammars.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Space | TokenKind::Newline | TokenKind::Comment
        )
    }

    pub fn is_numeral(&self) -> bool {
        matches!(self.kind(), TokenKind::Int | TokenKind::Float)
    }
}

impl HasPos for Token<'_> {
    fn pos(&self) -> Position {
        self.pos
    }
}

impl Step for Token<'_> {
    fn step(&self, _pos: Position) -> Position {
        self.end()
    }
}

/// Renders the token as `kind:'payload'` with control characters escaped.
impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:'", self.kind())?;
        write_escaped(f, &self.text)?;
        write!(f, "'")
    }
}

pub fn write_escaped(out: &mut impl fmt::Write, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            _ => out.write_char(c)?,
        }
    }

    Ok(())
}
