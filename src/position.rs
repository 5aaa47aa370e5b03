use std::fmt::{self, Display};

use serde::Serialize;

/// A location in the source text.
///
/// Both `line` and `col` are 0-based; `col` counts characters, not bytes.
#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Default)]
pub struct Position {
    pub byte: usize,
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(byte: usize, line: usize, col: usize) -> Self {
        Self { byte, line, col }
    }

    /// Returns the position immediately after `c`.
    pub fn advance(self, c: char) -> Self {
        let byte = self.byte + c.len_utf8();

        if c == '\n' {
            Self {
                byte,
                line: self.line + 1,
                col: 0,
            }
        } else {
            Self {
                byte,
                col: self.col + 1,
                ..self
            }
        }
    }

    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, Self::advance)
    }
}

/// Displays the position in the 1-based `line:column` form used in messages.
impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

pub trait HasPos {
    fn pos(&self) -> Position;
}

impl HasPos for Position {
    fn pos(&self) -> Position {
        *self
    }
}
