use std::borrow::Cow;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::errors::{TokenError, TokenErrorKind};
use crate::parse::cursor::Cursor;
use crate::parse::token::{Quote, Token, TokenValue, BRACKET_CHARS, CONTROL_CHARS};
use crate::position::Position;

type ScanResult<'src> = Result<TokenValue<'src>, TokenError>;

/// The largest digit run a plain integer may have: `-2147483648` is still representable.
const MAX_INT_MAGNITUDE: u64 = 1 << 31;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Treat a backslash at the end of a line as a continuation of the current command.
    pub line_continuation: bool,
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_continuation(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[derive(Debug, Clone)]
pub struct Lexer<'src, 'c> {
    src: &'src str,
    cursor: Cursor<'c, char>,
    config: TokenizerConfig,
    at_line_start: bool,
    eof: bool,
}

impl<'src, 'c> Lexer<'src, 'c> {
    /// Creates a lexer for `src`; `chars` must be `src.chars().collect()`.
    pub fn new(src: &'src str, chars: &'c [char], config: TokenizerConfig) -> Self {
        Self {
            src,
            cursor: Cursor::new(chars),
            config,
            at_line_start: true,
            eof: false,
        }
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.cursor.peek_nth(n).copied()
    }

    fn prev_char(&self) -> Option<char> {
        self.src[..self.cursor.pos().byte].chars().next_back()
    }

    fn slice_from(&self, start: Position) -> &'src str {
        &self.src[start.byte..self.cursor.pos().byte]
    }

    fn scan_comment(&mut self) -> ScanResult<'src> {
        self.cursor.advance_while(|&c| !is_line_break(c));

        Ok(TokenValue::Comment)
    }

    fn scan_space(&mut self) -> ScanResult<'src> {
        self.cursor.advance_while(|&c| is_space(c));

        Ok(TokenValue::Space)
    }

    /// Consumes `\` + line break + the indentation of the next line.
    fn scan_line_continuation(&mut self) -> ScanResult<'src> {
        self.cursor.advance();

        if self.peek_nth(0) == Some('\r') {
            self.cursor.advance();
        }

        if self.peek_nth(0) == Some('\n') {
            self.cursor.advance();
        }

        self.cursor.advance_while(|&c| is_space(c));

        Ok(TokenValue::Space)
    }

    fn is_line_continuation(&self) -> bool {
        self.config.line_continuation
            && self.peek_nth(0) == Some('\\')
            && matches!(self.peek_nth(1), Some(c) if is_line_break(c))
    }

    /// Consumes a run of line breaks along with any blank lines and indentation that follow.
    fn scan_newline(&mut self) -> ScanResult<'src> {
        self.cursor.advance_while(|&c| is_line_break(c) || is_space(c));

        Ok(TokenValue::Newline)
    }

    fn scan_quoted_string(&mut self, start: Position) -> ScanResult<'src> {
        let quote_char = self.peek_nth(0).unwrap_or('"');
        let quote = Quote::from_char(quote_char).unwrap_or(Quote::Double);
        self.cursor.advance();

        let content_start = self.cursor.pos();
        let mut has_escapes = false;

        loop {
            match self.peek_nth(0) {
                None => break,
                Some(c) if is_line_break(c) => break,

                Some('\\') if matches!(self.peek_nth(1), Some(c) if c == quote_char || c == '\\') => {
                    has_escapes = true;
                    self.cursor.advance_by(2);
                }

                Some(c) if c == quote_char => {
                    let raw = self.slice_from(content_start);
                    self.cursor.advance();

                    let value = if has_escapes {
                        Cow::Owned(unescape(raw, quote_char))
                    } else {
                        Cow::Borrowed(raw)
                    };

                    return Ok(TokenValue::QuotedString { quote, value });
                }

                Some(_) => self.cursor.advance(),
            }
        }

        Err(TokenError::new(TokenErrorKind::UnterminatedString, start))
    }

    fn scan_control(&mut self) -> ScanResult<'src> {
        if self.peek_nth(0) == Some('.') && self.peek_nth(1) == Some('.') {
            self.cursor.advance_by(2);
        } else {
            self.cursor.advance();
        }

        Ok(TokenValue::Control)
    }

    fn scan_bracket(&mut self, c: char) -> ScanResult<'src> {
        self.cursor.advance();

        Ok(TokenValue::Bracket(c))
    }

    /// Scans a digit run, leaving sign and decimal point recognition to the normalizer.
    ///
    /// Runs that stand for a plain integer must fit in 32 bits; runs that are part of
    /// a decimal or carry a long/float/double suffix are checked later.
    fn scan_number(&mut self, start: Position) -> ScanResult<'src> {
        let after_dot = self.prev_char() == Some('.');
        self.cursor.advance_while(char::is_ascii_digit);
        let digits = self.slice_from(start);

        let next = self.peek_nth(0);
        let before_dot = next == Some('.') && self.peek_nth(1) != Some('.');
        let suffix = next
            .filter(|_| !matches!(self.peek_nth(1), Some(n) if is_word_continuation(n)))
            .map(|c| c.to_ascii_lowercase());

        let (in_range, bits) = match suffix {
            _ if after_dot || before_dot => (true, 64),
            Some('f' | 'd') => (true, 64),
            Some('l') => (digits.parse::<i64>().is_ok(), 64),
            _ => (
                matches!(digits.parse::<u64>(), Ok(value) if value <= MAX_INT_MAGNITUDE),
                32,
            ),
        };

        if in_range {
            Ok(TokenValue::Number)
        } else {
            Err(TokenError::new(
                TokenErrorKind::NumberOutOfRange {
                    digits: digits.to_owned(),
                    bits,
                },
                start,
            ))
        }
    }

    fn scan_word(&mut self, start: Position) -> ScanResult<'src> {
        self.cursor.advance_while(|&c| is_word_continuation(c));

        Ok(match self.slice_from(start) {
            "true" => TokenValue::Boolean(true),
            "false" => TokenValue::Boolean(false),
            _ => TokenValue::Literal,
        })
    }

    fn scan_unknown(&mut self, start: Position, c: char) -> ScanResult<'src> {
        if c.is_control() {
            return Err(TokenError::new(
                TokenErrorKind::UnrecognizedCharacter(c),
                start,
            ));
        }

        self.cursor.advance();

        Ok(TokenValue::Unknown)
    }
}

fn unescape(raw: &str, quote: char) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) if escaped == quote || escaped == '\\' => result.push(escaped),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            },

            _ => result.push(c),
        }
    }

    result
}

impl<'src, 'c> Iterator for Lexer<'src, 'c> {
    type Item = Result<Token<'src>, TokenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }

        let start = self.cursor.pos();
        let c = self.peek_nth(0)?;

        let scan_result = match c {
            '#' if self.at_line_start => self.scan_comment(),
            c if is_space(c) => self.scan_space(),
            '\\' if self.is_line_continuation() => self.scan_line_continuation(),
            c if is_line_break(c) => self.scan_newline(),
            '"' | '\'' => self.scan_quoted_string(start),
            c if CONTROL_CHARS.contains(&c) => self.scan_control(),
            c if BRACKET_CHARS.contains(&c) => self.scan_bracket(c),
            c if c.is_ascii_digit() => self.scan_number(start),
            c if is_word_start(c) => self.scan_word(start),
            c => self.scan_unknown(start, c),
        };

        Some(match scan_result {
            Ok(value) => {
                self.at_line_start = matches!(value, TokenValue::Newline)
                    || (self.at_line_start && matches!(value, TokenValue::Space));

                let token = Token::new(value, self.slice_from(start), start);
                trace!(token = %token);

                Ok(token)
            }

            Err(e) => {
                self.eof = true;

                Err(e)
            }
        })
    }
}

impl<'src, 'c> FusedIterator for Lexer<'src, 'c> {}

pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, TokenError> {
    tokenize_with(src, TokenizerConfig::default())
}

pub fn tokenize_with(src: &str, config: TokenizerConfig) -> Result<Vec<Token<'_>>, TokenError> {
    let chars: Vec<char> = src.chars().collect();
    let tokens = Lexer::new(src, &chars, config).collect::<Result<Vec<_>, _>>()?;
    debug!(count = tokens.len(), "tokenized the input");

    Ok(tokens)
}
