use std::borrow::Cow;
use std::ops::{Deref, DerefMut};

use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::ast::{
    self, BoolValue, Command, FloatValue, IntValue, Keyword, Literal, Node, QuotedString,
    UnknownCommand,
};
use crate::errors::{ResultExt, SyntaxError, SyntaxErrorKind};
use crate::parse::cursor::Cursor;
use crate::parse::extension::{Extension, NoExtension};
use crate::parse::normalizer::normalize_with;
use crate::parse::token::{NumberSuffix, Token, TokenKind, TokenValue};
use crate::position::Position;

pub const DEFAULT_RECURSION_LIMIT: usize = 256;

/// The share of the recursion budget taken by each command frame.
/// NBT compounds and lists take one unit each.
pub const COMMAND_RECURSION_COST: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// How deep commands and NBT values may nest before parsing is aborted.
    pub recursion_limit: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

pub(crate) struct BoundedParser<'p, 't, 'src> {
    parser: &'p mut Parser<'t, 'src>,
    cost: usize,
}

impl Drop for BoundedParser<'_, '_, '_> {
    fn drop(&mut self) {
        self.parser.recursion_budget += self.cost;
    }
}

impl<'t, 'src> Deref for BoundedParser<'_, 't, 'src> {
    type Target = Parser<'t, 'src>;

    fn deref(&self) -> &Parser<'t, 'src> {
        self.parser
    }
}

impl<'t, 'src> DerefMut for BoundedParser<'_, 't, 'src> {
    fn deref_mut(&mut self) -> &mut Parser<'t, 'src> {
        self.parser
    }
}

/// The structural (second) pass over a normalized token stream.
///
/// Grammar methods expect the parser to be positioned at the first token of
/// their construct and leave it right after the last token they consumed.
pub struct Parser<'t, 'src> {
    cursor: Cursor<'t, Token<'src>>,
    recursion_budget: usize,
}

impl<'t, 'src> Parser<'t, 'src> {
    pub fn new(tokens: &'t [Token<'src>], config: ParserConfig) -> Self {
        let start = tokens.first().map(|token| token.pos).unwrap_or_default();

        Self {
            cursor: Cursor::with_start(tokens, start),
            recursion_budget: config.recursion_limit,
        }
    }

    pub(crate) fn bounded(&mut self) -> Result<BoundedParser<'_, 't, 'src>, SyntaxError> {
        self.bounded_by(1)
    }

    pub(crate) fn bounded_by(
        &mut self,
        cost: usize,
    ) -> Result<BoundedParser<'_, 't, 'src>, SyntaxError> {
        self.recursion_budget = match self.recursion_budget.checked_sub(cost) {
            Some(budget) => budget,
            None => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::RecursionLimit,
                    self.pos(),
                ))
            }
        };

        Ok(BoundedParser { parser: self, cost })
    }

    pub fn peek(&self) -> Option<&'t Token<'src>> {
        self.cursor.current()
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'t Token<'src>> {
        self.cursor.peek_nth(n)
    }

    /// The tokens that have not been consumed yet.
    pub fn remaining(&self) -> &'t [Token<'src>] {
        self.cursor.remaining()
    }

    /// Returns the number of tokens consumed so far.
    pub fn index(&self) -> usize {
        self.cursor.index()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    /// The position of the next token, or the end of the input.
    pub fn pos(&self) -> Position {
        self.peek()
            .map(|token| token.pos)
            .unwrap_or_else(|| self.cursor.pos())
    }

    pub fn bump(&mut self) -> Option<&'t Token<'src>> {
        let token = self.cursor.next();
        trace!(token = ?token.map(ToString::to_string), "consumed");

        token
    }

    pub fn advance_by(&mut self, n: usize) {
        self.cursor.advance_by(n);
    }

    /// Builds an error of `kind` located at the next token.
    pub fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::at(kind, self.peek(), self.cursor.pos())
    }

    pub fn unexpected(&self, expected: impl Into<Cow<'static, str>>) -> SyntaxError {
        self.error(SyntaxErrorKind::UnexpectedToken {
            expected: expected.into(),
        })
    }

    pub fn at_kind(&self, kind: TokenKind) -> bool {
        matches!(self.peek(), Some(token) if token.is(kind))
    }

    pub fn at_control(&self, c: &str) -> bool {
        matches!(self.peek(), Some(token) if token.is_control(c))
    }

    pub fn at_bracket(&self, c: char) -> bool {
        matches!(self.peek(), Some(token) if token.is_bracket(c))
    }

    pub fn at_numeral(&self) -> bool {
        matches!(self.peek(), Some(token) if token.is_numeral())
    }

    /// Returns the text of the next token if it is a literal.
    pub fn peek_literal(&self) -> Option<&'t str> {
        match self.peek() {
            Some(token) if token.is(TokenKind::Literal) => Some(token.text.as_ref()),
            _ => None,
        }
    }

    pub fn at_literal(&self, text: &str) -> bool {
        matches!(self.peek(), Some(token) if token.is_literal(text))
    }

    pub fn eat_control(&mut self, c: &str) -> Option<&'t Token<'src>> {
        if self.at_control(c) {
            self.bump()
        } else {
            None
        }
    }

    pub fn eat_bracket(&mut self, c: char) -> Option<&'t Token<'src>> {
        if self.at_bracket(c) {
            self.bump()
        } else {
            None
        }
    }

    pub fn expect_kind(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<&'t Token<'src>, SyntaxError> {
        trace!(token = ?self.peek().map(ToString::to_string), %kind);

        match self.peek() {
            Some(token) if token.is(kind) => {
                self.bump();

                Ok(token)
            }

            _ => Err(self.unexpected(expected)),
        }
    }

    pub fn expect_control(&mut self, c: &'static str) -> Result<&'t Token<'src>, SyntaxError> {
        trace!(token = ?self.peek().map(ToString::to_string), control = c);

        match self.eat_control(c) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(format!("`{c}`"))),
        }
    }

    pub fn expect_bracket(&mut self, c: char) -> Result<&'t Token<'src>, SyntaxError> {
        trace!(token = ?self.peek().map(ToString::to_string), bracket = %c);

        match self.eat_bracket(c) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(format!("`{c}`"))),
        }
    }

    /// Consumes the literal `text`.
    pub fn expect_literal_text(&mut self, text: &'static str) -> Result<Position, SyntaxError> {
        if self.at_literal(text) {
            let pos = self.pos();
            self.bump();

            Ok(pos)
        } else {
            Err(self.unexpected(format!("`{text}`")))
        }
    }

    /// Consumes one of the keywords of `K` and returns the matching variant.
    pub fn expect_keyword<K: Keyword>(&mut self) -> Result<K, SyntaxError> {
        let token = match self.peek() {
            Some(token) if token.is(TokenKind::Literal) => token,
            _ => {
                return Err(self.unexpected(format!(
                    "one of {}",
                    K::KEYWORDS.iter().map(|kw| format!("`{kw}`")).join(", ")
                )))
            }
        };

        match K::from_keyword(&token.text) {
            Some(keyword) => {
                self.bump();

                Ok(keyword)
            }

            None => Err(self.error(SyntaxErrorKind::InvalidEnumValue {
                expected: K::KEYWORDS,
                actual: token.text.to_string(),
            })),
        }
    }

    /// Returns `true` if the next token ends the current argument.
    pub fn at_end_of_argument(&self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => token.is_space() || token.is_newline(),
        }
    }

    pub fn at_end_of_line(&self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => token.is_newline(),
        }
    }

    pub fn expect_end_of_argument(&self) -> Result<(), SyntaxError> {
        if self.at_end_of_argument() {
            Ok(())
        } else {
            Err(self.error(SyntaxErrorKind::ExpectedEndOfArgument))
        }
    }

    /// Checks the end-of-argument rule and swallows the separating space, if any.
    pub fn end_argument(&mut self) -> Result<(), SyntaxError> {
        self.expect_end_of_argument()?;

        if self.at_kind(TokenKind::Space) {
            self.bump();
        }

        Ok(())
    }

    pub fn skip_spaces(&mut self) {
        self.cursor.advance_while(Token::is_space);
    }

    pub fn skip_trivia(&mut self) {
        self.cursor.advance_while(Token::is_trivia);
    }

    /// Joins the text of the adjacent tokens up to the end of the argument.
    pub fn raw_word(&mut self) -> Option<(Position, String)> {
        let pos = self.pos();
        let tokens = self
            .cursor
            .collect_while(|token| !token.is_space() && !token.is_newline());

        if tokens.is_empty() {
            None
        } else {
            Some((pos, tokens.iter().map(|token| token.text.as_ref()).join("")))
        }
    }

    pub fn expect_raw_word(&mut self, expected: &'static str) -> Result<Literal, SyntaxError> {
        match self.raw_word() {
            Some((pos, value)) => Ok(Literal { pos, value }),
            None => Err(self.unexpected(expected)),
        }
    }

    /// Consumes everything up to the end of the line and returns its text.
    pub fn rest_of_line(&mut self) -> &'t [Token<'src>] {
        self.cursor.collect_while(|token| !token.is_newline())
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_literal(&mut self) -> Result<Literal, SyntaxError> {
        let token = self.expect_kind(TokenKind::Literal, "a literal")?;

        Ok(Literal {
            pos: token.pos,
            value: token.text.to_string(),
        })
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_quoted_string(&mut self) -> Result<QuotedString, SyntaxError> {
        match self.peek() {
            Some(Token {
                value: TokenValue::QuotedString { quote, value },
                pos,
                ..
            }) => {
                self.bump();

                Ok(QuotedString {
                    pos: *pos,
                    quote: *quote,
                    value: value.to_string(),
                })
            }

            _ => Err(self.unexpected("a quoted string")),
        }
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_bool(&mut self) -> Result<BoolValue, SyntaxError> {
        match self.peek() {
            Some(&Token {
                value: TokenValue::Boolean(value),
                pos,
                ..
            }) => {
                self.bump();

                Ok(BoolValue { pos, value })
            }

            _ => Err(self.unexpected("a boolean")),
        }
    }

    /// Parses an int token with any suffix. Without one it must fit in 32 bits.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_nbt_int(&mut self) -> Result<IntValue, SyntaxError> {
        match self.peek() {
            Some(&Token {
                value: TokenValue::Int { value, suffix },
                pos,
                ..
            }) => {
                check_int_range(value, suffix, pos)?;
                self.bump();

                Ok(IntValue { pos, value, suffix })
            }

            _ => Err(self.unexpected("an integer")),
        }
    }

    /// Parses a command argument integer: no suffix, 32-bit range.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_int(&mut self) -> Result<IntValue, SyntaxError> {
        match self.peek() {
            Some(&Token {
                value: TokenValue::Int {
                    value,
                    suffix: None,
                },
                pos,
                ..
            }) => {
                check_int_range(value, None, pos)?;
                self.bump();

                Ok(IntValue {
                    pos,
                    value,
                    suffix: None,
                })
            }

            _ => Err(self.unexpected("an integer")),
        }
    }

    /// Parses a float argument; integers are accepted and widened.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_float(&mut self) -> Result<FloatValue, SyntaxError> {
        match self.peek() {
            Some(&Token {
                value: TokenValue::Float { value, suffix },
                pos,
                ..
            }) => {
                self.bump();

                Ok(FloatValue { pos, value, suffix })
            }

            Some(&Token {
                value: TokenValue::Int { value, suffix },
                pos,
                ..
            }) => {
                self.bump();

                Ok(FloatValue {
                    pos,
                    value: value as f64,
                    suffix,
                })
            }

            _ => Err(self.unexpected("a number")),
        }
    }

    /// Parses an int or float token as written.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_number(&mut self) -> Result<ast::Number, SyntaxError> {
        match self.peek() {
            Some(token) if token.is(TokenKind::Int) => self.parse_nbt_int().map(ast::Number::Int),
            Some(token) if token.is(TokenKind::Float) => self.parse_float().map(ast::Number::Float),
            _ => Err(self.unexpected("a number")),
        }
    }

    /// Parses the top-level nodes up to the end of the input.
    #[instrument(level = "trace", skip(self, extension), ret)]
    pub fn parse_nodes(&mut self, extension: &mut dyn Extension) -> Result<Vec<Node>, SyntaxError> {
        let mut nodes = Vec::new();

        loop {
            self.skip_trivia();

            if self.is_exhausted() {
                break;
            }

            nodes.push(self.parse_node(extension)?);
        }

        Ok(nodes)
    }

    /// Like [`parse_nodes`](Self::parse_nodes), but skips to the next line on
    /// an error instead of aborting.
    #[instrument(level = "trace", skip(self, extension))]
    pub fn parse_nodes_lossy(
        &mut self,
        extension: &mut dyn Extension,
    ) -> (Vec<Node>, Vec<SyntaxError>) {
        let mut nodes = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_trivia();

            if self.is_exhausted() {
                break;
            }

            let start = self.index();

            match self.parse_node(extension) {
                Ok(node) => nodes.push(node),

                Err(e) => {
                    debug!(error = %e, "skipping to the next line");
                    errors.push(e);
                    self.rest_of_line();

                    if self.index() == start {
                        self.bump();
                    }
                }
            }
        }

        (nodes, errors)
    }

    /// Parses a single top-level node, consulting `extension` first.
    #[instrument(level = "trace", skip(self, extension), ret)]
    pub fn parse_node(&mut self, extension: &mut dyn Extension) -> Result<Node, SyntaxError> {
        let start = self.index();

        if let Some(node) = extension.second_pass(self)? {
            if self.index() > start {
                return Ok(node);
            }
        }

        let command = self.parse_command()?;
        self.expect_end_of_command()?;

        Ok(Node::Command(command))
    }

    pub fn expect_end_of_command(&mut self) -> Result<(), SyntaxError> {
        self.skip_spaces();

        if self.at_end_of_line() {
            Ok(())
        } else {
            Err(self.error(SyntaxErrorKind::ExpectedEndOfCommand))
        }
    }

    /// Dispatches on the command name.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_command(&mut self) -> Result<Command, SyntaxError> {
        let mut parser = self.bounded_by(COMMAND_RECURSION_COST)?;
        let pos = parser.pos();

        let name = match parser.peek_literal() {
            Some(name) => name,
            None => return Err(parser.unexpected("a command name")),
        };

        let result = match name {
            "execute" => parser.parse_execute().map(Command::Execute),
            "function" => parser.parse_function().map(Command::Function),
            "schedule" => parser.parse_schedule().map(Command::Schedule),
            _ => parser.parse_unknown().map(Command::Unknown),
        };

        result.with_context(|| format!("the `{name}` command"), pos)
    }

    /// Keeps a command without a dedicated grammar as raw text.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_unknown(&mut self) -> Result<UnknownCommand, SyntaxError> {
        let name = self.parse_literal()?;

        if self.at_kind(TokenKind::Space) {
            self.bump();
        }

        let rest = self.rest_of_line();
        let raw = rest.iter().map(|token| token.text.as_ref()).join("");
        let args = rest
            .split(Token::is_space)
            .filter(|tokens| !tokens.is_empty())
            .map(|tokens| tokens.iter().map(|token| token.text.as_ref()).join(""))
            .collect();

        Ok(UnknownCommand {
            pos: name.pos,
            name: name.value,
            raw,
            args,
        })
    }
}

/// An int without a suffix must fit in 32 bits. The lexer lets a bare
/// `2147483648` through so that `-2147483648` can be merged.
pub(crate) fn check_int_range(
    value: i64,
    suffix: Option<NumberSuffix>,
    pos: Position,
) -> Result<(), SyntaxError> {
    match suffix {
        None if i32::try_from(value).is_err() => Err(SyntaxError::new(
            SyntaxErrorKind::IntOutOfRange(value),
            pos,
        )),
        _ => Ok(()),
    }
}

/// Normalizes `tokens` and parses them into top-level nodes.
pub fn parse(tokens: Vec<Token<'_>>) -> Result<Vec<Node>, SyntaxError> {
    parse_with(tokens, ParserConfig::default(), &mut NoExtension)
}

pub fn parse_with(
    tokens: Vec<Token<'_>>,
    config: ParserConfig,
    extension: &mut dyn Extension,
) -> Result<Vec<Node>, SyntaxError> {
    let tokens = normalize_with(tokens, extension);

    Parser::new(&tokens, config).parse_nodes(extension)
}

/// Parses every line it can, collecting the errors of the rest.
pub fn parse_lines_lossy(
    tokens: Vec<Token<'_>>,
    config: ParserConfig,
    extension: &mut dyn Extension,
) -> (Vec<Node>, Vec<SyntaxError>) {
    let tokens = normalize_with(tokens, extension);

    Parser::new(&tokens, config).parse_nodes_lossy(extension)
}
