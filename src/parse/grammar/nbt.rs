use indexmap::IndexMap;
use itertools::Itertools;
use tracing::instrument;

use crate::ast::{
    BoolValue, FloatValue, IntValue, Literal, NbtArrayType, NbtCompound, NbtIndex, NbtList,
    NbtPath, NbtPathSegment, NbtValue, NumberSuffix, Quote, QuotedString,
};
use crate::errors::{ResultExt, SyntaxError, SyntaxErrorKind};
use crate::parse::parser::{check_int_range, Parser};
use crate::parse::token::{Token, TokenKind, TokenValue};

fn ends_nbt_value(token: &Token<'_>) -> bool {
    token.is_space()
        || token.is_newline()
        || token.is_control(",")
        || token.is(TokenKind::Bracket)
}

fn is_key_token(token: &Token<'_>) -> bool {
    match token.kind() {
        TokenKind::Literal
        | TokenKind::Number
        | TokenKind::Int
        | TokenKind::Float
        | TokenKind::Boolean
        | TokenKind::Unknown => true,
        TokenKind::Control => !token.is_control(":") && !token.is_control(","),
        _ => false,
    }
}

fn is_path_key_token(token: &Token<'_>) -> bool {
    match token.kind() {
        TokenKind::Literal
        | TokenKind::Number
        | TokenKind::Int
        | TokenKind::Boolean
        | TokenKind::Unknown => true,
        TokenKind::Control => !token.is_control(".") && !token.is_control(".."),
        _ => false,
    }
}

fn matches_array_type(value: &NbtValue, array_type: NbtArrayType) -> bool {
    let suffix = match value {
        NbtValue::Int(IntValue { suffix, .. }) => *suffix,
        _ => return false,
    };

    match array_type {
        NbtArrayType::Byte => suffix == Some(NumberSuffix::Byte),
        NbtArrayType::Int => suffix.is_none(),
        NbtArrayType::Long => suffix == Some(NumberSuffix::Long),
    }
}

impl Parser<'_, '_> {
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_nbt_value(&mut self) -> Result<NbtValue, SyntaxError> {
        match self.peek() {
            Some(token) if token.is_bracket('{') => self.parse_nbt_compound().map(NbtValue::Compound),
            Some(token) if token.is_bracket('[') => self.parse_nbt_list().map(NbtValue::List),

            Some(token) if token.is(TokenKind::QuotedString) => {
                self.parse_quoted_string().map(NbtValue::String)
            }

            _ => self.parse_nbt_primitive(),
        }
    }

    /// Parses `{key: value, ...}`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_nbt_compound(&mut self) -> Result<NbtCompound, SyntaxError> {
        let pos = self.pos();
        let mut parser = self.bounded()?;

        parser
            .parse_nbt_compound_inner()
            .context("an NBT compound", pos)
    }

    fn parse_nbt_compound_inner(&mut self) -> Result<NbtCompound, SyntaxError> {
        let pos = self.pos();
        self.expect_bracket('{')?;
        let mut entries = IndexMap::new();

        loop {
            self.skip_spaces();

            if self.eat_bracket('}').is_some() {
                break;
            }

            let key = self.parse_nbt_key()?;
            self.skip_spaces();
            self.expect_control(":")?;
            self.skip_spaces();
            let value = self.parse_nbt_value()?;
            entries.insert(key, value);
            self.skip_spaces();

            if self.eat_control(",").is_none() {
                self.expect_bracket('}')?;

                break;
            }
        }

        Ok(NbtCompound { pos, entries })
    }

    fn parse_nbt_key(&mut self) -> Result<String, SyntaxError> {
        if let Some(Token {
            value: TokenValue::QuotedString { value, .. },
            ..
        }) = self.peek()
        {
            self.bump();

            return Ok(value.to_string());
        }

        let mut parts = Vec::new();

        while let Some(token) = self.peek().filter(|token| is_key_token(token)) {
            parts.push(token.text.as_ref());
            self.bump();
        }

        if parts.is_empty() {
            Err(self.unexpected("an NBT key"))
        } else {
            Ok(parts.join(""))
        }
    }

    /// Parses `[value, ...]`, optionally typed with a `B;`, `I;` or `L;` prefix.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_nbt_list(&mut self) -> Result<NbtList, SyntaxError> {
        let pos = self.pos();
        let mut parser = self.bounded()?;

        parser.parse_nbt_list_inner().context("an NBT list", pos)
    }

    fn parse_nbt_list_inner(&mut self) -> Result<NbtList, SyntaxError> {
        let pos = self.pos();
        self.expect_bracket('[')?;

        let array_type = match (self.peek(), self.peek_nth(1)) {
            (Some(prefix), Some(semicolon))
                if prefix.is(TokenKind::Literal) && semicolon.is_control(";") =>
            {
                match NbtArrayType::from_prefix(&prefix.text) {
                    Some(array_type) => {
                        self.advance_by(2);

                        Some(array_type)
                    }

                    None => return Err(self.unexpected("`B`, `I` or `L`")),
                }
            }

            _ => None,
        };

        let mut items = Vec::new();

        loop {
            self.skip_spaces();

            if self.eat_bracket(']').is_some() {
                break;
            }

            let start = self.peek();
            let item_pos = self.pos();
            let item = self.parse_nbt_value()?;

            if let Some(array_type) = array_type {
                if !matches_array_type(&item, array_type) {
                    return Err(SyntaxError::at(
                        SyntaxErrorKind::NbtListTypeMismatch {
                            expected: array_type,
                        },
                        start,
                        item_pos,
                    ));
                }
            }

            items.push(item);
            self.skip_spaces();

            if self.eat_control(",").is_none() {
                self.expect_bracket(']')?;

                break;
            }
        }

        Ok(NbtList {
            pos,
            array_type,
            items,
        })
    }

    /// Parses a number, a boolean or an unquoted string.
    ///
    /// A numeral directly followed by more text (`1a`, `3.5.2`) is an unquoted string.
    fn parse_nbt_primitive(&mut self) -> Result<NbtValue, SyntaxError> {
        let pos = self.pos();
        let mut tokens = Vec::new();

        while let Some(token) = self.peek().filter(|token| !ends_nbt_value(token)) {
            tokens.push(token);
            self.bump();
        }

        let value = match tokens.as_slice() {
            [] => return Err(self.unexpected("an NBT value")),

            [Token {
                value: TokenValue::Int { value, suffix },
                ..
            }] => {
                check_int_range(*value, *suffix, pos)?;

                NbtValue::Int(IntValue {
                    pos,
                    value: *value,
                    suffix: *suffix,
                })
            }

            [Token {
                value: TokenValue::Float { value, suffix },
                ..
            }] => NbtValue::Float(FloatValue {
                pos,
                value: *value,
                suffix: *suffix,
            }),

            [Token {
                value: TokenValue::Boolean(value),
                ..
            }] => NbtValue::Bool(BoolValue { pos, value: *value }),

            tokens => NbtValue::Literal(Literal {
                pos,
                value: tokens.iter().map(|token| token.text.as_ref()).join(""),
            }),
        };

        Ok(value)
    }

    /// Parses a path such as `Items[{Slot:0b}].tag."display name"`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_nbt_path(&mut self) -> Result<NbtPath, SyntaxError> {
        let pos = self.pos();

        self.parse_nbt_path_inner().context("an NBT path", pos)
    }

    fn parse_nbt_path_inner(&mut self) -> Result<NbtPath, SyntaxError> {
        let pos = self.pos();
        let mut segments = Vec::new();

        while !self.at_end_of_argument() {
            let token = match self.peek() {
                Some(token) => token,
                None => break,
            };

            match &token.value {
                _ if token.is_control(".") => {
                    self.bump();
                    segments.push(NbtPathSegment::Separator(token.pos));
                }

                TokenValue::Float { .. } => {
                    self.bump();
                    split_path_key(&mut segments, token);
                }

                TokenValue::QuotedString {
                    quote: Quote::Double,
                    value,
                } => {
                    self.bump();
                    segments.push(NbtPathSegment::QuotedKey(QuotedString {
                        pos: token.pos,
                        quote: Quote::Double,
                        value: value.to_string(),
                    }));
                }

                TokenValue::QuotedString { .. } => {
                    return Err(self.error(SyntaxErrorKind::SingleQuotedPathKey));
                }

                TokenValue::Bracket('{') => {
                    segments.push(NbtPathSegment::Filter(self.parse_nbt_compound()?));
                }

                TokenValue::Bracket('[') => {
                    segments.push(self.parse_nbt_index()?);
                }

                _ if is_path_key_token(token) => {
                    let mut parts = Vec::new();

                    while let Some(token) = self.peek().filter(|token| is_path_key_token(token)) {
                        parts.push(token.text.as_ref());
                        self.bump();
                    }

                    segments.push(NbtPathSegment::Key(Literal {
                        pos: token.pos,
                        value: parts.join(""),
                    }));
                }

                _ => return Err(self.unexpected("an NBT path segment")),
            }
        }

        if segments.is_empty() {
            return Err(self.unexpected("an NBT path"));
        }

        Ok(NbtPath { pos, segments })
    }

    fn parse_nbt_index(&mut self) -> Result<NbtPathSegment, SyntaxError> {
        let pos = self.pos();
        self.expect_bracket('[')?;

        let index = if self.at_bracket(']') {
            NbtIndex::All
        } else if self.at_bracket('{') {
            NbtIndex::Filter(self.parse_nbt_compound()?)
        } else {
            NbtIndex::Element(self.parse_nbt_int()?)
        };

        self.expect_bracket(']')?;

        Ok(NbtPathSegment::Index { pos, index })
    }
}

/// Splits a numeral such as `.1` that the normalizer fused across a path separator.
fn split_path_key(segments: &mut Vec<NbtPathSegment>, token: &Token<'_>) {
    let mut pos = token.pos;

    for (idx, part) in token.text.split('.').enumerate() {
        if idx > 0 {
            segments.push(NbtPathSegment::Separator(pos));
            pos = pos.advance('.');
        }

        if !part.is_empty() {
            segments.push(NbtPathSegment::Key(Literal {
                pos,
                value: part.to_owned(),
            }));
            pos = pos.advance_str(part);
        }
    }
}
