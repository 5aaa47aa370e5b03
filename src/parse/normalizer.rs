use std::borrow::Cow;

use itertools::Itertools;
use tracing::debug;

use crate::parse::cursor::Cursor;
use crate::parse::extension::{Extension, NoExtension};
use crate::parse::token::{NumberSuffix, Token, TokenKind, TokenValue, MERGEABLE_CONTROL_CHARS};

/// A numeral spotted at some position of the raw token stream.
struct Numeral {
    len: usize,
    value: TokenValue<'static>,
}

fn is_sign(token: &Token<'_>) -> bool {
    token.is_control("-") || token.is_control("+")
}

fn is_dot(token: &Token<'_>) -> bool {
    token.is_control(".")
}

fn is_digits(token: &Token<'_>) -> bool {
    token.is(TokenKind::Number)
}

fn is_mergeable_control(token: &Token<'_>) -> bool {
    token.is(TokenKind::Control)
        && token.text.chars().count() == 1
        && token
            .text
            .chars()
            .all(|c| MERGEABLE_CONTROL_CHARS.contains(&c))
}

/// Recognizes `[sign] (digits [. digits] | . digits) [suffix]` at the start of `tokens`.
fn scan_numeral(tokens: &[Token<'_>]) -> Option<Numeral> {
    let mut len = 0;
    let negative = match tokens.first() {
        Some(token) if is_sign(token) => {
            len += 1;
            token.text == "-"
        }
        _ => false,
    };

    let int_part = tokens.get(len).filter(|t| is_digits(t));

    if int_part.is_some() {
        len += 1;
    }

    let frac_part = match (tokens.get(len), tokens.get(len + 1)) {
        (Some(dot), Some(digits)) if is_dot(dot) && is_digits(digits) => {
            len += 2;
            Some(digits)
        }
        _ => None,
    };

    if int_part.is_none() && frac_part.is_none() {
        return None;
    }

    let suffix = tokens
        .get(len)
        .filter(|t| t.is(TokenKind::Literal) && t.text.chars().count() == 1)
        .and_then(|t| t.text.chars().next())
        .and_then(NumberSuffix::from_char);

    if suffix.is_some() {
        len += 1;
    }

    let sign = if negative { "-" } else { "" };
    let int_digits = int_part.map(|t| t.text.as_ref()).unwrap_or("0");

    let value = match frac_part {
        Some(frac) => TokenValue::Float {
            value: format!("{sign}{int_digits}.{}", frac.text).parse().ok()?,
            suffix,
        },

        None => TokenValue::Int {
            value: format!("{sign}{int_digits}").parse().ok()?,
            suffix,
        },
    };

    Some(Numeral { len, value })
}

fn merge<'src>(value: TokenValue<'src>, tokens: &[Token<'src>]) -> Token<'src> {
    let text = tokens.iter().map(|t| t.text.as_ref()).join("");

    Token::new(value, Cow::Owned(text), tokens[0].pos)
}

/// Runs the first pass: fuses signed/decimal numerals into typed `Int`/`Float`
/// tokens and runs of operator characters into literals.
///
/// Never fails; tokens that take part in no merge are passed through as-is.
pub fn normalize(tokens: Vec<Token<'_>>) -> Vec<Token<'_>> {
    normalize_with(tokens, &mut NoExtension)
}

pub fn normalize_with<'src>(
    tokens: Vec<Token<'src>>,
    extension: &mut dyn Extension,
) -> Vec<Token<'src>> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut cursor = Cursor::new(&tokens);

    while !cursor.is_exhausted() {
        let before = cursor.index();

        if extension.first_pass(&mut cursor, &mut result) && cursor.index() > before {
            continue;
        }

        let remaining = cursor.remaining();

        if let Some(Numeral { len, value }) = scan_numeral(remaining) {
            result.push(merge(value, &remaining[..len]));
            cursor.advance_by(len);

            continue;
        }

        let run = remaining
            .iter()
            .enumerate()
            .take_while(|&(i, token)| {
                is_mergeable_control(token) && (i == 0 || scan_numeral(&remaining[i..]).is_none())
            })
            .count();

        if run >= 2 {
            result.push(merge(TokenValue::Literal, &remaining[..run]));
            cursor.advance_by(run);
        } else if let Some(token) = cursor.next() {
            result.push(token.clone());
        }
    }

    debug!(
        before = tokens.len(),
        after = result.len(),
        "normalized the token stream"
    );

    result
}
