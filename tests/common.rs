#![allow(dead_code)]

use std::borrow::Cow;
use std::fmt::Write;

use once_cell::unsync::OnceCell;

use mcfn::ast::{Command, Node};
use mcfn::errors::{Error, SyntaxError};
use mcfn::parse::{normalize, tokenize, Parser, ParserConfig, Token};
use mcfn::position::Position;

pub struct Dump<'a> {
    bytes: Cow<'a, [u8]>,
    string: OnceCell<String>,
}

impl PartialEq for Dump<'_> {
    fn eq(&self, other: &Dump) -> bool {
        self.bytes == other.bytes
    }
}

impl AsRef<str> for Dump<'_> {
    fn as_ref(&self) -> &str {
        self.string
            .get_or_init(|| String::from_utf8_lossy(&self.bytes).into_owned())
    }
}

impl<'a> From<&'a [u8]> for Dump<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
            string: OnceCell::new(),
        }
    }
}

impl From<Vec<u8>> for Dump<'_> {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Cow::Owned(bytes),
            string: OnceCell::new(),
        }
    }
}

/// One token per line, rendered as `kind:'text'`.
pub fn dump_tokens(tokens: &[Token<'_>]) -> Dump<'static> {
    let mut buf = String::new();

    for token in tokens {
        writeln!(buf, "{token}").unwrap();
    }

    Dump::from(buf.into_bytes())
}

pub fn pos(byte: usize, line: usize, col: usize) -> Position {
    Position::new(byte, line, col)
}

/// A position on the first line of an ASCII source.
pub fn at(col: usize) -> Position {
    pos(col, 0, col)
}

pub fn normalized(src: &str) -> Vec<Token<'_>> {
    normalize(tokenize(src).unwrap_or_else(|e| panic!("{src:?} failed to tokenize: {e}")))
}

/// Runs a single grammar over `src` and checks that it consumed the whole input.
pub fn parse_value<T, F>(src: &str, parse: F) -> Result<T, SyntaxError>
where
    F: for<'t, 'src> FnOnce(&mut Parser<'t, 'src>) -> Result<T, SyntaxError>,
{
    let tokens = normalized(src);
    let mut parser = Parser::new(&tokens, ParserConfig::default());
    let value = parse(&mut parser)?;

    assert!(
        parser.is_exhausted(),
        "{src:?}: unconsumed tokens {:?}",
        parser.remaining()
    );

    Ok(value)
}

pub fn parse_ok(src: &str) -> Vec<Node> {
    mcfn::parse_str(src).unwrap_or_else(|e| panic!("{src:?} failed to parse:\n{e}"))
}

pub fn parse_err(src: &str) -> SyntaxError {
    match mcfn::parse_str(src) {
        Err(Error::Syntax(e)) => e,
        Err(Error::Token(e)) => panic!("{src:?} failed to tokenize: {e}"),
        Ok(nodes) => panic!("{src:?} parsed successfully: {nodes:#?}"),
    }
}

pub fn single_command(src: &str) -> Command {
    let mut nodes = parse_ok(src);
    assert_eq!(nodes.len(), 1, "{src:?}: expected exactly one node");

    match nodes.remove(0) {
        Node::Command(command) => command,
        node => panic!("{src:?}: expected a command, got {node:#?}"),
    }
}
