pub mod ast;
pub mod errors;
pub mod parse;
pub mod position;
pub mod source;

use crate::ast::Node;
use crate::errors::Error;

/// Tokenizes and parses `src` with the default configuration.
pub fn parse_str(src: &str) -> Result<Vec<Node>, Error> {
    let tokens = parse::tokenize(src)?;

    Ok(parse::parse(tokens)?)
}
