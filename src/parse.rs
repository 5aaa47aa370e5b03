mod commands;
mod cursor;
mod extension;
mod grammar;
mod lexer;
mod normalizer;
mod parser;
pub mod token;

pub use cursor::{Cursor, Step};
pub use extension::{Extension, NoExtension};
pub use lexer::{tokenize, tokenize_with, Lexer, TokenizerConfig};
pub use normalizer::{normalize, normalize_with};
pub use parser::{
    parse, parse_lines_lossy, parse_with, Parser, ParserConfig, COMMAND_RECURSION_COST,
    DEFAULT_RECURSION_LIMIT,
};
pub use token::{Token, TokenKind, TokenValue};
