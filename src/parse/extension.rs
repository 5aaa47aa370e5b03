use crate::ast::Node;
use crate::errors::SyntaxError;
use crate::parse::cursor::Cursor;
use crate::parse::parser::Parser;
use crate::parse::token::Token;

/// Hooks that let an embedding layer intercept the token stream before the
/// default handling of both passes.
///
/// Both hooks report whether they consumed the current position. A hook that
/// claims the position must advance past it; otherwise the default handling runs.
pub trait Extension {
    /// Called by the normalizer at every position of the raw token stream.
    /// Tokens produced by the hook are appended to `out`.
    #[allow(unused_variables)]
    fn first_pass<'src>(
        &mut self,
        cursor: &mut Cursor<'_, Token<'src>>,
        out: &mut Vec<Token<'src>>,
    ) -> bool {
        false
    }

    /// Called by the structural parser before it dispatches a top-level token.
    #[allow(unused_variables)]
    fn second_pass(&mut self, parser: &mut Parser<'_, '_>) -> Result<Option<Node>, SyntaxError> {
        Ok(None)
    }
}

/// The default: no interception at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtension;

impl Extension for NoExtension {}
