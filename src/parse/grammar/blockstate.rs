use indexmap::IndexMap;
use tracing::instrument;

use crate::ast::{BlockPredicate, BlockState, BlockStateValue};
use crate::errors::{ResultExt, SyntaxError};
use crate::parse::parser::Parser;
use crate::parse::token::TokenKind;

impl Parser<'_, '_> {
    /// Parses `[key=value,...]`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_block_state(&mut self) -> Result<BlockState, SyntaxError> {
        let pos = self.pos();

        self.parse_block_state_inner().context("a block state", pos)
    }

    fn parse_block_state_inner(&mut self) -> Result<BlockState, SyntaxError> {
        let pos = self.pos();
        self.expect_bracket('[')?;
        let mut properties = IndexMap::new();

        loop {
            self.skip_spaces();

            if self.eat_bracket(']').is_some() {
                break;
            }

            let key = self.parse_literal()?;
            self.skip_spaces();
            self.expect_control("=")?;
            self.skip_spaces();

            let value = match self.peek().map(|token| token.kind()) {
                Some(TokenKind::Boolean) => BlockStateValue::Bool(self.parse_bool()?),
                Some(TokenKind::Int) => BlockStateValue::Int(self.parse_int()?),
                Some(TokenKind::Literal) => BlockStateValue::Literal(self.parse_literal()?),
                _ => return Err(self.unexpected("a block state value")),
            };

            properties.insert(key.value, value);
            self.skip_spaces();

            if self.eat_control(",").is_none() {
                self.expect_bracket(']')?;

                break;
            }
        }

        Ok(BlockState { pos, properties })
    }

    /// Parses a block id with optional state and data: `stone`, `#logs[axis=y]`, `chest{Lock:""}`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_block_predicate(&mut self, allow_tag: bool) -> Result<BlockPredicate, SyntaxError> {
        let pos = self.pos();
        let id = self.parse_resource_location(allow_tag)?;

        let state = if self.at_bracket('[') {
            Some(self.parse_block_state()?)
        } else {
            None
        };

        let nbt = if self.at_bracket('{') {
            Some(self.parse_nbt_compound()?)
        } else {
            None
        };

        Ok(BlockPredicate {
            pos,
            id,
            state,
            nbt,
        })
    }
}
