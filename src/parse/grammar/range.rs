use tracing::instrument;

use crate::ast::{FloatRange, IntRange, Range, RangeOrValue};
use crate::errors::{ResultExt, SyntaxError, SyntaxErrorKind};
use crate::parse::parser::Parser;

impl<'t, 'src> Parser<'t, 'src> {
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_int_range(&mut self) -> Result<IntRange, SyntaxError> {
        let pos = self.pos();

        self.parse_range(Self::parse_int).context("an integer range", pos)
    }

    /// Integer bounds are accepted and widened.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_float_range(&mut self) -> Result<FloatRange, SyntaxError> {
        let pos = self.pos();

        self.parse_range(Self::parse_float).context("a float range", pos)
    }

    fn parse_range<T, F>(&mut self, mut parse_bound: F) -> Result<RangeOrValue<T>, SyntaxError>
    where
        F: FnMut(&mut Self) -> Result<T, SyntaxError>,
    {
        let pos = self.pos();

        if self.eat_control("..").is_some() {
            if !self.at_numeral() {
                return Err(SyntaxError::new(SyntaxErrorKind::EmptyRange, pos));
            }

            let max = parse_bound(self)?;

            return Ok(RangeOrValue::Range(Range {
                pos,
                min: None,
                max: Some(max),
            }));
        }

        let min = parse_bound(self)?;

        if self.eat_control("..").is_none() {
            return Ok(RangeOrValue::Value(min));
        }

        let max = if self.at_numeral() {
            Some(parse_bound(self)?)
        } else {
            None
        };

        Ok(RangeOrValue::Range(Range {
            pos,
            min: Some(min),
            max,
        }))
    }
}
