use tracing::instrument;

use crate::ast::{Number, NumberSuffix, ScheduleCommand, ScheduleMode, ScheduleTime, TimeUnit};
use crate::errors::{SyntaxError, SyntaxErrorKind};
use crate::parse::parser::Parser;
use crate::parse::token::TokenKind;

impl Parser<'_, '_> {
    /// Parses `schedule function <id> <time> [append|replace]` and `schedule clear <id>`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_schedule(&mut self) -> Result<ScheduleCommand, SyntaxError> {
        let pos = self.expect_literal_text("schedule")?;
        self.end_argument()?;

        match self.peek_literal() {
            Some("function") => {
                self.bump();
                self.end_argument()?;
                let id = self.parse_resource_location(true)?;
                self.end_argument()?;
                let time = self.parse_schedule_time()?;
                self.end_argument()?;

                let mode = if self.at_end_of_line() {
                    None
                } else {
                    Some(self.expect_keyword::<ScheduleMode>()?)
                };

                Ok(ScheduleCommand::Function {
                    pos,
                    id,
                    time,
                    mode,
                })
            }

            Some("clear") => {
                self.bump();
                self.end_argument()?;
                let id = self.parse_resource_location(true)?;

                Ok(ScheduleCommand::Clear { pos, id })
            }

            _ => Err(self.unexpected("`function` or `clear`")),
        }
    }

    /// Parses a duration such as `20`, `20t`, `1.5s` or `2d`.
    ///
    /// The `s` and `d` units reach the parser as numeral suffixes.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_schedule_time(&mut self) -> Result<ScheduleTime, SyntaxError> {
        let pos = self.pos();
        let mut value = self.parse_number()?;

        let suffix = match &mut value {
            Number::Int(int) => int.suffix.take(),
            Number::Float(float) => float.suffix.take(),
        };

        let unit = match suffix {
            Some(NumberSuffix::Short) => TimeUnit::Seconds,
            Some(NumberSuffix::Double) => TimeUnit::Days,
            Some(suffix) => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::InvalidTimeUnit(suffix.as_char().to_string()),
                    pos,
                ))
            }

            None => match self.peek() {
                Some(token) if token.is_literal("t") => {
                    self.bump();

                    TimeUnit::Ticks
                }

                Some(token) if token.is(TokenKind::Literal) => {
                    return Err(self.error(SyntaxErrorKind::InvalidTimeUnit(token.text.to_string())))
                }

                _ => TimeUnit::Ticks,
            },
        };

        Ok(ScheduleTime { pos, value, unit })
    }
}
