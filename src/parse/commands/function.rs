use tracing::instrument;

use crate::ast::{FunctionArguments, FunctionCommand};
use crate::errors::SyntaxError;
use crate::parse::parser::Parser;

impl Parser<'_, '_> {
    /// Parses `function <id> [<arguments> | with <source> [<path>]]`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_function(&mut self) -> Result<FunctionCommand, SyntaxError> {
        let pos = self.expect_literal_text("function")?;
        self.end_argument()?;
        let id = self.parse_resource_location(true)?;

        self.end_argument()?;

        let arguments = if self.at_bracket('{') {
            Some(FunctionArguments::Compound(self.parse_nbt_compound()?))
        } else if self.at_literal("with") {
            Some(self.parse_function_with()?)
        } else {
            None
        };

        Ok(FunctionCommand { pos, id, arguments })
    }

    fn parse_function_with(&mut self) -> Result<FunctionArguments, SyntaxError> {
        let pos = self.expect_literal_text("with")?;
        self.end_argument()?;
        let source = self.parse_data_source()?;
        self.end_argument()?;

        let path = if self.at_end_of_line() {
            None
        } else {
            Some(self.parse_nbt_path()?)
        };

        Ok(FunctionArguments::With { pos, source, path })
    }
}
