use indexmap::IndexMap;
use phf::phf_map;
use tracing::instrument;

use crate::ast::{
    AdvancementEntry, AdvancementObject, AdvancementValue, Gamemode, Keyword, Literal,
    ScoreObject, Selector, SelectorArgument, SelectorKey, SelectorValue, SelectorVariable,
    SortOrder, TargetSelector,
};
use crate::errors::{ResultExt, SyntaxError, SyntaxErrorKind};
use crate::parse::parser::Parser;
use crate::parse::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueGrammar {
    Literal,
    String,
    Float,
    FloatRange,
    IntRange,
    ResourceLocation { allow_tag: bool },
    Sort,
    Gamemode,
    Scores,
    Nbt,
    Advancements,
}

#[derive(Debug, Clone, Copy)]
struct ArgumentSpec {
    key: SelectorKey,
    grammar: ValueGrammar,
    invertible: bool,
}

const fn argument(key: SelectorKey, grammar: ValueGrammar, invertible: bool) -> ArgumentSpec {
    ArgumentSpec {
        key,
        grammar,
        invertible,
    }
}

static ARGUMENTS: phf::Map<&'static str, ArgumentSpec> = phf_map! {
    "tag" => argument(SelectorKey::Tag, ValueGrammar::Literal, true),
    "team" => argument(SelectorKey::Team, ValueGrammar::Literal, true),
    "x" => argument(SelectorKey::X, ValueGrammar::Float, false),
    "y" => argument(SelectorKey::Y, ValueGrammar::Float, false),
    "z" => argument(SelectorKey::Z, ValueGrammar::Float, false),
    "dx" => argument(SelectorKey::Dx, ValueGrammar::Float, false),
    "dy" => argument(SelectorKey::Dy, ValueGrammar::Float, false),
    "dz" => argument(SelectorKey::Dz, ValueGrammar::Float, false),
    "distance" => argument(SelectorKey::Distance, ValueGrammar::FloatRange, false),
    "x_rotation" => argument(SelectorKey::XRotation, ValueGrammar::FloatRange, false),
    "y_rotation" => argument(SelectorKey::YRotation, ValueGrammar::FloatRange, false),
    "scores" => argument(SelectorKey::Scores, ValueGrammar::Scores, false),
    "type" => argument(SelectorKey::Type, ValueGrammar::ResourceLocation { allow_tag: true }, true),
    "predicate" => argument(SelectorKey::Predicate, ValueGrammar::ResourceLocation { allow_tag: false }, false),
    "limit" => argument(SelectorKey::Limit, ValueGrammar::IntRange, false),
    "level" => argument(SelectorKey::Level, ValueGrammar::IntRange, false),
    "sort" => argument(SelectorKey::Sort, ValueGrammar::Sort, false),
    "gamemode" => argument(SelectorKey::Gamemode, ValueGrammar::Gamemode, false),
    "nbt" => argument(SelectorKey::Nbt, ValueGrammar::Nbt, false),
    "advancements" => argument(SelectorKey::Advancements, ValueGrammar::Advancements, false),
    "name" => argument(SelectorKey::Name, ValueGrammar::String, false),
};

/// Tokens that end an unquoted value inside `[...]` or `{...}`.
fn ends_inner_value(token: &Token<'_>) -> bool {
    token.is_space()
        || token.is_newline()
        || token.is_control(",")
        || token.is_control("=")
        || token.is(TokenKind::Bracket)
}

impl Parser<'_, '_> {
    /// Parses `@<variable>[args]`, a quoted player name or a bare name/UUID.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_target_selector(&mut self) -> Result<TargetSelector, SyntaxError> {
        let pos = self.pos();

        self.parse_target_selector_inner()
            .context("a target selector", pos)
    }

    fn parse_target_selector_inner(&mut self) -> Result<TargetSelector, SyntaxError> {
        match self.peek() {
            Some(token) if token.is_control("@") => self.parse_selector().map(TargetSelector::Selector),

            Some(token) if token.is(TokenKind::QuotedString) => {
                self.parse_quoted_string().map(TargetSelector::QuotedPlayer)
            }

            _ => self
                .expect_raw_word("a target selector")
                .map(TargetSelector::Player),
        }
    }

    fn parse_selector(&mut self) -> Result<Selector, SyntaxError> {
        let pos = self.pos();
        self.expect_control("@")?;

        let variable = match self.peek() {
            Some(token) if token.is(TokenKind::Literal) => {
                match SelectorVariable::from_keyword(&token.text) {
                    Some(variable) => variable,
                    None => {
                        return Err(self.error(SyntaxErrorKind::InvalidSelectorVariable(
                            token.text.to_string(),
                        )))
                    }
                }
            }

            _ => return Err(self.unexpected("a selector variable")),
        };

        self.bump();

        let arguments = if self.at_bracket('[') {
            self.parse_selector_arguments()?
        } else {
            Vec::new()
        };

        Ok(Selector {
            pos,
            variable,
            arguments,
        })
    }

    fn parse_selector_arguments(&mut self) -> Result<Vec<SelectorArgument>, SyntaxError> {
        self.expect_bracket('[')?;
        let mut arguments = Vec::new();

        loop {
            self.skip_spaces();

            if arguments.is_empty() && self.eat_bracket(']').is_some() {
                break;
            }

            let pos = self.pos();
            let key = self.parse_literal()?;

            let argument = self
                .parse_selector_argument(key)
                .context("a selector argument", pos)?;

            arguments.push(argument);
            self.skip_spaces();

            if self.eat_control(",").is_none() {
                self.expect_bracket(']')?;

                break;
            }
        }

        Ok(arguments)
    }

    fn parse_selector_argument(&mut self, key: Literal) -> Result<SelectorArgument, SyntaxError> {
        let spec = match ARGUMENTS.get(key.value.as_str()) {
            Some(spec) => *spec,
            None => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnknownSelectorArgument(key.value),
                    key.pos,
                ))
            }
        };

        self.skip_spaces();
        self.expect_control("=")?;
        self.skip_spaces();

        let inverted = match self.peek() {
            Some(token) if token.is_control("!") => {
                if !spec.invertible {
                    return Err(self.error(SyntaxErrorKind::NonInvertibleArgument(key.value)));
                }

                self.bump();

                true
            }

            _ => false,
        };

        let value = match spec.grammar {
            ValueGrammar::Literal => SelectorValue::Literal(self.parse_inner_word()),

            ValueGrammar::String => match self.peek() {
                Some(token) if token.is(TokenKind::QuotedString) => {
                    SelectorValue::QuotedString(self.parse_quoted_string()?)
                }

                _ => SelectorValue::Literal(self.parse_inner_word()),
            },

            ValueGrammar::Float => SelectorValue::Float(self.parse_float()?),
            ValueGrammar::FloatRange => SelectorValue::FloatRange(self.parse_float_range()?),
            ValueGrammar::IntRange => SelectorValue::IntRange(self.parse_int_range()?),

            ValueGrammar::ResourceLocation { allow_tag } => {
                SelectorValue::ResourceLocation(self.parse_resource_location(allow_tag)?)
            }

            ValueGrammar::Sort => SelectorValue::Sort(self.expect_keyword::<SortOrder>()?),
            ValueGrammar::Gamemode => SelectorValue::Gamemode(self.expect_keyword::<Gamemode>()?),
            ValueGrammar::Scores => SelectorValue::Scores(self.parse_score_object()?),
            ValueGrammar::Nbt => SelectorValue::Nbt(self.parse_nbt_compound()?),
            ValueGrammar::Advancements => {
                SelectorValue::Advancements(self.parse_advancement_object()?)
            }
        };

        Ok(SelectorArgument {
            pos: key.pos,
            key: spec.key,
            inverted,
            value,
        })
    }

    /// Joins the tokens up to the next separator; the result may be empty.
    fn parse_inner_word(&mut self) -> Literal {
        let pos = self.pos();
        let mut parts = Vec::new();

        while let Some(token) = self.peek().filter(|token| !ends_inner_value(token)) {
            parts.push(token.text.as_ref());
            self.bump();
        }

        Literal {
            pos,
            value: parts.join(""),
        }
    }

    fn parse_inner_key(&mut self, expected: &'static str) -> Result<Literal, SyntaxError> {
        let key = self.parse_inner_word();

        if key.value.is_empty() {
            Err(self.unexpected(expected))
        } else {
            Ok(key)
        }
    }

    /// Parses `{objective=range,...}`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_score_object(&mut self) -> Result<ScoreObject, SyntaxError> {
        let pos = self.pos();
        self.expect_bracket('{')?;
        let mut scores = IndexMap::new();

        loop {
            self.skip_spaces();

            if scores.is_empty() && self.eat_bracket('}').is_some() {
                break;
            }

            let objective = self.parse_inner_key("an objective")?;

            if scores.contains_key(&objective.value) {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::DuplicateKey(objective.value),
                    objective.pos,
                ));
            }

            self.skip_spaces();
            self.expect_control("=")?;
            self.skip_spaces();
            scores.insert(objective.value, self.parse_int_range()?);
            self.skip_spaces();

            if self.eat_control(",").is_none() {
                self.expect_bracket('}')?;

                break;
            }
        }

        Ok(ScoreObject { pos, scores })
    }

    /// Parses `{advancement=bool,advancement={criterion=bool,...},...}`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_advancement_object(&mut self) -> Result<AdvancementObject, SyntaxError> {
        let pos = self.pos();
        self.expect_bracket('{')?;
        let mut entries = Vec::new();

        loop {
            self.skip_spaces();

            if entries.is_empty() && self.eat_bracket('}').is_some() {
                break;
            }

            let entry_pos = self.pos();
            let id = self.parse_resource_location(false)?;
            self.skip_spaces();
            self.expect_control("=")?;
            self.skip_spaces();

            let value = if self.at_bracket('{') {
                self.parse_advancement_criteria()?
            } else {
                AdvancementValue::Done(self.parse_bool()?)
            };

            entries.push(AdvancementEntry {
                pos: entry_pos,
                id,
                value,
            });
            self.skip_spaces();

            if self.eat_control(",").is_none() {
                self.expect_bracket('}')?;

                break;
            }
        }

        Ok(AdvancementObject { pos, entries })
    }

    fn parse_advancement_criteria(&mut self) -> Result<AdvancementValue, SyntaxError> {
        let pos = self.pos();
        self.expect_bracket('{')?;
        let mut criteria = IndexMap::new();

        loop {
            self.skip_spaces();

            if criteria.is_empty() && self.eat_bracket('}').is_some() {
                break;
            }

            let criterion = self.parse_inner_key("a criterion")?;

            if criteria.contains_key(&criterion.value) {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::DuplicateKey(criterion.value),
                    criterion.pos,
                ));
            }

            self.skip_spaces();
            self.expect_control("=")?;
            self.skip_spaces();
            criteria.insert(criterion.value, self.parse_bool()?);
            self.skip_spaces();

            if self.eat_control(",").is_none() {
                self.expect_bracket('}')?;

                break;
            }
        }

        Ok(AdvancementValue::Criteria { pos, criteria })
    }
}
