use tracing::instrument;

use crate::ast::{
    Anchor, Axis, BlocksMode, BossbarField, CompareOp, Condition, DataSource, ExecuteCommand,
    ExecuteSubcommand, Facing, FloatValue, Heightmap, NbtPath, Positioned, Relation, Rotated,
    ScoreHolder, ScoreTest, StoreDataType, StoreMode, StoreTarget, Swizzle,
};
use crate::errors::{ResultExt, SyntaxError, SyntaxErrorKind};
use crate::parse::parser::Parser;
use crate::position::Position;

const SUBCOMMANDS: &[&str] = &[
    "align",
    "anchored",
    "as",
    "at",
    "facing",
    "in",
    "on",
    "positioned",
    "rotated",
    "store",
    "if",
    "unless",
    "run",
];

fn parse_swizzle_axes(text: &str) -> Option<Vec<Axis>> {
    let axes = text.chars().map(Axis::from_char).collect::<Option<Vec<_>>>()?;
    let distinct = axes
        .iter()
        .enumerate()
        .all(|(idx, axis)| !axes[..idx].contains(axis));

    (distinct && (2..=3).contains(&axes.len())).then_some(axes)
}

impl Parser<'_, '_> {
    /// Parses `execute <sub-command>...`, stopping after `run` or at the end of the line.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_execute(&mut self) -> Result<ExecuteCommand, SyntaxError> {
        let pos = self.expect_literal_text("execute")?;
        let mut subcommands = Vec::new();

        loop {
            self.end_argument()?;

            if self.at_end_of_line() {
                break;
            }

            let subcommand = self.parse_execute_subcommand()?;
            let is_run = matches!(subcommand, ExecuteSubcommand::Run { .. });
            subcommands.push(subcommand);

            if is_run {
                break;
            }
        }

        if subcommands.is_empty() {
            return Err(self.unexpected("an execute sub-command"));
        }

        Ok(ExecuteCommand { pos, subcommands })
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_execute_subcommand(&mut self) -> Result<ExecuteSubcommand, SyntaxError> {
        let pos = self.pos();

        let name = match self.peek_literal() {
            Some(name) if SUBCOMMANDS.contains(&name) => name,

            Some(name) => {
                return Err(self.error(SyntaxErrorKind::UnknownSubcommand(name.to_owned())))
            }

            None => return Err(self.unexpected("an execute sub-command")),
        };

        self.bump();

        self.parse_execute_subcommand_body(name, pos)
            .with_context(|| format!("the `{name}` sub-command"), pos)
    }

    fn parse_execute_subcommand_body(
        &mut self,
        name: &str,
        pos: Position,
    ) -> Result<ExecuteSubcommand, SyntaxError> {
        self.end_argument()?;

        Ok(match name {
            "align" => ExecuteSubcommand::Align {
                pos,
                swizzle: self.parse_swizzle()?,
            },

            "anchored" => ExecuteSubcommand::Anchored {
                pos,
                anchor: self.expect_keyword::<Anchor>()?,
            },

            "as" => ExecuteSubcommand::As {
                pos,
                target: self.parse_target_selector()?,
            },

            "at" => ExecuteSubcommand::At {
                pos,
                target: self.parse_target_selector()?,
            },

            "facing" => ExecuteSubcommand::Facing {
                pos,
                facing: self.parse_facing()?,
            },

            "in" => ExecuteSubcommand::In {
                pos,
                dimension: self.parse_resource_location(false)?,
            },

            "on" => ExecuteSubcommand::On {
                pos,
                relation: self.expect_keyword::<Relation>()?,
            },

            "positioned" => ExecuteSubcommand::Positioned {
                pos,
                position: self.parse_positioned()?,
            },

            "rotated" => ExecuteSubcommand::Rotated {
                pos,
                rotation: self.parse_rotated()?,
            },

            "store" => {
                let mode = self.expect_keyword::<StoreMode>()?;
                self.end_argument()?;

                ExecuteSubcommand::Store {
                    pos,
                    mode,
                    target: self.parse_store_target()?,
                }
            }

            "if" => ExecuteSubcommand::If {
                pos,
                condition: self.parse_condition()?,
            },

            "unless" => ExecuteSubcommand::Unless {
                pos,
                condition: self.parse_condition()?,
            },

            "run" => ExecuteSubcommand::Run {
                pos,
                command: Box::new(self.parse_command()?),
            },

            _ => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::UnknownSubcommand(name.to_owned()),
                    pos,
                ))
            }
        })
    }

    fn parse_swizzle(&mut self) -> Result<Swizzle, SyntaxError> {
        let pos = self.pos();

        let text = match self.peek_literal() {
            Some(text) => text,
            None => return Err(self.unexpected("a swizzle")),
        };

        match parse_swizzle_axes(text) {
            Some(axes) => {
                self.bump();

                Ok(Swizzle { pos, axes })
            }

            None => Err(self.error(SyntaxErrorKind::InvalidSwizzle(text.to_owned()))),
        }
    }

    fn parse_facing(&mut self) -> Result<Facing, SyntaxError> {
        if !self.at_literal("entity") {
            return self.parse_vec3().map(Facing::Position);
        }

        let pos = self.expect_literal_text("entity")?;
        self.end_argument()?;
        let target = self.parse_target_selector()?;
        self.end_argument()?;
        let anchor = self.expect_keyword::<Anchor>()?;

        Ok(Facing::Entity {
            pos,
            target,
            anchor,
        })
    }

    fn parse_positioned(&mut self) -> Result<Positioned, SyntaxError> {
        let pos = self.pos();

        match self.peek_literal() {
            Some("as") => {
                self.bump();
                self.end_argument()?;
                let target = self.parse_target_selector()?;

                Ok(Positioned::As { pos, target })
            }

            Some("over") => {
                self.bump();
                self.end_argument()?;
                let heightmap = self.expect_keyword::<Heightmap>()?;

                Ok(Positioned::Over { pos, heightmap })
            }

            _ => self.parse_vec3().map(Positioned::Position),
        }
    }

    fn parse_rotated(&mut self) -> Result<Rotated, SyntaxError> {
        let pos = self.pos();

        if self.at_literal("as") {
            self.bump();
            self.end_argument()?;
            let target = self.parse_target_selector()?;

            Ok(Rotated::As { pos, target })
        } else {
            self.parse_vec2(false).map(Rotated::Rotation)
        }
    }

    /// Parses the trailing `<path> <type> <scale>` of an NBT store target.
    fn parse_store_path(&mut self) -> Result<(NbtPath, StoreDataType, FloatValue), SyntaxError> {
        self.end_argument()?;
        let path = self.parse_nbt_path()?;
        self.end_argument()?;
        let data_type = self.expect_keyword::<StoreDataType>()?;
        self.end_argument()?;
        let scale = self.parse_float()?;

        Ok((path, data_type, scale))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_store_target(&mut self) -> Result<StoreTarget, SyntaxError> {
        let pos = self.pos();

        match self.peek_literal() {
            Some("block") => {
                self.bump();
                self.end_argument()?;
                let position = self.parse_vec3()?;
                let (path, data_type, scale) = self.parse_store_path()?;

                Ok(StoreTarget::Block {
                    pos,
                    position,
                    path,
                    data_type,
                    scale,
                })
            }

            Some("bossbar") => {
                self.bump();
                self.end_argument()?;
                let id = self.parse_resource_location(false)?;
                self.end_argument()?;
                let field = self.expect_keyword::<BossbarField>()?;

                Ok(StoreTarget::Bossbar { pos, id, field })
            }

            Some("entity") => {
                self.bump();
                self.end_argument()?;
                let target = self.parse_target_selector()?;
                let (path, data_type, scale) = self.parse_store_path()?;

                Ok(StoreTarget::Entity {
                    pos,
                    target,
                    path,
                    data_type,
                    scale,
                })
            }

            Some("score") => {
                self.bump();
                self.end_argument()?;
                let holder = self.parse_score_holder()?;
                self.end_argument()?;
                let objective = self.expect_raw_word("an objective")?;

                Ok(StoreTarget::Score {
                    pos,
                    holder,
                    objective,
                })
            }

            Some("storage") => {
                self.bump();
                self.end_argument()?;
                let id = self.parse_resource_location(false)?;
                let (path, data_type, scale) = self.parse_store_path()?;

                Ok(StoreTarget::Storage {
                    pos,
                    id,
                    path,
                    data_type,
                    scale,
                })
            }

            _ => Err(self.unexpected("one of `block`, `bossbar`, `entity`, `score`, `storage`")),
        }
    }

    /// Parses `*` or a target selector.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_score_holder(&mut self) -> Result<ScoreHolder, SyntaxError> {
        let pos = self.pos();

        let is_wildcard = matches!(
            (self.peek(), self.peek_nth(1)),
            (Some(star), next) if star.is_control("*")
                && next.map_or(true, |token| token.is_space() || token.is_newline())
        );

        if is_wildcard {
            self.bump();

            Ok(ScoreHolder::Wildcard(pos))
        } else {
            self.parse_target_selector().map(ScoreHolder::Target)
        }
    }

    /// Parses `block <pos>`, `entity <target>` or `storage <id>`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_data_source(&mut self) -> Result<DataSource, SyntaxError> {
        let pos = self.pos();

        match self.peek_literal() {
            Some("block") => {
                self.bump();
                self.end_argument()?;

                Ok(DataSource::Block {
                    pos,
                    position: self.parse_vec3()?,
                })
            }

            Some("entity") => {
                self.bump();
                self.end_argument()?;

                Ok(DataSource::Entity {
                    pos,
                    target: self.parse_target_selector()?,
                })
            }

            Some("storage") => {
                self.bump();
                self.end_argument()?;

                Ok(DataSource::Storage {
                    pos,
                    id: self.parse_resource_location(false)?,
                })
            }

            _ => Err(self.unexpected("one of `block`, `entity`, `storage`")),
        }
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_condition(&mut self) -> Result<Condition, SyntaxError> {
        let pos = self.pos();

        let kind = match self.peek_literal() {
            Some(kind) => kind,
            None => return Err(self.unexpected("a condition")),
        };

        match kind {
            "block" => {
                self.bump();
                self.end_argument()?;
                let position = self.parse_vec3()?;
                self.end_argument()?;
                let block = self.parse_block_predicate(true)?;

                Ok(Condition::Block {
                    pos,
                    position,
                    block,
                })
            }

            "blocks" => {
                self.bump();
                self.end_argument()?;
                let start = self.parse_vec3()?;
                self.end_argument()?;
                let end = self.parse_vec3()?;
                self.end_argument()?;
                let destination = self.parse_vec3()?;
                self.end_argument()?;
                let mode = self.expect_keyword::<BlocksMode>()?;

                Ok(Condition::Blocks {
                    pos,
                    start,
                    end,
                    destination,
                    mode,
                })
            }

            "data" => {
                self.bump();
                self.end_argument()?;
                let source = self.parse_data_source()?;
                self.end_argument()?;
                let path = self.parse_nbt_path()?;

                Ok(Condition::Data { pos, source, path })
            }

            "entity" => {
                self.bump();
                self.end_argument()?;
                let target = self.parse_target_selector()?;

                Ok(Condition::Entity { pos, target })
            }

            "predicate" => {
                self.bump();
                self.end_argument()?;
                let id = self.parse_resource_location(false)?;

                Ok(Condition::Predicate { pos, id })
            }

            "score" => {
                self.bump();
                self.end_argument()?;
                let target = self.parse_score_holder()?;
                self.end_argument()?;
                let objective = self.expect_raw_word("an objective")?;
                self.end_argument()?;
                let test = self.parse_score_test()?;

                Ok(Condition::Score {
                    pos,
                    target,
                    objective,
                    test,
                })
            }

            "dimension" => {
                self.bump();
                self.end_argument()?;
                let id = self.parse_resource_location(false)?;

                Ok(Condition::Dimension { pos, id })
            }

            "loaded" => {
                self.bump();
                self.end_argument()?;
                let position = self.parse_vec3()?;

                Ok(Condition::Loaded { pos, position })
            }

            _ => Err(self.error(SyntaxErrorKind::InvalidEnumValue {
                expected: &[
                    "block",
                    "blocks",
                    "data",
                    "entity",
                    "predicate",
                    "score",
                    "dimension",
                    "loaded",
                ],
                actual: kind.to_owned(),
            })),
        }
    }

    fn parse_score_test(&mut self) -> Result<ScoreTest, SyntaxError> {
        let pos = self.pos();

        if self.at_literal("matches") {
            self.bump();
            self.end_argument()?;
            let range = self.parse_int_range()?;

            return Ok(ScoreTest::Matches { pos, range });
        }

        let op = self.parse_compare_op()?;
        self.end_argument()?;
        let source = self.parse_score_holder()?;
        self.end_argument()?;
        let objective = self.expect_raw_word("an objective")?;

        Ok(ScoreTest::Compare {
            pos,
            op,
            source,
            objective,
        })
    }

    /// `<=` and `>=` arrive as two adjacent control tokens.
    fn parse_compare_op(&mut self) -> Result<CompareOp, SyntaxError> {
        let op = if self.eat_control("<").is_some() {
            if self.eat_control("=").is_some() {
                CompareOp::LessEq
            } else {
                CompareOp::Less
            }
        } else if self.eat_control(">").is_some() {
            if self.eat_control("=").is_some() {
                CompareOp::GreaterEq
            } else {
                CompareOp::Greater
            }
        } else if self.eat_control("=").is_some() {
            CompareOp::Eq
        } else {
            return Err(self.unexpected("`matches` or a comparison operator"));
        };

        Ok(op)
    }
}
