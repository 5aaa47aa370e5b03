mod common;

use paste::paste;
use pretty_assertions::assert_eq;

use mcfn::ast::{
    Anchor, Axis, BlocksMode, BossbarField, Command, CompareOp, Condition, DataSource,
    ExecuteCommand, ExecuteSubcommand, Facing, Heightmap, Positioned, RangeOrValue, Relation,
    Rotated, ScoreHolder, ScoreTest, Selector, SelectorVariable, StoreDataType, StoreMode,
    StoreTarget, TargetSelector, UnknownCommand,
};
use mcfn::errors::SyntaxErrorKind;

use self::common::{at, parse_err, single_command};

fn execute(src: &str) -> ExecuteCommand {
    match single_command(src) {
        Command::Execute(command) => command,
        command => panic!("{src:?}: expected execute, got {command:#?}"),
    }
}

/// Parses an execute command with exactly one sub-command.
fn subcommand(src: &str) -> ExecuteSubcommand {
    let mut command = execute(src);
    assert_eq!(command.subcommands.len(), 1, "{src:?}");

    command.subcommands.remove(0)
}

fn condition(src: &str) -> Condition {
    match subcommand(src) {
        ExecuteSubcommand::If { condition, .. } | ExecuteSubcommand::Unless { condition, .. } => {
            condition
        }

        subcommand => panic!("{src:?}: expected a condition, got {subcommand:#?}"),
    }
}

fn bare_selector(col: usize, variable: SelectorVariable) -> TargetSelector {
    TargetSelector::Selector(Selector {
        pos: at(col),
        variable,
        arguments: vec![],
    })
}

#[test]
fn test_as_at_run() {
    assert_eq!(
        execute("execute as @a at @s run say hi\n"),
        ExecuteCommand {
            pos: at(0),
            subcommands: vec![
                ExecuteSubcommand::As {
                    pos: at(8),
                    target: bare_selector(11, SelectorVariable::AllPlayers),
                },
                ExecuteSubcommand::At {
                    pos: at(14),
                    target: bare_selector(17, SelectorVariable::Executor),
                },
                ExecuteSubcommand::Run {
                    pos: at(20),
                    command: Box::new(Command::Unknown(UnknownCommand {
                        pos: at(24),
                        name: "say".into(),
                        raw: "hi".into(),
                        args: vec!["hi".into()],
                    })),
                },
            ],
        }
    );
}

#[test]
fn test_without_run() {
    let command = execute("execute as @a at @s");

    assert_eq!(command.subcommands.len(), 2);
    assert_eq!(command.subcommands[1].name(), "at");
}

#[test]
fn test_trailing_space() {
    assert_eq!(execute("execute as @a \n").subcommands.len(), 1);
}

#[test]
fn test_nested_run() {
    let command = execute("execute run execute run say hi");

    match &command.subcommands[..] {
        [ExecuteSubcommand::Run { command, .. }] => match command.as_ref() {
            Command::Execute(inner) => {
                assert!(matches!(
                    &inner.subcommands[..],
                    [ExecuteSubcommand::Run { command, .. }] if command.name() == "say"
                ));
            }

            command => panic!("unexpected command {command:#?}"),
        },

        subcommands => panic!("unexpected sub-commands {subcommands:#?}"),
    }
}

#[test]
fn test_run_stops_the_chain() {
    let command = execute("execute run say as @a");

    match &command.subcommands[..] {
        [ExecuteSubcommand::Run { command, .. }] => match command.as_ref() {
            Command::Unknown(say) => assert_eq!(say.raw, "as @a"),
            command => panic!("unexpected command {command:#?}"),
        },

        subcommands => panic!("unexpected sub-commands {subcommands:#?}"),
    }
}

#[test]
fn test_align() {
    assert!(matches!(
        subcommand("execute align xz"),
        ExecuteSubcommand::Align { swizzle, .. } if swizzle.axes == [Axis::X, Axis::Z]
    ));

    assert!(matches!(
        subcommand("execute align zyx"),
        ExecuteSubcommand::Align { swizzle, .. } if swizzle.axes == [Axis::Z, Axis::Y, Axis::X]
    ));

    for swizzle in ["xx", "x", "xw", "xyzx"] {
        let e = parse_err(&format!("execute align {swizzle}"));

        assert_eq!(e.kind, SyntaxErrorKind::InvalidSwizzle(swizzle.into()));
        assert_eq!(e.pos, at(14));
    }
}

#[test]
fn test_anchored() {
    assert_eq!(
        subcommand("execute anchored eyes"),
        ExecuteSubcommand::Anchored {
            pos: at(8),
            anchor: Anchor::Eyes,
        }
    );
}

#[test]
fn test_facing() {
    assert!(matches!(
        subcommand("execute facing 0 64 0"),
        ExecuteSubcommand::Facing {
            facing: Facing::Position(_),
            ..
        }
    ));

    assert!(matches!(
        subcommand("execute facing entity @p feet"),
        ExecuteSubcommand::Facing {
            facing: Facing::Entity {
                anchor: Anchor::Feet,
                ..
            },
            ..
        }
    ));
}

#[test]
fn test_in() {
    match subcommand("execute in minecraft:the_nether") {
        ExecuteSubcommand::In { dimension, .. } => {
            assert_eq!(dimension.to_string(), "minecraft:the_nether")
        }

        subcommand => panic!("unexpected sub-command {subcommand:#?}"),
    }
}

#[test]
fn test_on() {
    assert_eq!(
        subcommand("execute on passengers"),
        ExecuteSubcommand::On {
            pos: at(8),
            relation: Relation::Passengers,
        }
    );

    let e = parse_err("execute on friends");
    assert!(matches!(
        e.kind,
        SyntaxErrorKind::InvalidEnumValue { ref actual, .. } if actual == "friends"
    ));
}

#[test]
fn test_positioned() {
    assert!(matches!(
        subcommand("execute positioned ~ ~1 ~"),
        ExecuteSubcommand::Positioned {
            position: Positioned::Position(_),
            ..
        }
    ));

    assert!(matches!(
        subcommand("execute positioned as @s"),
        ExecuteSubcommand::Positioned {
            position: Positioned::As { .. },
            ..
        }
    ));

    assert!(matches!(
        subcommand("execute positioned over world_surface"),
        ExecuteSubcommand::Positioned {
            position: Positioned::Over {
                heightmap: Heightmap::WorldSurface,
                ..
            },
            ..
        }
    ));
}

#[test]
fn test_rotated() {
    assert!(matches!(
        subcommand("execute rotated ~ 0"),
        ExecuteSubcommand::Rotated {
            rotation: Rotated::Rotation(_),
            ..
        }
    ));

    assert!(matches!(
        subcommand("execute rotated as @p"),
        ExecuteSubcommand::Rotated {
            rotation: Rotated::As { .. },
            ..
        }
    ));

    let e = parse_err("execute rotated ^ ^");
    assert_eq!(e.kind, SyntaxErrorKind::LocalCoordinatesNotAllowed);
}

#[test]
fn test_store_score() {
    match subcommand("execute store result score * total") {
        ExecuteSubcommand::Store {
            mode: StoreMode::Result,
            target:
                StoreTarget::Score {
                    holder, objective, ..
                },
            ..
        } => {
            assert_eq!(holder, ScoreHolder::Wildcard(at(27)));
            assert_eq!(objective.value, "total");
        }

        subcommand => panic!("unexpected sub-command {subcommand:#?}"),
    }
}

#[test]
fn test_store_storage() {
    let command = execute("execute store success storage demo:state out int 1 run say hi");

    match &command.subcommands[0] {
        ExecuteSubcommand::Store {
            mode: StoreMode::Success,
            target:
                StoreTarget::Storage {
                    id,
                    path,
                    data_type,
                    scale,
                    ..
                },
            ..
        } => {
            assert_eq!(id.to_string(), "demo:state");
            assert_eq!(path.segments.len(), 1);
            assert_eq!(*data_type, StoreDataType::Int);
            assert_eq!(scale.value, 1.0);
        }

        subcommand => panic!("unexpected sub-command {subcommand:#?}"),
    }

    assert_eq!(command.subcommands[1].name(), "run");
}

#[test]
fn test_store_block_entity_bossbar() {
    assert!(matches!(
        subcommand("execute store result block ~ ~ ~ Items[0].Count byte 0.5"),
        ExecuteSubcommand::Store {
            target: StoreTarget::Block {
                data_type: StoreDataType::Byte,
                ..
            },
            ..
        }
    ));

    assert!(matches!(
        subcommand("execute store result entity @s Health float 1"),
        ExecuteSubcommand::Store {
            target: StoreTarget::Entity {
                data_type: StoreDataType::Float,
                ..
            },
            ..
        }
    ));

    assert!(matches!(
        subcommand("execute store result bossbar demo:timer value"),
        ExecuteSubcommand::Store {
            target: StoreTarget::Bossbar {
                field: BossbarField::Value,
                ..
            },
            ..
        }
    ));
}

#[test]
fn test_score_matches() {
    match condition("execute if score @s points matches 1..") {
        Condition::Score {
            target,
            objective,
            test: ScoreTest::Matches { range, .. },
            ..
        } => {
            assert_eq!(
                target,
                ScoreHolder::Target(bare_selector(17, SelectorVariable::Executor))
            );
            assert_eq!(objective.value, "points");
            assert!(matches!(range, RangeOrValue::Range(ref r) if r.max.is_none()));
        }

        condition => panic!("unexpected condition {condition:#?}"),
    }
}

macro_rules! compare_tests {
    { $( $name:ident: $op:literal => $expected:expr ),+ $(,)? } => {
        $(
            paste! {
                #[test]
                fn [< score_compare_ $name >]() {
                    let src = concat!("execute if score @s a ", $op, " @p b");

                    match condition(src) {
                        Condition::Score {
                            test: ScoreTest::Compare { op, objective, .. },
                            ..
                        } => {
                            assert_eq!(op, $expected);
                            assert_eq!(op.as_str(), $op);
                            assert_eq!(objective.value, "b");
                        }

                        condition => panic!("unexpected condition {condition:#?}"),
                    }
                }
            }
        )+
    };
}

compare_tests! {
    less: "<" => CompareOp::Less,
    less_eq: "<=" => CompareOp::LessEq,
    eq: "=" => CompareOp::Eq,
    greater_eq: ">=" => CompareOp::GreaterEq,
    greater: ">" => CompareOp::Greater,
}

#[test]
fn test_block_conditions() {
    match condition("execute if block ~ ~-1 ~ #minecraft:logs[axis=y]") {
        Condition::Block { block, .. } => {
            assert!(block.id.is_tag);
            assert!(block.state.is_some());
        }

        condition => panic!("unexpected condition {condition:#?}"),
    }

    assert!(matches!(
        condition("execute unless blocks 0 0 0 10 10 10 ~ ~ ~ masked"),
        Condition::Blocks {
            mode: BlocksMode::Masked,
            ..
        }
    ));

    assert!(matches!(
        condition("execute if loaded ~ ~ ~"),
        Condition::Loaded { .. }
    ));
}

#[test]
fn test_data_conditions() {
    match condition("execute if data storage demo:state flags.ready") {
        Condition::Data {
            source: DataSource::Storage { id, .. },
            path,
            ..
        } => {
            assert_eq!(id.to_string(), "demo:state");
            assert_eq!(path.segments.len(), 3);
        }

        condition => panic!("unexpected condition {condition:#?}"),
    }

    assert!(matches!(
        condition("execute unless data entity @s Inventory[{Slot:0b}]"),
        Condition::Data {
            source: DataSource::Entity { .. },
            ..
        }
    ));

    assert!(matches!(
        condition("execute if data block ~ ~ ~ Items"),
        Condition::Data {
            source: DataSource::Block { .. },
            ..
        }
    ));
}

#[test]
fn test_other_conditions() {
    assert!(matches!(
        condition("execute if entity @e[type=minecraft:cow]"),
        Condition::Entity { .. }
    ));

    assert!(matches!(
        condition("execute if predicate demo:is_day"),
        Condition::Predicate { ref id, .. } if id.path == "is_day"
    ));

    assert!(matches!(
        condition("execute if dimension minecraft:overworld"),
        Condition::Dimension { .. }
    ));

    let e = parse_err("execute if frob");
    assert!(matches!(
        e.kind,
        SyntaxErrorKind::InvalidEnumValue { ref actual, .. } if actual == "frob"
    ));
}

#[test]
fn test_missing_subcommand() {
    let e = parse_err("execute");

    assert_eq!(
        e.kind,
        SyntaxErrorKind::UnexpectedToken {
            expected: "an execute sub-command".into()
        }
    );
}

#[test]
fn test_unknown_subcommand() {
    let e = parse_err("execute frob @s");
    assert_eq!(e.kind, SyntaxErrorKind::UnknownSubcommand("frob".into()));
    assert_eq!(e.pos, at(8));

    let e = parse_err("execute as @a trailing");
    assert_eq!(e.kind, SyntaxErrorKind::UnknownSubcommand("trailing".into()));
}

#[test]
fn test_argument_must_end() {
    let e = parse_err("execute as @a[tag=x]y");

    assert_eq!(e.kind, SyntaxErrorKind::ExpectedEndOfArgument);
    assert_eq!(e.pos, at(20));
}

#[test]
fn test_run_without_command() {
    let e = parse_err("execute as @a run");

    assert_eq!(
        e.kind,
        SyntaxErrorKind::UnexpectedToken {
            expected: "a command name".into()
        }
    );
    assert_eq!(e.context.last().map(|frame| frame.pos), Some(at(0)));
}

#[test]
fn test_error_context() {
    let e = parse_err("execute as @e[frobnicate=1]");
    let trail: Vec<_> = e
        .context
        .iter()
        .map(|frame| (&*frame.construct, frame.pos))
        .collect();

    assert_eq!(
        trail,
        [
            ("a selector argument", at(14)),
            ("a target selector", at(11)),
            ("the `as` sub-command", at(8)),
            ("the `execute` command", at(0)),
        ]
    );
}
