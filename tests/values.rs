mod common;

use paste::paste;
use pretty_assertions::assert_eq;

use mcfn::ast::{
    BlockStateValue, BoolValue, Coordinate, CoordinateKind, FloatValue, IntValue, Literal, Number,
    Range, RangeOrValue, ResourceLocation, Vec2, Vec3,
};
use mcfn::errors::SyntaxErrorKind;
use mcfn::parse::{Parser, ParserConfig, TokenKind};

use self::common::{at, normalized, parse_value};

fn int(col: usize, value: i64) -> IntValue {
    IntValue {
        pos: at(col),
        value,
        suffix: None,
    }
}

fn float(col: usize, value: f64) -> FloatValue {
    FloatValue {
        pos: at(col),
        value,
        suffix: None,
    }
}

fn coordinate(col: usize, kind: CoordinateKind, offset: Option<Number>) -> Coordinate {
    Coordinate {
        pos: at(col),
        kind,
        offset,
    }
}

macro_rules! resource_location_tests {
    { $( $name:ident: $src:expr ),+ $(,)? } => {
        $(
            paste! {
                #[test]
                fn [< resource_location_ $name >]() {
                    let src: &str = $src;
                    let id = parse_value(src, |p| p.parse_resource_location(true)).unwrap();

                    assert_eq!(id.to_string(), src);
                }
            }
        )+
    };
}

resource_location_tests! {
    bare: "stone",
    namespaced: "minecraft:stone",
    tag: "#minecraft:logs",
    nested_path: "demo:player/tick",
    dashes_and_dots: "my-pack:func.v2",
    leading_digit: "demo:0_lights",
}

macro_rules! invalid_resource_location_tests {
    { $( $name:ident: $src:expr ),+ $(,)? } => {
        $(
            paste! {
                #[test]
                fn [< invalid_resource_location_ $name >]() {
                    let src: &str = $src;
                    let e = parse_value(src, |p| p.parse_resource_location(false)).unwrap_err();

                    assert_eq!(e.kind, SyntaxErrorKind::InvalidResourceLocation(src.to_owned()));
                    assert_eq!(e.pos, at(0));
                }
            }
        )+
    };
}

invalid_resource_location_tests! {
    uppercase: "Foo:bar",
    two_colons: "a:b:c",
    empty_namespace: ":stone",
    empty_path: "stone:",
}

#[test]
fn test_resource_location_parts() {
    assert_eq!(
        parse_value("minecraft:stone", |p| p.parse_resource_location(false)),
        Ok(ResourceLocation {
            pos: at(0),
            is_tag: false,
            namespace: "minecraft".into(),
            path: "stone".into(),
        })
    );

    assert_eq!(
        parse_value("stone", |p| p.parse_resource_location(false)),
        Ok(ResourceLocation {
            pos: at(0),
            is_tag: false,
            namespace: "".into(),
            path: "stone".into(),
        })
    );
}

#[test]
fn test_resource_location_tag_not_allowed() {
    let e = parse_value("#minecraft:logs", |p| p.parse_resource_location(false)).unwrap_err();

    assert_eq!(e.kind, SyntaxErrorKind::TagNotAllowed);
    assert_eq!(e.context[0].construct, "a resource location");
}

#[test]
fn test_resource_location_stops_at_space() {
    let tokens = normalized("foo:bar baz");
    let mut parser = Parser::new(&tokens, ParserConfig::default());
    let id = parser.parse_resource_location(false).unwrap();

    assert_eq!(id.path, "bar");
    assert!(parser.at_kind(TokenKind::Space));
}

#[test]
fn test_int_range_forms() {
    assert_eq!(
        parse_value("5", |p| p.parse_int_range()),
        Ok(RangeOrValue::Value(int(0, 5)))
    );

    assert_eq!(
        parse_value("5..", |p| p.parse_int_range()),
        Ok(RangeOrValue::Range(Range {
            pos: at(0),
            min: Some(int(0, 5)),
            max: None,
        }))
    );

    assert_eq!(
        parse_value("..5", |p| p.parse_int_range()),
        Ok(RangeOrValue::Range(Range {
            pos: at(0),
            min: None,
            max: Some(int(2, 5)),
        }))
    );

    assert_eq!(
        parse_value("1..5", |p| p.parse_int_range()),
        Ok(RangeOrValue::Range(Range {
            pos: at(0),
            min: Some(int(0, 1)),
            max: Some(int(3, 5)),
        }))
    );

    assert_eq!(
        parse_value("-5..-1", |p| p.parse_int_range()),
        Ok(RangeOrValue::Range(Range {
            pos: at(0),
            min: Some(int(0, -5)),
            max: Some(int(4, -1)),
        }))
    );
}

#[test]
fn test_empty_range() {
    for src in ["..", ".. 5"] {
        let e = parse_value(src, |p| p.parse_int_range()).unwrap_err();

        assert_eq!(e.kind, SyntaxErrorKind::EmptyRange, "{src:?}");
        assert_eq!(e.pos, at(0));
        assert_eq!(e.context[0].construct, "an integer range");
    }
}

#[test]
fn test_int_range_rejects_floats() {
    let e = parse_value("1.5", |p| p.parse_int_range()).unwrap_err();

    assert_eq!(
        e.kind,
        SyntaxErrorKind::UnexpectedToken {
            expected: "an integer".into()
        }
    );
    assert_eq!(e.found.as_deref(), Some("float:'1.5'"));
}

#[test]
fn test_int_out_of_range() {
    let e = parse_value("2147483648", |p| p.parse_int_range()).unwrap_err();

    assert_eq!(e.kind, SyntaxErrorKind::IntOutOfRange(2_147_483_648));
    assert!(parse_value("-2147483648", |p| p.parse_int_range()).is_ok());
}

#[test]
fn test_coordinate_out_of_range() {
    let e = parse_value("0 2147483648 0", |p| p.parse_vec3()).unwrap_err();

    assert_eq!(e.kind, SyntaxErrorKind::IntOutOfRange(2_147_483_648));
    assert_eq!(e.pos, at(2));
    assert!(parse_value("0 -2147483648 0", |p| p.parse_vec3()).is_ok());
    assert!(parse_value("0 2147483648.5 0", |p| p.parse_vec3()).is_ok());
}

#[test]
fn test_float_range() {
    assert_eq!(
        parse_value("0.5..2", |p| p.parse_float_range()),
        Ok(RangeOrValue::Range(Range {
            pos: at(0),
            min: Some(float(0, 0.5)),
            max: Some(float(5, 2.0)),
        }))
    );

    assert_eq!(
        parse_value("..-1.5", |p| p.parse_float_range()),
        Ok(RangeOrValue::Range(Range {
            pos: at(0),
            min: None,
            max: Some(float(2, -1.5)),
        }))
    );
}

#[test]
fn test_relative_vector() {
    assert_eq!(
        parse_value("~ ~1 ~-2", |p| p.parse_vec3()),
        Ok(Vec3 {
            pos: at(0),
            x: coordinate(0, CoordinateKind::Relative, None),
            y: coordinate(2, CoordinateKind::Relative, Some(Number::Int(int(3, 1)))),
            z: coordinate(5, CoordinateKind::Relative, Some(Number::Int(int(6, -2)))),
        })
    );
}

#[test]
fn test_absolute_vector() {
    assert_eq!(
        parse_value("0.5 64 -3.25", |p| p.parse_vec3()),
        Ok(Vec3 {
            pos: at(0),
            x: coordinate(0, CoordinateKind::Absolute, Some(Number::Float(float(0, 0.5)))),
            y: coordinate(4, CoordinateKind::Absolute, Some(Number::Int(int(4, 64)))),
            z: coordinate(7, CoordinateKind::Absolute, Some(Number::Float(float(7, -3.25)))),
        })
    );
}

#[test]
fn test_local_vector() {
    let vec = parse_value("^ ^ ^0.5", |p| p.parse_vec3()).unwrap();

    assert_eq!(vec.x.kind, CoordinateKind::Local);
    assert_eq!(vec.y.kind, CoordinateKind::Local);
    assert_eq!(vec.z.offset, Some(Number::Float(float(5, 0.5))));
}

#[test]
fn test_mixed_local_coordinates() {
    let e = parse_value("^1 ^2 ~3", |p| p.parse_vec3()).unwrap_err();
    assert_eq!(e.kind, SyntaxErrorKind::MixedLocalCoordinates);
    assert_eq!(e.pos, at(6));

    let e = parse_value("~ ^ ^", |p| p.parse_vec3()).unwrap_err();
    assert_eq!(e.kind, SyntaxErrorKind::MixedLocalCoordinates);
    assert_eq!(e.pos, at(2));
}

#[test]
fn test_missing_coordinate() {
    let e = parse_value("1 2", |p| p.parse_vec3()).unwrap_err();

    assert_eq!(e.kind, SyntaxErrorKind::MissingCoordinate);
    assert_eq!(e.pos, at(3));
    assert_eq!(e.context[0].construct, "a 3D vector");
}

#[test]
fn test_coordinates_need_separators() {
    let e = parse_value("~1~2 ~3", |p| p.parse_vec3()).unwrap_err();

    assert_eq!(e.kind, SyntaxErrorKind::ExpectedEndOfArgument);
    assert_eq!(e.pos, at(2));
    assert_eq!(e.found.as_deref(), Some("control:'~'"));
}

#[test]
fn test_rotation() {
    assert_eq!(
        parse_value("~ 90", |p| p.parse_vec2(false)),
        Ok(Vec2 {
            pos: at(0),
            x: coordinate(0, CoordinateKind::Relative, None),
            y: coordinate(2, CoordinateKind::Absolute, Some(Number::Int(int(2, 90)))),
        })
    );

    let e = parse_value("^ ^", |p| p.parse_vec2(false)).unwrap_err();
    assert_eq!(e.kind, SyntaxErrorKind::LocalCoordinatesNotAllowed);
    assert_eq!(e.pos, at(0));

    assert!(parse_value("^ ^", |p| p.parse_vec2(true)).is_ok());
}

#[test]
fn test_block_state() {
    let state = parse_value("[axis=y,waterlogged=true,level=3]", |p| p.parse_block_state()).unwrap();

    assert_eq!(
        state.properties.keys().collect::<Vec<_>>(),
        ["axis", "waterlogged", "level"]
    );

    assert_eq!(
        state.properties["axis"],
        BlockStateValue::Literal(Literal {
            pos: at(6),
            value: "y".into(),
        })
    );

    assert_eq!(
        state.properties["waterlogged"],
        BlockStateValue::Bool(BoolValue {
            pos: at(20),
            value: true,
        })
    );

    assert_eq!(state.properties["level"], BlockStateValue::Int(int(31, 3)));
}

#[test]
fn test_empty_block_state() {
    let state = parse_value("[]", |p| p.parse_block_state()).unwrap();

    assert!(state.properties.is_empty());
}

#[test]
fn test_block_state_missing_value() {
    let e = parse_value("[axis=]", |p| p.parse_block_state()).unwrap_err();

    assert_eq!(
        e.kind,
        SyntaxErrorKind::UnexpectedToken {
            expected: "a block state value".into()
        }
    );
    assert_eq!(e.pos, at(6));
}

#[test]
fn test_block_predicate() {
    let block = parse_value("#minecraft:logs[axis=y]{Lock:\"x\"}", |p| {
        p.parse_block_predicate(true)
    })
    .unwrap();

    assert!(block.id.is_tag);
    assert_eq!(block.id.to_string(), "#minecraft:logs");
    assert_eq!(block.state.map(|state| state.properties.len()), Some(1));
    assert!(block.nbt.unwrap().entries.contains_key("Lock"));
}
