//! The syntax tree.
//!
//! Every node records the position of the first token it consumed. Nodes own
//! their children; the tree is built bottom-up by the parser and never mutated
//! afterwards.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::Serialize;

use crate::position::{HasPos, Position};

pub mod execute;
pub mod nbt;
pub mod selector;

pub use self::execute::*;
pub use self::nbt::*;
pub use self::selector::*;
pub use crate::parse::token::{NumberSuffix, Quote};

macro_rules! impl_has_pos {
    ($( $type:ty ),+ $(,)?) => {
        $(
            impl HasPos for $type {
                fn pos(&self) -> Position {
                    self.pos
                }
            }
        )+
    };

    ($type:ty => |$s:ident| $body:expr) => {
        impl HasPos for $type {
            fn pos(&$s) -> Position {
                $body
            }
        }
    };
}

pub(crate) use impl_has_pos;

/// An enumeration spelled as a fixed set of literal keywords.
pub trait Keyword: Sized + Copy + PartialEq + 'static {
    const KEYWORDS: &'static [&'static str];
    const VALUES: &'static [Self];

    fn from_keyword(s: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .position(|&kw| kw == s)
            .and_then(|idx| Self::VALUES.get(idx).copied())
    }

    fn as_str(&self) -> &'static str {
        Self::VALUES
            .iter()
            .position(|value| value == self)
            .and_then(|idx| Self::KEYWORDS.get(idx).copied())
            .unwrap_or_default()
    }
}

macro_rules! keyword_enum {
    ($( #[$meta:meta] )* $vis:vis enum $name:ident { $( $variant:ident => $kw:literal ),+ $(,)? }) => {
        $( #[$meta] )*
        #[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $variant, )+
        }

        impl $crate::ast::Keyword for $name {
            const KEYWORDS: &'static [&'static str] = &[$( $kw, )+];
            const VALUES: &'static [Self] = &[$( Self::$variant, )+];
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::ast::Keyword::as_str(self))
            }
        }
    };
}

pub(crate) use keyword_enum;

/// A top-level item of a function file.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Node {
    Command(Command),
    /// A node injected by an [`Extension`](crate::parse::Extension).
    Extension(ExtensionNode),
}

impl_has_pos!(Node => |self| match self {
    Self::Command(command) => command.pos(),
    Self::Extension(node) => node.pos,
});

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExtensionNode {
    pub pos: Position,
    pub kind: String,
    pub raw: String,
    pub children: Vec<Node>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Command {
    Unknown(UnknownCommand),
    Execute(ExecuteCommand),
    Function(FunctionCommand),
    Schedule(ScheduleCommand),
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Self::Unknown(command) => &command.name,
            Self::Execute(_) => "execute",
            Self::Function(_) => "function",
            Self::Schedule(_) => "schedule",
        }
    }
}

impl_has_pos!(Command => |self| match self {
    Self::Unknown(command) => command.pos,
    Self::Execute(command) => command.pos,
    Self::Function(command) => command.pos,
    Self::Schedule(command) => command.pos(),
});

/// A command without a registered grammar, kept verbatim.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UnknownCommand {
    pub pos: Position,
    pub name: String,
    /// Everything after the name and its separating space, up to the end of the line.
    pub raw: String,
    pub args: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FunctionCommand {
    pub pos: Position,
    pub id: ResourceLocation,
    pub arguments: Option<FunctionArguments>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum FunctionArguments {
    Compound(NbtCompound),
    With {
        pos: Position,
        source: DataSource,
        path: Option<NbtPath>,
    },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum ScheduleCommand {
    Function {
        pos: Position,
        id: ResourceLocation,
        time: ScheduleTime,
        mode: Option<ScheduleMode>,
    },

    Clear {
        pos: Position,
        id: ResourceLocation,
    },
}

impl_has_pos!(ScheduleCommand => |self| match self {
    Self::Function { pos, .. } | Self::Clear { pos, .. } => *pos,
});

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScheduleTime {
    pub pos: Position,
    pub value: Number,
    pub unit: TimeUnit,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Ticks,
    Seconds,
    Days,
}

keyword_enum! {
    pub enum ScheduleMode {
        Append => "append",
        Replace => "replace",
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub pos: Position,
    pub value: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QuotedString {
    pub pos: Position,
    pub quote: Quote,
    pub value: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IntValue {
    pub pos: Position,
    pub value: i64,
    pub suffix: Option<NumberSuffix>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FloatValue {
    pub pos: Position,
    pub value: f64,
    pub suffix: Option<NumberSuffix>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BoolValue {
    pub pos: Position,
    pub value: bool,
}

impl_has_pos!(Literal, QuotedString, IntValue, FloatValue, BoolValue);

/// A numeral that may be written either way, e.g. a coordinate offset.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Number {
    Int(IntValue),
    Float(FloatValue),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(int) => int.value as f64,
            Self::Float(float) => float.value,
        }
    }
}

impl_has_pos!(Number => |self| match self {
    Self::Int(int) => int.pos,
    Self::Float(float) => float.pos,
});

/// A namespaced identifier, `[#][namespace:]path`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub pos: Position,
    pub is_tag: bool,
    /// Empty when the namespace was omitted.
    pub namespace: String,
    pub path: String,
}

impl_has_pos!(ResourceLocation);

impl Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_tag {
            write!(f, "#")?;
        }

        if !self.namespace.is_empty() {
            write!(f, "{}:", self.namespace)?;
        }

        write!(f, "{}", self.path)
    }
}

/// A range with at least one bound.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Range<T> {
    pub pos: Position,
    pub min: Option<T>,
    pub max: Option<T>,
}

/// A single value or a `..` range; a bare value is not wrapped.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum RangeOrValue<T> {
    Value(T),
    Range(Range<T>),
}

pub type IntRange = RangeOrValue<IntValue>;
pub type FloatRange = RangeOrValue<FloatValue>;

impl<T: HasPos> HasPos for RangeOrValue<T> {
    fn pos(&self) -> Position {
        match self {
            Self::Value(value) => value.pos(),
            Self::Range(range) => range.pos,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateKind {
    Absolute,
    /// `~`
    Relative,
    /// `^`
    Local,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub pos: Position,
    pub kind: CoordinateKind,
    pub offset: Option<Number>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Vec2 {
    pub pos: Position,
    pub x: Coordinate,
    pub y: Coordinate,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Vec3 {
    pub pos: Position,
    pub x: Coordinate,
    pub y: Coordinate,
    pub z: Coordinate,
}

impl_has_pos!(Coordinate, Vec2, Vec3);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum BlockStateValue {
    Literal(Literal),
    Bool(BoolValue),
    Int(IntValue),
}

/// `[key=value,...]` block properties, in source order.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BlockState {
    pub pos: Position,
    pub properties: IndexMap<String, BlockStateValue>,
}

/// A block id optionally qualified by its state and block entity data.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BlockPredicate {
    pub pos: Position,
    pub id: ResourceLocation,
    pub state: Option<BlockState>,
    pub nbt: Option<NbtCompound>,
}

impl_has_pos!(BlockState, BlockPredicate);

/// Where NBT data is read from or written to.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum DataSource {
    Block { pos: Position, position: Vec3 },
    Entity { pos: Position, target: TargetSelector },
    Storage { pos: Position, id: ResourceLocation },
}

impl_has_pos!(DataSource => |self| match self {
    Self::Block { pos, .. } | Self::Entity { pos, .. } | Self::Storage { pos, .. } => *pos,
});
