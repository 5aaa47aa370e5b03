use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::Serialize;

use super::{impl_has_pos, BoolValue, FloatValue, IntValue, Literal, QuotedString};
use crate::position::{HasPos, Position};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum NbtValue {
    Compound(NbtCompound),
    List(NbtList),
    Int(IntValue),
    Float(FloatValue),
    Bool(BoolValue),
    String(QuotedString),
    /// An unquoted string.
    Literal(Literal),
}

impl_has_pos!(NbtValue => |self| match self {
    Self::Compound(compound) => compound.pos,
    Self::List(list) => list.pos,
    Self::Int(int) => int.pos,
    Self::Float(float) => float.pos,
    Self::Bool(bool) => bool.pos,
    Self::String(string) => string.pos,
    Self::Literal(literal) => literal.pos,
});

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NbtCompound {
    pub pos: Position,
    pub entries: IndexMap<String, NbtValue>,
}

/// The element type of a `[B;...]`, `[I;...]` or `[L;...]` array.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NbtArrayType {
    Byte,
    Int,
    Long,
}

impl NbtArrayType {
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "B" | "b" => Some(Self::Byte),
            "I" | "i" => Some(Self::Int),
            "L" | "l" => Some(Self::Long),
            _ => None,
        }
    }
}

impl Display for NbtArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Byte => "byte",
            Self::Int => "int",
            Self::Long => "long",
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NbtList {
    pub pos: Position,
    pub array_type: Option<NbtArrayType>,
    pub items: Vec<NbtValue>,
}

impl_has_pos!(NbtCompound, NbtList);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NbtPath {
    pub pos: Position,
    pub segments: Vec<NbtPathSegment>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum NbtPathSegment {
    /// `.`
    Separator(Position),
    Key(Literal),
    QuotedKey(QuotedString),
    /// `{...}` matching the current node.
    Filter(NbtCompound),
    Index { pos: Position, index: NbtIndex },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum NbtIndex {
    /// `[]`
    All,
    Element(IntValue),
    Filter(NbtCompound),
}

impl_has_pos!(NbtPath);

impl_has_pos!(NbtPathSegment => |self| match self {
    Self::Separator(pos) | Self::Index { pos, .. } => *pos,
    Self::Key(key) => key.pos,
    Self::QuotedKey(key) => key.pos,
    Self::Filter(filter) => filter.pos,
});
