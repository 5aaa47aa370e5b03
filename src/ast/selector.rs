use indexmap::IndexMap;
use serde::Serialize;

use super::{
    impl_has_pos, keyword_enum, BoolValue, FloatRange, FloatValue, IntRange, Literal, NbtCompound,
    QuotedString, ResourceLocation,
};
use crate::position::{HasPos, Position};

/// An entity target: a player name or UUID, or an `@` selector.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum TargetSelector {
    Player(Literal),
    QuotedPlayer(QuotedString),
    Selector(Selector),
}

impl_has_pos!(TargetSelector => |self| match self {
    Self::Player(name) => name.pos,
    Self::QuotedPlayer(name) => name.pos,
    Self::Selector(selector) => selector.pos,
});

keyword_enum! {
    pub enum SelectorVariable {
        AllPlayers => "a",
        NearestPlayer => "p",
        RandomPlayer => "r",
        Executor => "s",
        AllEntities => "e",
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Selector {
    pub pos: Position,
    pub variable: SelectorVariable,
    /// Empty both for `@e` and `@e[]`.
    pub arguments: Vec<SelectorArgument>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SelectorArgument {
    pub pos: Position,
    pub key: SelectorKey,
    /// Set when the value was prefixed with `!`.
    pub inverted: bool,
    pub value: SelectorValue,
}

impl_has_pos!(Selector, SelectorArgument);

keyword_enum! {
    pub enum SelectorKey {
        Tag => "tag",
        Team => "team",
        X => "x",
        Y => "y",
        Z => "z",
        Dx => "dx",
        Dy => "dy",
        Dz => "dz",
        Distance => "distance",
        XRotation => "x_rotation",
        YRotation => "y_rotation",
        Scores => "scores",
        Type => "type",
        Predicate => "predicate",
        Limit => "limit",
        Level => "level",
        Sort => "sort",
        Gamemode => "gamemode",
        Nbt => "nbt",
        Advancements => "advancements",
        Name => "name",
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum SelectorValue {
    Literal(Literal),
    QuotedString(QuotedString),
    Float(FloatValue),
    FloatRange(FloatRange),
    IntRange(IntRange),
    ResourceLocation(ResourceLocation),
    Sort(SortOrder),
    Gamemode(Gamemode),
    Scores(ScoreObject),
    Nbt(NbtCompound),
    Advancements(AdvancementObject),
}

keyword_enum! {
    pub enum SortOrder {
        Nearest => "nearest",
        Furthest => "furthest",
        Random => "random",
        Arbitrary => "arbitrary",
    }
}

keyword_enum! {
    pub enum Gamemode {
        Survival => "survival",
        Creative => "creative",
        Adventure => "adventure",
        Spectator => "spectator",
    }
}

/// `{objective=range,...}`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScoreObject {
    pub pos: Position,
    pub scores: IndexMap<String, IntRange>,
}

/// `{advancement=bool,advancement={criterion=bool,...},...}`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AdvancementObject {
    pub pos: Position,
    pub entries: Vec<AdvancementEntry>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AdvancementEntry {
    pub pos: Position,
    pub id: ResourceLocation,
    pub value: AdvancementValue,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum AdvancementValue {
    Done(BoolValue),
    Criteria {
        pos: Position,
        criteria: IndexMap<String, BoolValue>,
    },
}

impl_has_pos!(ScoreObject, AdvancementObject, AdvancementEntry);
