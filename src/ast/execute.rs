use serde::Serialize;

use super::{
    impl_has_pos, keyword_enum, BlockPredicate, Command, DataSource, FloatValue, IntRange, Literal,
    NbtPath, ResourceLocation, TargetSelector, Vec2, Vec3,
};
use crate::position::{HasPos, Position};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExecuteCommand {
    pub pos: Position,
    /// Never empty; a `run` can only be the last one.
    pub subcommands: Vec<ExecuteSubcommand>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum ExecuteSubcommand {
    Align {
        pos: Position,
        swizzle: Swizzle,
    },

    Anchored {
        pos: Position,
        anchor: Anchor,
    },

    As {
        pos: Position,
        target: TargetSelector,
    },

    At {
        pos: Position,
        target: TargetSelector,
    },

    Facing {
        pos: Position,
        facing: Facing,
    },

    In {
        pos: Position,
        dimension: ResourceLocation,
    },

    On {
        pos: Position,
        relation: Relation,
    },

    Positioned {
        pos: Position,
        position: Positioned,
    },

    Rotated {
        pos: Position,
        rotation: Rotated,
    },

    Store {
        pos: Position,
        mode: StoreMode,
        target: StoreTarget,
    },

    If {
        pos: Position,
        condition: Condition,
    },

    Unless {
        pos: Position,
        condition: Condition,
    },

    Run {
        pos: Position,
        command: Box<Command>,
    },
}

impl ExecuteSubcommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Align { .. } => "align",
            Self::Anchored { .. } => "anchored",
            Self::As { .. } => "as",
            Self::At { .. } => "at",
            Self::Facing { .. } => "facing",
            Self::In { .. } => "in",
            Self::On { .. } => "on",
            Self::Positioned { .. } => "positioned",
            Self::Rotated { .. } => "rotated",
            Self::Store { .. } => "store",
            Self::If { .. } => "if",
            Self::Unless { .. } => "unless",
            Self::Run { .. } => "run",
        }
    }
}

impl_has_pos!(ExecuteSubcommand => |self| match self {
    Self::Align { pos, .. }
    | Self::Anchored { pos, .. }
    | Self::As { pos, .. }
    | Self::At { pos, .. }
    | Self::Facing { pos, .. }
    | Self::In { pos, .. }
    | Self::On { pos, .. }
    | Self::Positioned { pos, .. }
    | Self::Rotated { pos, .. }
    | Self::Store { pos, .. }
    | Self::If { pos, .. }
    | Self::Unless { pos, .. }
    | Self::Run { pos, .. } => *pos,
});

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'x' => Some(Self::X),
            'y' => Some(Self::Y),
            'z' => Some(Self::Z),
            _ => None,
        }
    }
}

/// Two or three distinct axes, in the order written.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Swizzle {
    pub pos: Position,
    pub axes: Vec<Axis>,
}

keyword_enum! {
    pub enum Anchor {
        Eyes => "eyes",
        Feet => "feet",
    }
}

keyword_enum! {
    pub enum Relation {
        Attacker => "attacker",
        Controller => "controller",
        Leasher => "leasher",
        Origin => "origin",
        Owner => "owner",
        Passengers => "passengers",
        Target => "target",
        Vehicle => "vehicle",
    }
}

keyword_enum! {
    pub enum Heightmap {
        WorldSurface => "world_surface",
        MotionBlocking => "motion_blocking",
        MotionBlockingNoLeaves => "motion_blocking_no_leaves",
        OceanFloor => "ocean_floor",
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Facing {
    Entity {
        pos: Position,
        target: TargetSelector,
        anchor: Anchor,
    },

    Position(Vec3),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Positioned {
    As {
        pos: Position,
        target: TargetSelector,
    },

    Over {
        pos: Position,
        heightmap: Heightmap,
    },

    Position(Vec3),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Rotated {
    As {
        pos: Position,
        target: TargetSelector,
    },

    Rotation(Vec2),
}

keyword_enum! {
    pub enum StoreMode {
        Result => "result",
        Success => "success",
    }
}

keyword_enum! {
    pub enum StoreDataType {
        Byte => "byte",
        Short => "short",
        Int => "int",
        Long => "long",
        Float => "float",
        Double => "double",
    }
}

keyword_enum! {
    pub enum BossbarField {
        Max => "max",
        Value => "value",
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum StoreTarget {
    Block {
        pos: Position,
        position: Vec3,
        path: NbtPath,
        data_type: StoreDataType,
        scale: FloatValue,
    },

    Bossbar {
        pos: Position,
        id: ResourceLocation,
        field: BossbarField,
    },

    Entity {
        pos: Position,
        target: TargetSelector,
        path: NbtPath,
        data_type: StoreDataType,
        scale: FloatValue,
    },

    Score {
        pos: Position,
        holder: ScoreHolder,
        objective: Literal,
    },

    Storage {
        pos: Position,
        id: ResourceLocation,
        path: NbtPath,
        data_type: StoreDataType,
        scale: FloatValue,
    },
}

impl_has_pos!(StoreTarget => |self| match self {
    Self::Block { pos, .. }
    | Self::Bossbar { pos, .. }
    | Self::Entity { pos, .. }
    | Self::Score { pos, .. }
    | Self::Storage { pos, .. } => *pos,
});

/// Whoever owns a score: `*` or a target.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum ScoreHolder {
    Wildcard(Position),
    Target(TargetSelector),
}

impl_has_pos!(ScoreHolder => |self| match self {
    Self::Wildcard(pos) => *pos,
    Self::Target(target) => target.pos(),
});

keyword_enum! {
    pub enum BlocksMode {
        All => "all",
        Masked => "masked",
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Condition {
    Block {
        pos: Position,
        position: Vec3,
        block: BlockPredicate,
    },

    Blocks {
        pos: Position,
        start: Vec3,
        end: Vec3,
        destination: Vec3,
        mode: BlocksMode,
    },

    Data {
        pos: Position,
        source: DataSource,
        path: NbtPath,
    },

    Entity {
        pos: Position,
        target: TargetSelector,
    },

    Predicate {
        pos: Position,
        id: ResourceLocation,
    },

    Score {
        pos: Position,
        target: ScoreHolder,
        objective: Literal,
        test: ScoreTest,
    },

    Dimension {
        pos: Position,
        id: ResourceLocation,
    },

    Loaded {
        pos: Position,
        position: Vec3,
    },
}

impl_has_pos!(Condition => |self| match self {
    Self::Block { pos, .. }
    | Self::Blocks { pos, .. }
    | Self::Data { pos, .. }
    | Self::Entity { pos, .. }
    | Self::Predicate { pos, .. }
    | Self::Score { pos, .. }
    | Self::Dimension { pos, .. }
    | Self::Loaded { pos, .. } => *pos,
});

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum ScoreTest {
    Matches {
        pos: Position,
        range: IntRange,
    },

    Compare {
        pos: Position,
        op: CompareOp,
        source: ScoreHolder,
        objective: Literal,
    },
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Less,
    LessEq,
    Eq,
    GreaterEq,
    Greater,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Eq => "=",
            Self::GreaterEq => ">=",
            Self::Greater => ">",
        }
    }
}
