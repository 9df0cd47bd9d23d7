use glam::{IVec2, IVec3};

/// One of the six face directions of a block.
///
/// Axis convention: +X east, +Y north, +Z up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    East = 0,
    West = 1,
    North = 2,
    South = 3,
    Top = 4,
    Bottom = 5,
}

/// All 6 faces, in ±X, ±Y, ±Z order.
pub const ALL_FACES: [Face; 6] = [
    Face::East,
    Face::West,
    Face::North,
    Face::South,
    Face::Top,
    Face::Bottom,
];

/// Lateral and downward faces, used when sky light spills sideways.
pub const SPILL_FACES: [Face; 5] = [
    Face::East,
    Face::West,
    Face::North,
    Face::South,
    Face::Bottom,
];

impl Face {
    /// Unit offset of the neighboring block.
    pub fn offset(self) -> IVec3 {
        match self {
            Face::East => IVec3::new(1, 0, 0),
            Face::West => IVec3::new(-1, 0, 0),
            Face::North => IVec3::new(0, 1, 0),
            Face::South => IVec3::new(0, -1, 0),
            Face::Top => IVec3::new(0, 0, 1),
            Face::Bottom => IVec3::new(0, 0, -1),
        }
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::East => Face::West,
            Face::West => Face::East,
            Face::North => Face::South,
            Face::South => Face::North,
            Face::Top => Face::Bottom,
            Face::Bottom => Face::Top,
        }
    }

    /// Horizontal chunk direction crossed when stepping off this face, if any.
    pub fn cardinal(self) -> Option<Cardinal> {
        match self {
            Face::East => Some(Cardinal::East),
            Face::West => Some(Cardinal::West),
            Face::North => Some(Cardinal::North),
            Face::South => Some(Cardinal::South),
            Face::Top | Face::Bottom => None,
        }
    }
}

/// One of the four horizontal directions linking neighboring chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cardinal {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

pub const ALL_CARDINALS: [Cardinal; 4] = [
    Cardinal::North,
    Cardinal::East,
    Cardinal::South,
    Cardinal::West,
];

impl Cardinal {
    /// Offset in chunk coordinates.
    pub fn offset(self) -> IVec2 {
        match self {
            Cardinal::North => IVec2::new(0, 1),
            Cardinal::East => IVec2::new(1, 0),
            Cardinal::South => IVec2::new(0, -1),
            Cardinal::West => IVec2::new(-1, 0),
        }
    }

    pub fn opposite(self) -> Cardinal {
        match self {
            Cardinal::North => Cardinal::South,
            Cardinal::East => Cardinal::West,
            Cardinal::South => Cardinal::North,
            Cardinal::West => Cardinal::East,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}
