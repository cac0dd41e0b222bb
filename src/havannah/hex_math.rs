use std::fmt::{self, Display};

/// The six neighbor directions on a hexagonal grid in cubic coordinates.
pub const NEIGHBOR_OFFSETS: [(i32, i32, i32); 6] = [
    (1, -1, 0),
    (1, 0, -1),
    (0, 1, -1),
    (-1, 1, 0),
    (-1, 0, 1),
    (0, -1, 1),
];

/// Position on a hexagonal board, in cubic coordinates.
///
/// The invariant x + y + z == 0 holds for every constructed value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct CubicCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubicCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        assert_eq!(x + y + z, 0, "invalid cubic coordinate ({}, {}, {})", x, y, z);
        Self { x, y, z }
    }

    pub fn from_axial(q: i32, r: i32) -> Self {
        Self::new(q, r, -q - r)
    }

    pub fn to_axial(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn translated(&self, offset: (i32, i32, i32)) -> Self {
        Self::new(self.x + offset.0, self.y + offset.1, self.z + offset.2)
    }

    /// The six neighbor coordinates, in [`NEIGHBOR_OFFSETS`] order.
    /// Board bounds are not checked here.
    pub fn neighbors(&self) -> [CubicCoord; 6] {
        NEIGHBOR_OFFSETS.map(|offset| self.translated(offset))
    }

    pub fn is_adjacent(&self, other: &CubicCoord) -> bool {
        NEIGHBOR_OFFSETS
            .iter()
            .any(|&offset| self.translated(offset) == *other)
    }

    pub fn max_component(&self) -> i32 {
        self.x.max(self.y).max(self.z)
    }

    pub fn min_component(&self) -> i32 {
        self.x.min(self.y).min(self.z)
    }
}

impl From<(i32, i32, i32)> for CubicCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl Display for CubicCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
