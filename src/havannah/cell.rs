use crate::game::common::GameColor;
use crate::havannah::hex_math::CubicCoord;

/// One of the six board edges, named by the coordinate axis that is extremal
/// along it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EdgeLabel {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

/// Set of [`EdgeLabel`]s touched by a connected group, as a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct EdgeSet(u8);

impl EdgeSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, label: EdgeLabel) {
        self.0 |= 1 << label as u8;
    }

    pub fn contains(&self, label: EdgeLabel) -> bool {
        self.0 & (1 << label as u8) != 0
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn merged(&self, other: EdgeSet) -> EdgeSet {
        EdgeSet(self.0 | other.0)
    }
}

/// A placed stone in the board's union find arena.
///
/// `num_corners` and `edges` are win progress counters, authoritative only
/// on a group's root cell. Child cells keep stale values after a merge,
/// which are never read again.
#[derive(Clone, Copy, Debug)]
pub struct HexCell {
    pub color: GameColor,

    /// Arena index of the parent cell, self-referencing on a root.
    pub parent: usize,

    /// Number of cells in the group, valid on the root only.
    pub size: u32,

    /// Number of board corners the group occupies, valid on the root only.
    pub num_corners: u8,

    /// Board edges the group touches, valid on the root only.
    pub edges: EdgeSet,
}

impl HexCell {
    pub(crate) fn new(color: GameColor, coord: CubicCoord, index: usize, board_size: i32) -> Self {
        let mut num_corners = 0;
        let mut edges = EdgeSet::new();
        if is_corner(coord, board_size) {
            num_corners = 1;
        } else if is_edge(coord, board_size) {
            edges.insert(edge_label(coord));
        }
        Self {
            color,
            parent: index,
            size: 1,
            num_corners,
            edges,
        }
    }
}

/// A corner cell is extremal along two axes at once.
pub(crate) fn is_corner(coord: CubicCoord, board_size: i32) -> bool {
    let s = board_size - 1;
    coord.max_component() == s && coord.min_component() == -s
}

/// An edge cell is extremal along exactly one axis. Corners do not count as
/// edge cells.
pub(crate) fn is_edge(coord: CubicCoord, board_size: i32) -> bool {
    let s = board_size - 1;
    (coord.max_component() == s) ^ (coord.min_component() == -s)
}

/// The edge an edge cell lies on. Must only be called on edge cells.
pub(crate) fn edge_label(coord: CubicCoord) -> EdgeLabel {
    let max = coord.max_component();
    let min = coord.min_component();
    if min.abs() > max {
        match min {
            m if coord.x == m => EdgeLabel::NegX,
            m if coord.y == m => EdgeLabel::NegY,
            _ => EdgeLabel::NegZ,
        }
    } else {
        match max {
            m if coord.x == m => EdgeLabel::PosX,
            m if coord.y == m => EdgeLabel::PosY,
            _ => EdgeLabel::PosZ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD_SIZE: i32 = 10;

    #[test]
    fn corner_classification() {
        for coord in [
            (9, -9, 0),
            (9, 0, -9),
            (0, 9, -9),
            (-9, 9, 0),
            (-9, 0, 9),
            (0, -9, 9),
        ] {
            let coord = CubicCoord::from(coord);
            assert!(is_corner(coord, BOARD_SIZE), "{} should be a corner", coord);
            assert!(!is_edge(coord, BOARD_SIZE), "{} should not be an edge", coord);
        }
    }

    #[test]
    fn edge_classification_and_labels() {
        for (coord, label) in [
            ((9, -5, -4), EdgeLabel::PosX),
            ((-9, 4, 5), EdgeLabel::NegX),
            ((-2, 9, -7), EdgeLabel::PosY),
            ((3, -9, 6), EdgeLabel::NegY),
            ((-4, -5, 9), EdgeLabel::PosZ),
            ((2, 7, -9), EdgeLabel::NegZ),
        ] {
            let coord = CubicCoord::from(coord);
            assert!(is_edge(coord, BOARD_SIZE), "{} should be an edge", coord);
            assert!(!is_corner(coord, BOARD_SIZE), "{} should not be a corner", coord);
            assert_eq!(edge_label(coord), label, "wrong label for {}", coord);
        }
    }

    #[test]
    fn interior_cells_are_neither() {
        for coord in [(0, 0, 0), (4, -2, -2), (-8, 4, 4), (1, 7, -8)] {
            let coord = CubicCoord::from(coord);
            assert!(!is_corner(coord, BOARD_SIZE));
            assert!(!is_edge(coord, BOARD_SIZE));
        }
    }

    #[test]
    fn fresh_cell_win_progress() {
        let corner = HexCell::new(GameColor::Player1, CubicCoord::new(9, -9, 0), 0, BOARD_SIZE);
        assert_eq!(corner.num_corners, 1);
        assert!(corner.edges.is_empty());
        assert_eq!(corner.size, 1);
        assert_eq!(corner.parent, 0);

        let edge = HexCell::new(GameColor::Player1, CubicCoord::new(9, -5, -4), 1, BOARD_SIZE);
        assert_eq!(edge.num_corners, 0);
        assert_eq!(edge.edges.len(), 1);
        assert!(edge.edges.contains(EdgeLabel::PosX));

        let interior = HexCell::new(GameColor::Player2, CubicCoord::new(0, 0, 0), 2, BOARD_SIZE);
        assert_eq!(interior.num_corners, 0);
        assert!(interior.edges.is_empty());
    }

    #[test]
    fn edge_set_operations() {
        let mut set = EdgeSet::new();
        assert!(set.is_empty());
        set.insert(EdgeLabel::PosX);
        set.insert(EdgeLabel::PosX);
        set.insert(EdgeLabel::NegZ);
        assert_eq!(set.len(), 2);
        assert!(set.contains(EdgeLabel::PosX));
        assert!(!set.contains(EdgeLabel::NegX));

        let mut other = EdgeSet::new();
        other.insert(EdgeLabel::NegZ);
        other.insert(EdgeLabel::PosY);
        let merged = set.merged(other);
        assert_eq!(merged.len(), 3);
    }
}
