use itertools::Itertools;
use std::collections::{HashMap, HashSet};

use crate::game::common::GameColor;
use crate::havannah::cell::HexCell;
use crate::havannah::hex_math::CubicCoord;

/// Standard Havannah board side length.
pub const BOARD_SIZE: i32 = 10;
/// Side length recommended for new players.
pub const BEGINNER_BOARD_SIZE: i32 = 8;

/// Index of a union find root, only obtainable from [`HavannahBoard::find`].
///
/// Win progress fields are authoritative on roots only, so cells are read
/// through this handle rather than by raw arena index.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct RootIdx(usize);

/// Havannah board answering "did the last move win?" incrementally.
///
/// Colored cells live in a union find arena keyed by coordinate. Each group
/// root carries the group's corner count and edge label set, so bridge
/// (two corners) and fork (three distinct edges) are a root lookup plus two
/// comparisons per move. Rings are checked by a bounded walk around the new
/// cell, gated by a cheap structural pre-filter.
#[derive(Clone, Debug)]
pub struct HavannahBoard {
    board_size: i32,
    all_coords: Vec<CubicCoord>,
    cells: Vec<HexCell>,
    lookup: HashMap<CubicCoord, usize>,
    winner: Option<GameColor>,
}

impl HavannahBoard {
    pub fn new(board_size: i32) -> Self {
        assert!(board_size >= 2, "board size {} too small", board_size);
        let s = board_size - 1;
        let all_coords = (-s..=s)
            .flat_map(|x| {
                ((-s).max(-x - s)..=s.min(-x + s)).map(move |y| CubicCoord::new(x, y, -x - y))
            })
            .collect_vec();
        Self {
            board_size,
            all_coords,
            cells: Vec::new(),
            lookup: HashMap::new(),
            winner: None,
        }
    }

    pub fn board_size(&self) -> i32 {
        self.board_size
    }

    pub fn contains(&self, coord: CubicCoord) -> bool {
        let s = self.board_size - 1;
        coord.max_component() <= s && coord.min_component() >= -s
    }

    pub fn color_at(&self, coord: CubicCoord) -> Option<GameColor> {
        self.lookup.get(&coord).map(|&index| self.cells[index].color)
    }

    /// All valid coordinates, in a fixed order.
    pub fn coords(&self) -> impl Iterator<Item = CubicCoord> + '_ {
        self.all_coords.iter().copied()
    }

    pub fn num_cells(&self) -> usize {
        self.all_coords.len()
    }

    pub fn is_full(&self) -> bool {
        self.lookup.len() == self.all_coords.len()
    }

    pub fn get_winner(&self) -> Option<GameColor> {
        self.winner
    }

    /// Color a blank cell and update the winner if the move completes a
    /// bridge, fork or ring. Panics on an out-of-bounds or colored cell.
    pub fn take_action(&mut self, coord: CubicCoord, color: GameColor) {
        assert!(self.contains(coord), "cell {} is out of bounds", coord);
        assert!(
            self.color_at(coord).is_none(),
            "cell {} is already colored",
            coord
        );

        let index = self.cells.len();
        self.cells
            .push(HexCell::new(color, coord, index, self.board_size));
        self.lookup.insert(coord, index);

        self.check_for_winner(coord, color);
    }

    fn check_for_winner(&mut self, coord: CubicCoord, color: GameColor) {
        if self.winner.is_some() {
            return;
        }

        let neighbors = coord
            .neighbors()
            .into_iter()
            .filter(|&n| self.color_at(n) == Some(color))
            .collect_vec();

        /* Rings are checked against group roots as they were before this
         * move, so this happens before the unions below */
        let ring = self.check_ring(coord, &neighbors, color);

        for &neighbor in &neighbors {
            self.union(coord, neighbor);
        }

        let root = self.find(self.lookup[&coord]);
        let group = self.cells[root.0];
        if ring || group.num_corners >= 2 || group.edges.len() >= 3 {
            self.winner = Some(color);
        }
    }

    /// Root of the group containing the cell at `index`, with two-pass path
    /// compression.
    fn find(&mut self, index: usize) -> RootIdx {
        let mut root = index;
        while self.cells[root].parent != root {
            root = self.cells[root].parent;
        }

        let mut current = index;
        while current != root {
            let next = self.cells[current].parent;
            self.cells[current].parent = root;
            current = next;
        }
        RootIdx(root)
    }

    /// Merge the groups of two colored cells, smaller into larger. The
    /// surviving root accumulates both groups' win progress.
    fn union(&mut self, a: CubicCoord, b: CubicCoord) {
        let RootIdx(a) = self.find(self.lookup[&a]);
        let RootIdx(b) = self.find(self.lookup[&b]);
        if a == b {
            return;
        }
        assert_eq!(self.cells[a].color, self.cells[b].color);

        let (large, small) = if self.cells[a].size >= self.cells[b].size {
            (a, b)
        } else {
            (b, a)
        };
        self.cells[small].parent = large;
        self.cells[large].size += self.cells[small].size;
        self.cells[large].num_corners += self.cells[small].num_corners;
        self.cells[large].edges = self.cells[large].edges.merged(self.cells[small].edges);
    }

    /// Did coloring `coord` close a ring?
    ///
    /// `neighbors` are the same-colored neighbors of `coord`, whose roots
    /// still reflect the position before this move.
    fn check_ring(
        &mut self,
        coord: CubicCoord,
        neighbors: &[CubicCoord],
        color: GameColor,
    ) -> bool {
        if neighbors.len() < 2 {
            return false;
        }

        /* A new cycle requires two neighbors already connected to each
         * other; many distinct neighbor groups also warrant a closer look */
        let roots = neighbors
            .iter()
            .map(|&n| self.find(self.lookup[&n]))
            .collect_vec();
        let num_groups = roots.iter().map(|root| root.0).collect::<HashSet<_>>().len();
        let possible = num_groups > 2
            || neighbors
                .iter()
                .zip(&roots)
                .tuple_combinations()
                .any(|((&a, ra), (&b, rb))| ra == rb && !a.is_adjacent(&b));

        if possible {
            let mut path = HashSet::from([coord]);
            for &first in neighbors {
                if self.ring_walk(&mut path, coord, first, color) {
                    return true;
                }
            }
        }

        self.filled_ring(coord, neighbors, color)
    }

    /// Depth first walk over same-colored cells looking for a cycle through
    /// `coord`.
    ///
    /// Steps back to the previous cell or to any of its neighbors are
    /// forbidden, which rules out non-enclosing triangle and lens shaped
    /// cycles. `path` holds the cells of the current walk only and is
    /// unwound on backtrack; a shared visited set would mistake two
    /// branches meeting inside a solid blob for a cycle.
    fn ring_walk(
        &self,
        path: &mut HashSet<CubicCoord>,
        prev: CubicCoord,
        current: CubicCoord,
        color: GameColor,
    ) -> bool {
        path.insert(current);
        for next in current.neighbors() {
            if next == prev || next.is_adjacent(&prev) {
                continue;
            }
            if self.color_at(next) != Some(color) {
                continue;
            }
            if path.contains(&next) {
                return true;
            }
            if self.ring_walk(path, current, next, color) {
                return true;
            }
        }
        path.remove(&current);
        false
    }

    /// Ring whose interior is filled: two neighbors of the new cell share
    /// an interior cell whose six neighbors are all in bounds and all the
    /// mover's color.
    fn filled_ring(&self, coord: CubicCoord, neighbors: &[CubicCoord], color: GameColor) -> bool {
        for (&a, &b) in neighbors.iter().tuple_combinations() {
            for interior in a.neighbors() {
                if interior == coord || !interior.is_adjacent(&b) || !self.contains(interior) {
                    continue;
                }
                if interior
                    .neighbors()
                    .iter()
                    .all(|&n| self.color_at(n) == Some(color))
                {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colored_board(coords: &[(i32, i32, i32)], color: GameColor) -> HavannahBoard {
        let mut board = HavannahBoard::new(4);
        for &coord in coords {
            board.take_action(coord.into(), color);
        }
        board
    }

    #[test]
    fn cell_count_matches_the_hexagon_formula() {
        for board_size in 2..=BOARD_SIZE {
            let n = board_size as usize;
            let board = HavannahBoard::new(board_size);
            assert_eq!(board.num_cells(), 3 * n * (n - 1) + 1);
            assert!(board.coords().all(|coord| board.contains(coord)));
        }
    }

    #[test]
    fn bounds_checking() {
        let board = HavannahBoard::new(4);
        assert!(board.contains(CubicCoord::new(3, -3, 0)));
        assert!(board.contains(CubicCoord::new(0, 0, 0)));
        assert!(!board.contains(CubicCoord::new(4, -4, 0)));
        assert!(!board.contains(CubicCoord::new(2, 2, -4)));
    }

    #[test]
    fn find_returns_a_self_parented_root() {
        let mut board = colored_board(
            &[(0, 0, 0), (1, 0, -1), (2, 0, -2), (3, 0, -3)],
            GameColor::Player1,
        );
        for coord in [(0, 0, 0), (1, 0, -1), (2, 0, -2), (3, 0, -3)] {
            let index = board.lookup[&CubicCoord::from(coord)];
            let root = board.find(index);
            assert_eq!(board.cells[root.0].parent, root.0);
        }
    }

    #[test]
    fn connected_cells_share_a_root_and_size() {
        let mut board = colored_board(
            &[(0, 0, 0), (2, 0, -2), (1, 0, -1)],
            GameColor::Player1,
        );
        let roots = [(0, 0, 0), (1, 0, -1), (2, 0, -2)]
            .map(|coord| board.find(board.lookup[&CubicCoord::from(coord)]));
        assert_eq!(roots[0], roots[1]);
        assert_eq!(roots[1], roots[2]);
        assert_eq!(board.cells[roots[0].0].size, 3);
    }

    #[test]
    fn opposite_colors_never_merge() {
        let mut board = HavannahBoard::new(4);
        board.take_action(CubicCoord::new(0, 0, 0), GameColor::Player1);
        board.take_action(CubicCoord::new(1, 0, -1), GameColor::Player2);
        let a = board.find(board.lookup[&CubicCoord::new(0, 0, 0)]);
        let b = board.find(board.lookup[&CubicCoord::new(1, 0, -1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn path_compression_flattens_chains() {
        let mut board = colored_board(
            &[(0, 0, 0), (1, 0, -1), (2, 0, -2), (3, 0, -3)],
            GameColor::Player1,
        );
        for coord in [(0, 0, 0), (1, 0, -1), (2, 0, -2), (3, 0, -3)] {
            let index = board.lookup[&CubicCoord::from(coord)];
            let root = board.find(index);
            /* After a find, the cell points at the root directly */
            assert_eq!(board.cells[index].parent, root.0);
        }
    }

    #[test]
    fn union_accumulates_win_progress_on_the_root() {
        /* Two separate groups on the NegX edge, bridged by a middle cell */
        let mut board = colored_board(
            &[(-3, 0, 3), (-3, 2, 1), (-3, 1, 2)],
            GameColor::Player1,
        );
        let root = board.find(board.lookup[&CubicCoord::new(-3, 1, 2)]);
        let group = board.cells[root.0];
        assert_eq!(group.size, 3);
        assert_eq!(group.num_corners, 1);
        assert_eq!(group.edges.len(), 1);
    }
}
