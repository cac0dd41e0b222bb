use std::fmt::{self, Display};

use crate::game::common::{Game, GameColor};
use crate::havannah::board::{HavannahBoard, BOARD_SIZE};
use crate::havannah::hex_math::CubicCoord;

/// Placement of a stone of the given color at a blank cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct HavannahAction {
    pub coord: CubicCoord,
    pub color: GameColor,
}

impl HavannahAction {
    pub fn new(coord: CubicCoord, color: GameColor) -> Self {
        Self { coord, color }
    }
}

impl Display for HavannahAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.coord, self.color)
    }
}

/// Turn management layered over [`HavannahBoard`].
///
/// Player1 moves first. The game ends when the board records a winner or
/// runs out of blank cells (a draw). One episode per value; construct a new
/// one to restart.
#[derive(Clone, Debug)]
pub struct Havannah {
    board: HavannahBoard,
    turn: GameColor,
}

impl Havannah {
    pub fn new() -> Self {
        Self::with_board_size(BOARD_SIZE)
    }

    pub fn with_board_size(board_size: i32) -> Self {
        Self {
            board: HavannahBoard::new(board_size),
            turn: GameColor::Player1,
        }
    }

    pub fn board(&self) -> &HavannahBoard {
        &self.board
    }
}

impl Default for Havannah {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Havannah {
    type Action = HavannahAction;

    fn get_legal_actions(&self) -> Vec<HavannahAction> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board
            .coords()
            .filter(|&coord| self.board.color_at(coord).is_none())
            .map(|coord| HavannahAction::new(coord, self.turn))
            .collect()
    }

    fn is_legal_action(&self, action: HavannahAction) -> bool {
        !self.is_terminal()
            && action.color == self.turn
            && self.board.contains(action.coord)
            && self.board.color_at(action.coord).is_none()
    }

    fn take_action(&mut self, action: HavannahAction) {
        assert!(self.is_legal_action(action), "illegal action {}", action);
        self.board.take_action(action.coord, action.color);
        self.turn = self.turn.opposite();
    }

    fn get_turn(&self) -> GameColor {
        self.turn
    }

    fn is_terminal(&self) -> bool {
        self.board.get_winner().is_some() || self.board.is_full()
    }

    fn get_winning_id(&self) -> Option<GameColor> {
        self.board.get_winner()
    }
}
