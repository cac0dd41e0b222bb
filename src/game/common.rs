use rand::prelude::*;

use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GameColor {
    Player1,
    Player2,
}

impl GameColor {
    pub fn opposite(&self) -> GameColor {
        match self {
            GameColor::Player1 => GameColor::Player2,
            GameColor::Player2 => GameColor::Player1,
        }
    }
}

/// In-process contract between planning agents and a turn-based game.
///
/// `Clone` is the state-copy operation: agents clone the caller's state and
/// advance the copy, the caller-owned state is never mutated by a search.
pub trait Game: Clone {
    type Action: Copy + Eq + Hash + Debug + Display;

    /// All actions legal in the current state, empty iff the state is
    /// terminal.
    fn get_legal_actions(&self) -> Vec<Self::Action>;

    fn is_legal_action(&self, action: Self::Action) -> bool;

    /// Advance the state in place and move the turn to the next player.
    /// Panics on an illegal action.
    fn take_action(&mut self, action: Self::Action);

    /// The player to move.
    fn get_turn(&self) -> GameColor;

    fn is_terminal(&self) -> bool;

    /// The winner, or None for a draw or an ongoing game.
    fn get_winning_id(&self) -> Option<GameColor>;

    /// Uniformly random legal action, used for playouts.
    /// Must not be called on a terminal state.
    fn generate_random_action(&self, rand: &mut StdRng) -> Self::Action {
        let actions = self.get_legal_actions();
        assert!(!actions.is_empty(), "no legal actions to sample from");
        actions[rand.gen_range(0..actions.len())]
    }
}

/// Error returned by [`Agent::search`] when handed a state with no decision
/// left to make.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TerminalStateError;

impl Display for TerminalStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "search called on a terminal state")
    }
}

impl std::error::Error for TerminalStateError {}

/// A game playing agent.
///
/// Agents search for their next action under a wall-clock budget and keep
/// internal bookkeeping in sync as the game progresses. The simulator
/// broadcasts every applied action, its own and the opponents', to every
/// agent through `take_action`.
pub trait Agent<Game: crate::game::common::Game> {
    fn search(
        &mut self,
        state: &Game,
        allotted_time: Duration,
    ) -> Result<Game::Action, TerminalStateError>;

    fn take_action(&mut self, action: Game::Action);

    /// Revert the agent back to its initial state, for reuse across
    /// episodes.
    fn reset(&mut self);
}

/// Agent that picks uniformly random actions regardless of the state.
pub struct RandomAgent {
    rand: StdRng,
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::from_seed(rand::thread_rng().gen())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rand: StdRng::seed_from_u64(seed),
        }
    }
}

impl<Game: crate::game::common::Game> Agent<Game> for RandomAgent {
    fn search(
        &mut self,
        state: &Game,
        _allotted_time: Duration,
    ) -> Result<Game::Action, TerminalStateError> {
        if state.is_terminal() {
            return Err(TerminalStateError);
        }
        Ok(state.generate_random_action(&mut self.rand))
    }

    fn take_action(&mut self, _action: Game::Action) {}

    fn reset(&mut self) {}
}
