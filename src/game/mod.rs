pub mod common;
pub mod mcts;
