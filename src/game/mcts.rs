use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rand::prelude::*;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::game::common::{Agent, GameColor, TerminalStateError};

/// Monte Carlo Tree Search (MCTS) implementation

#[derive(Clone, Copy)]
struct SearchNode {
    /// Player to move at this node's state. None on a freshly created root.
    player: Option<GameColor>,

    /// This is the variable n from the UCT formula: the number of
    /// backpropagation passes through the node.
    trials: u32,

    /// This is the variable w from the UCT formula: passes whose simulation
    /// was won by `player`.
    wins: u32,
}

impl SearchNode {
    fn new(player: Option<GameColor>) -> Self {
        Self {
            player,
            trials: 0,
            wins: 0,
        }
    }
}

/// Agent choosing actions by Monte Carlo Tree Search under a wall-clock
/// budget.
///
/// The search tree persists across turns: `take_action` re-roots it at the
/// played action's subtree instead of rebuilding, so statistics gathered in
/// one search keep paying off in the next.
pub struct MctsAgent<Game: crate::game::common::Game> {
    search_tree: DiGraph<SearchNode, Game::Action>,
    root: NodeIndex,

    explore_factor: f32,
    rand: StdRng,
}

impl<Game: crate::game::common::Game> Default for MctsAgent<Game> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Game: crate::game::common::Game> MctsAgent<Game> {
    pub fn new() -> Self {
        Self::new_custom(std::f32::consts::SQRT_2, rand::thread_rng().gen())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new_custom(std::f32::consts::SQRT_2, seed)
    }

    pub fn new_custom(explore_factor: f32, seed: u64) -> Self {
        assert!(explore_factor >= 0.0);
        let mut search_tree = DiGraph::new();
        let root = search_tree.add_node(SearchNode::new(None));
        Self {
            search_tree,
            root,
            explore_factor,
            rand: StdRng::seed_from_u64(seed),
        }
    }

    /// Run simulation cycles until the budget is exhausted, returning the
    /// number of completed cycles.
    ///
    /// The clock is polled once per completed cycle: at least one simulation
    /// runs even on a zero budget, and a running simulation is never
    /// interrupted.
    fn develop_tree(&mut self, state: &Game, allotted_time: Duration) -> u32 {
        let start_time = Instant::now();
        let mut simulations = 0;
        loop {
            let mut sim_state = state.clone();

            /* Select a node with an unexpanded action, or a terminal node */
            let (node_id, terminal) = self.select(&mut sim_state);

            /* Expand one random unexplored action */
            let node_id = if terminal {
                node_id
            } else {
                self.expand(&mut sim_state, node_id)
            };

            /* Play out the game and record the result up to the root */
            let winner = self.simulate(&mut sim_state);
            self.backpropagate(node_id, winner);

            simulations += 1;
            if start_time.elapsed() >= allotted_time {
                return simulations;
            }
        }
    }

    /// Walk down from the root picking the UCT-maximal child until reaching
    /// a node with an unexpanded legal action or a terminal state, advancing
    /// `state` along the way. Returns the node and whether it is terminal.
    fn select(&self, state: &mut Game) -> (NodeIndex, bool) {
        let mut node_id = self.root;
        loop {
            if state.is_terminal() {
                return (node_id, true);
            }

            let expanded: HashSet<Game::Action> = self
                .search_tree
                .edges(node_id)
                .map(|edge| *edge.weight())
                .collect();
            if state
                .get_legal_actions()
                .iter()
                .any(|action| !expanded.contains(action))
            {
                return (node_id, false);
            }

            /* All actions expanded, descend into the best child's sub tree */
            let parent_trials = self.search_tree[node_id].trials;
            let mut best: Option<(f32, Game::Action, NodeIndex)> = None;
            for edge in self.search_tree.edges(node_id) {
                let value = self.uct(&self.search_tree[edge.target()], parent_trials);
                /* Ties break on the first maximum in edge iteration order */
                if best.map_or(true, |(best_value, _, _)| value > best_value) {
                    best = Some((value, *edge.weight(), edge.target()));
                }
            }
            let (_, action, child_id) = best.unwrap();

            state.take_action(action);
            node_id = child_id;
        }
    }

    /// Upper Confidence bound applied to Trees.
    ///
    /// Always well defined: a child records its first trial in the same
    /// cycle that creates it, and selection only descends through nodes
    /// that already hold a trial.
    fn uct(&self, child: &SearchNode, parent_trials: u32) -> f32 {
        let exploit = child.wins as f32 / child.trials as f32;
        let explore =
            self.explore_factor * ((parent_trials as f32).ln() / child.trials as f32).sqrt();
        exploit + explore
    }

    /// Attach a child for one uniformly random unexpanded action, tagged
    /// with the player to move in the resulting state.
    fn expand(&mut self, state: &mut Game, parent_id: NodeIndex) -> NodeIndex {
        let expanded: HashSet<Game::Action> = self
            .search_tree
            .edges(parent_id)
            .map(|edge| *edge.weight())
            .collect();
        let unexpanded = state
            .get_legal_actions()
            .into_iter()
            .filter(|action| !expanded.contains(action))
            .collect_vec();
        let action = unexpanded[self.rand.gen_range(0..unexpanded.len())];

        state.take_action(action);
        let child_id = self
            .search_tree
            .add_node(SearchNode::new(Some(state.get_turn())));
        self.search_tree.add_edge(parent_id, child_id, action);
        child_id
    }

    /// Light playout: uniformly random actions until the game is over.
    fn simulate(&mut self, state: &mut Game) -> Option<GameColor> {
        while !state.is_terminal() {
            let action = state.generate_random_action(&mut self.rand);
            state.take_action(action);
        }
        state.get_winning_id()
    }

    fn backpropagate(&mut self, node_id: NodeIndex, winner: Option<GameColor>) {
        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = &mut self.search_tree[id];
            node.trials += 1;
            if let (Some(player), Some(winner)) = (node.player, winner) {
                if player == winner {
                    node.wins += 1;
                }
            }
            current = self.parent_of(id);
        }
    }

    /// The parent back-reference: the source of the single incoming edge.
    fn parent_of(&self, node_id: NodeIndex) -> Option<NodeIndex> {
        self.search_tree
            .edges_directed(node_id, Direction::Incoming)
            .next()
            .map(|edge| edge.source())
    }

    /// Robust-child policy: the most visited root child. Lower variance than
    /// the highest win rate at low sample counts.
    fn most_visited_root_action(&self) -> Game::Action {
        let mut best: Option<(u32, Game::Action)> = None;
        for edge in self.search_tree.edges(self.root) {
            let trials = self.search_tree[edge.target()].trials;
            if best.map_or(true, |(best_trials, _)| trials > best_trials) {
                best = Some((trials, *edge.weight()));
            }
        }
        best.expect("the root is expanded by at least one simulation").1
    }

    fn remove_all_but_subtree(&mut self, sub_tree_root: NodeIndex) {
        if self.root == sub_tree_root {
            return;
        }

        // In petgraph, when you remove a node, the indices of the other
        // nodes change. So instead of removing nodes from the current tree,
        // we copy the kept subtree to a new graph.
        let mut new_tree = DiGraph::new();
        let new_root = new_tree.add_node(self.search_tree[sub_tree_root]);
        let mut nodes = vec![(sub_tree_root, new_root)];

        while let Some((parent_old, parent_new)) = nodes.pop() {
            for edge in self.search_tree.edges(parent_old) {
                let child_old = edge.target();
                let child_new = new_tree.add_node(self.search_tree[child_old]);
                new_tree.add_edge(parent_new, child_new, *edge.weight());

                nodes.push((child_old, child_new));
            }
        }

        self.search_tree = new_tree;
        self.root = new_root;
    }
}

impl<Game: crate::game::common::Game> Agent<Game> for MctsAgent<Game> {
    fn search(
        &mut self,
        state: &Game,
        allotted_time: Duration,
    ) -> Result<Game::Action, TerminalStateError> {
        if state.is_terminal() {
            return Err(TerminalStateError);
        }

        let start_time = Instant::now();
        let simulations = self.develop_tree(state, allotted_time);
        log::debug!(
            "mcts: {} simulations, {} tree nodes, {:?} elapsed",
            simulations,
            self.search_tree.node_count(),
            start_time.elapsed()
        );

        Ok(self.most_visited_root_action())
    }

    /// Advance the tree root by the action actually played.
    ///
    /// An explored action keeps its whole subtree and statistics; an
    /// unexplored one (an opponent move the search never visited) resets
    /// the tree, which is expected rather than an error.
    fn take_action(&mut self, action: Game::Action) {
        let child = self
            .search_tree
            .edges(self.root)
            .find(|edge| *edge.weight() == action)
            .map(|edge| edge.target());

        match child {
            Some(child_id) => self.remove_all_but_subtree(child_id),
            None => {
                log::debug!("mcts: action {} not in tree, starting over", action);
                self.reset();
            }
        }
    }

    fn reset(&mut self) {
        self.search_tree.clear();
        self.root = self.search_tree.add_node(SearchNode::new(None));
    }
}
