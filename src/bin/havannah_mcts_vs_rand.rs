use clap::Parser;
use std::time::Duration;

use havannah_mcts::game::common::{Agent, Game, GameColor, RandomAgent};
use havannah_mcts::game::mcts::MctsAgent;
use havannah_mcts::havannah::board::{BEGINNER_BOARD_SIZE, BOARD_SIZE};
use havannah_mcts::havannah::game::Havannah;
use havannah_mcts::util;

#[derive(Parser, Debug)]
#[clap(about = "MCTS agent vs random agent on a Havannah board")]
struct Args {
    #[clap(long, default_value_t = BOARD_SIZE)]
    board_size: i32,
    /// Shrink the board to the size recommended for new players
    #[clap(long)]
    beginner: bool,
    #[clap(long, default_value_t = 1.0)]
    time_per_move: f64,
}

fn main() {
    util::init_globals();
    let args = Args::parse();

    let board_size = if args.beginner {
        BEGINNER_BOARD_SIZE
    } else {
        args.board_size
    };
    let mut game = Havannah::with_board_size(board_size);
    let mut mcts_agent = MctsAgent::new();
    let mut rand_agent = RandomAgent::new();
    let budget = Duration::from_secs_f64(args.time_per_move);

    let mut num_moves = 0;
    while !game.is_terminal() {
        let action = match game.get_turn() {
            GameColor::Player1 => mcts_agent.search(&game, budget),
            GameColor::Player2 => rand_agent.search(&game, budget),
        }
        .expect("game is not over");
        log::info!("{}", action);

        /* Every applied action is broadcast to both agents */
        game.take_action(action);
        mcts_agent.take_action(action);
        Agent::<Havannah>::take_action(&mut rand_agent, action);
        num_moves += 1;
    }

    match game.get_winning_id() {
        Some(winner) => log::info!("{:?} won after {} moves", winner, num_moves),
        None => log::info!("draw after {} moves", num_moves),
    }
}
