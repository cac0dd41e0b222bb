pub mod game;
pub mod havannah;
pub mod util;
