//! Grid snake against the clock: eat fruit for points and bonus seconds,
//! hold the acceleration key to move twice as fast at the cost of length.

pub mod clock;
pub mod collision;
pub mod config;
pub mod fruit;
pub mod game;
pub mod grid;
pub mod input;
pub mod reward;
pub mod snake;

pub use config::{Args, ConfigError, Settings};
pub use game::{BoardView, EndCause, Game, GameObserver, GameState, StepOutcome};
pub use grid::{Grid, Position};
pub use snake::{Direction, Snake};
