use std::io;

use thiserror::Error;
use timed_snake::ConfigError;

use crate::Coords;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to set up logging: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("terminal is {available:?} columns/rows but the board needs at least {needed:?}")]
    TerminalTooSmall { needed: Coords, available: Coords },
}
