use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use thiserror::Error;

use crate::grid::{Grid, Position};

pub const DEFAULT_GRID_SIZE: i32 = 25;
pub const DEFAULT_SPAWN_TOP_LEFT: Position = Position::new(4, 4);
pub const DEFAULT_SPAWN_BOTTOM_RIGHT: Position = Position::new(20, 20);
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 200;
pub const DEFAULT_TIMER_SECS: f64 = 60.0;
pub const DEFAULT_CONSUMED: u32 = 10;
pub const DEFAULT_FRUIT_ADD: u32 = 5;
pub const DEFAULT_REWARD: u32 = 1;
pub const DEFAULT_REWARD_PLUS: u32 = 2;
pub const DEFAULT_REWARD_TIME_SECS: f64 = 3.0;
pub const DEFAULT_MAX_FPS: u32 = 60;
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 5;
/// Largest board the command line accepts.
pub const MAX_CLI_GRID_SIZE: i64 = 1000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid size must be positive, got {0}")]
    GridSize(i32),
    #[error("spawn corner {corner} lies outside the {size}x{size} grid")]
    SpawnOutOfBounds { corner: Position, size: i32 },
    #[error("spawn box is inverted: top-left {left_top} is past bottom-right {right_bottom}")]
    InvertedSpawnBox { left_top: Position, right_bottom: Position },
    #[error("update interval must be greater than zero")]
    ZeroInterval,
    #[error("timer must be a positive number of seconds, got {0}")]
    Timer(f64),
    #[error("consumed threshold must be at least 1")]
    ZeroConsumed,
    #[error("fruit growth must be at least 1")]
    ZeroFruitAdd,
    #[error("reward time must be a non-negative number of seconds, got {0}")]
    RewardTime(f64),
    #[error("frame rate cap must be at least 1")]
    ZeroFrameRate,
    #[error("steps per frame must be at least 1")]
    ZeroStepsPerFrame,
}

/// Everything that is fixed for the lifetime of one game.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub grid_size: i32,
    pub spawn_top_left: Position,
    pub spawn_bottom_right: Position,
    pub update_interval: Duration,
    /// Seconds on the clock when a game starts.
    pub timer: f64,
    /// Accelerated cells travelled before the tail loses a segment.
    pub consumed: u32,
    pub fruit_add: u32,
    pub reward: u32,
    pub reward_plus: u32,
    pub reward_time: Option<f64>,
    pub max_fps: u32,
    pub max_steps_per_frame: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            grid_size: DEFAULT_GRID_SIZE,
            spawn_top_left: DEFAULT_SPAWN_TOP_LEFT,
            spawn_bottom_right: DEFAULT_SPAWN_BOTTOM_RIGHT,
            update_interval: Duration::from_millis(DEFAULT_UPDATE_INTERVAL_MS),
            timer: DEFAULT_TIMER_SECS,
            consumed: DEFAULT_CONSUMED,
            fruit_add: DEFAULT_FRUIT_ADD,
            reward: DEFAULT_REWARD,
            reward_plus: DEFAULT_REWARD_PLUS,
            reward_time: Some(DEFAULT_REWARD_TIME_SECS),
            max_fps: DEFAULT_MAX_FPS,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
        }
    }
}

impl Settings {
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::GridSize(self.grid_size));
        }

        let grid = self.grid();
        for corner in [self.spawn_top_left, self.spawn_bottom_right] {
            if !grid.in_bounds(corner) {
                return Err(ConfigError::SpawnOutOfBounds { corner, size: self.grid_size });
            }
        }

        let (lt, rb) = (self.spawn_top_left, self.spawn_bottom_right);
        if lt.x > rb.x || lt.y > rb.y {
            return Err(ConfigError::InvertedSpawnBox { left_top: lt, right_bottom: rb });
        }

        if self.update_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if !self.timer.is_finite() || self.timer <= 0.0 {
            return Err(ConfigError::Timer(self.timer));
        }
        if self.consumed == 0 {
            return Err(ConfigError::ZeroConsumed);
        }
        if self.fruit_add == 0 {
            return Err(ConfigError::ZeroFruitAdd);
        }
        if let Some(t) = self.reward_time {
            if !t.is_finite() || t < 0.0 {
                return Err(ConfigError::RewardTime(t));
            }
        }
        if self.max_fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::ZeroStepsPerFrame);
        }

        Ok(())
    }
}

/// Command line for the terminal game.
#[derive(Debug, Parser)]
#[command(name = "timed-snake", version, about = "Eat as much fruit as you can before the clock runs out")]
pub struct Args {
    /// Cells along each side of the square board.
    #[arg(
        long,
        value_name = "CELLS",
        default_value_t = DEFAULT_GRID_SIZE,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(1..=MAX_CLI_GRID_SIZE)
    )]
    pub grid_size: i32,
    /// Top-left corner of the box the snake spawns in.
    #[arg(long, value_name = "X,Y", default_value = "4,4", value_parser = parse_position)]
    pub spawn_top_left: Position,
    /// Bottom-right corner of the box the snake spawns in (inclusive).
    #[arg(long, value_name = "X,Y", default_value = "20,20", value_parser = parse_position)]
    pub spawn_bottom_right: Position,
    /// Milliseconds between snake moves. Holding Shift halves it.
    #[arg(long = "interval-ms", value_name = "MILLISECONDS", default_value_t = DEFAULT_UPDATE_INTERVAL_MS)]
    pub interval_ms: u64,
    /// Seconds on the clock at the start of a game.
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMER_SECS)]
    pub timer: f64,
    /// Accelerated cells travelled before the snake loses a tail segment.
    #[arg(long, value_name = "CELLS", default_value_t = DEFAULT_CONSUMED)]
    pub consumed: u32,
    /// Segments gained per fruit.
    #[arg(long, value_name = "SEGMENTS", default_value_t = DEFAULT_FRUIT_ADD)]
    pub fruit_add: u32,
    /// Points per fruit.
    #[arg(long, value_name = "POINTS", default_value_t = DEFAULT_REWARD)]
    pub reward: u32,
    /// Points per fruit eaten while accelerating.
    #[arg(long, value_name = "POINTS", default_value_t = DEFAULT_REWARD_PLUS)]
    pub reward_plus: u32,
    /// Seconds added to the clock per fruit. 0 disables the bonus.
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_REWARD_TIME_SECS)]
    pub reward_time: f64,
    /// Upper bound on frames processed per second.
    #[arg(long, value_name = "FPS", default_value_t = DEFAULT_MAX_FPS)]
    pub max_fps: u32,
    /// Most snake moves made up in a single frame after a stall.
    #[arg(long, value_name = "STEPS", default_value_t = DEFAULT_MAX_STEPS_PER_FRAME)]
    pub max_steps_per_frame: u32,
    /// Seed for spawn and fruit placement.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Where log output goes; the terminal itself is taken by the game.
    #[arg(long, value_name = "PATH", default_value = "timed-snake.log")]
    pub log_file: PathBuf,
    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let settings = Settings {
            grid_size: self.grid_size,
            spawn_top_left: self.spawn_top_left,
            spawn_bottom_right: self.spawn_bottom_right,
            update_interval: Duration::from_millis(self.interval_ms),
            timer: self.timer,
            consumed: self.consumed,
            fruit_add: self.fruit_add,
            reward: self.reward,
            reward_plus: self.reward_plus,
            reward_time: Some(self.reward_time),
            max_fps: self.max_fps,
            max_steps_per_frame: self.max_steps_per_frame,
        };

        settings.validate()?;
        Ok(settings)
    }
}

fn parse_position(value: &str) -> Result<Position, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| "expected format X,Y".to_string())?;

    let x = x.trim().parse::<i32>().map_err(|e| format!("invalid X: {}", e))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("invalid Y: {}", e))?;
    Ok(Position::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_spawn_box_outside_grid() {
        let settings = Settings { spawn_bottom_right: Position::new(25, 20), ..Settings::default() };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::SpawnOutOfBounds { corner: Position::new(25, 20), size: 25 })
        );
    }

    #[test]
    fn rejects_inverted_spawn_box() {
        let settings = Settings {
            spawn_top_left: Position::new(10, 4),
            spawn_bottom_right: Position::new(5, 20),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::InvertedSpawnBox { .. })));
    }

    #[test]
    fn rejects_bad_numbers() {
        let cases = vec![
            (Settings { grid_size: 0, ..Settings::default() }, ConfigError::GridSize(0)),
            (Settings { update_interval: Duration::ZERO, ..Settings::default() }, ConfigError::ZeroInterval),
            (Settings { timer: 0.0, ..Settings::default() }, ConfigError::Timer(0.0)),
            (Settings { consumed: 0, ..Settings::default() }, ConfigError::ZeroConsumed),
            (Settings { fruit_add: 0, ..Settings::default() }, ConfigError::ZeroFruitAdd),
            (Settings { reward_time: Some(-1.0), ..Settings::default() }, ConfigError::RewardTime(-1.0)),
            (Settings { max_fps: 0, ..Settings::default() }, ConfigError::ZeroFrameRate),
            (Settings { max_steps_per_frame: 0, ..Settings::default() }, ConfigError::ZeroStepsPerFrame),
        ];

        for (settings, expected) in cases {
            assert_eq!(settings.validate(), Err(expected));
        }
    }

    #[test]
    fn args_default_to_builtin_settings() {
        let args = Args::parse_from(["timed-snake"]);
        assert_eq!(args.settings(), Ok(Settings::default()));
    }

    #[test]
    fn args_parse_spawn_box() {
        let args = Args::parse_from([
            "timed-snake",
            "--grid-size",
            "10",
            "--spawn-top-left",
            "1, 2",
            "--spawn-bottom-right",
            "8,9",
            "--reward-time",
            "0",
        ]);
        let settings = args.settings().unwrap();

        assert_eq!(settings.grid_size, 10);
        assert_eq!(settings.spawn_top_left, Position::new(1, 2));
        assert_eq!(settings.spawn_bottom_right, Position::new(8, 9));
        assert_eq!(settings.reward_time, Some(0.0));
    }

    #[test]
    fn args_reject_out_of_range_grid_size() {
        for size in ["0", "-3", "1001", "40000", "65536"] {
            assert!(Args::try_parse_from(["timed-snake", "--grid-size", size]).is_err(), "{}", size);
        }
        let args = Args::parse_from(["timed-snake", "--grid-size", "1000"]);
        assert_eq!(args.grid_size, 1000);
    }

    #[test]
    fn args_reject_malformed_position() {
        assert!(Args::try_parse_from(["timed-snake", "--spawn-top-left", "4;4"]).is_err());
    }
}
