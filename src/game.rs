use std::fmt;
use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::SimClock;
use crate::collision::{self, Collision};
use crate::config::{ConfigError, Settings};
use crate::fruit;
use crate::grid::{Grid, Position};
use crate::input::{self, KeyAction};
use crate::reward::RewardPolicy;
use crate::snake::{Direction, Snake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Start,
    InProgress,
    /// Reserved; nothing enters this state.
    Paused,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    TimeUp,
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so there is nowhere left for fruit.
    BoardFull,
}

impl From<Collision> for EndCause {
    fn from(collision: Collision) -> Self {
        match collision {
            Collision::Wall => EndCause::WallCollision,
            Collision::SelfHit => EndCause::SelfCollision,
        }
    }
}

impl fmt::Display for EndCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndCause::TimeUp => f.write_str("time up"),
            EndCause::WallCollision => write!(f, "collision with {}", Collision::Wall),
            EndCause::SelfCollision => write!(f, "collision with {}", Collision::SelfHit),
            EndCause::BoardFull => f.write_str("board full"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The game is not running.
    Idle,
    Moved,
    Ate,
    Ended(EndCause),
}

/// Read-only picture of the board after a step.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    pub grid: Grid,
    pub snake: &'a Snake,
    pub fruit: Option<Position>,
    pub direction: Direction,
    pub state: GameState,
}

/// Receives change notifications from the simulation. Everything visual
/// happens on the other side of this trait.
pub trait GameObserver {
    fn board_changed(&mut self, _board: &BoardView<'_>) {}

    fn hud_changed(&mut self, _score: u32, _time_remaining: f64) {}

    /// Called exactly once per game.
    fn game_over(&mut self, _cause: EndCause, _snake_length: usize, _positions: &[Position]) {}
}

impl GameObserver for () {}

pub struct Game {
    settings: Settings,
    grid: Grid,
    rewards: RewardPolicy,
    clock: SimClock,
    rng: StdRng,

    state: GameState,
    end_cause: Option<EndCause>,
    snake: Snake,
    fruit: Option<Position>,
    direction: Direction,
    next_direction: Direction,
    accelerating: bool,
    accelerated_cells: u32,
    score: u32,
    time_remaining: f64,
}

impl Game {
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        Game::with_rng(settings, StdRng::from_entropy())
    }

    /// Same game, reproducible spawn and fruit placement.
    pub fn with_seed(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        Game::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: Settings, rng: StdRng) -> Result<Self, ConfigError> {
        settings.validate()?;

        Ok(Game {
            grid: settings.grid(),
            rewards: RewardPolicy::from_settings(&settings),
            clock: SimClock::from_settings(&settings),
            rng,
            state: GameState::Start,
            end_cause: None,
            snake: Snake::new(settings.spawn_top_left),
            fruit: None,
            direction: Direction::Stop,
            next_direction: Direction::Stop,
            accelerating: false,
            accelerated_cells: 0,
            score: 0,
            time_remaining: settings.timer,
            settings,
        })
    }

    /// Begins a fresh game with the clock measuring from `now`. Does nothing
    /// while a game is already in progress.
    pub fn start<O: GameObserver + ?Sized>(&mut self, now: Duration, observer: &mut O) -> bool {
        if self.state == GameState::InProgress {
            return false;
        }

        self.reset();
        self.snake = Snake::spawn(self.settings.spawn_top_left, self.settings.spawn_bottom_right, &mut self.rng);
        self.state = GameState::InProgress;
        self.fruit = fruit::place_fruit(&self.snake, &self.grid, &mut self.rng);
        self.clock.restart(now);

        info!("game start: snake at {}, fruit at {:?}", self.snake.head(), self.fruit);
        observer.board_changed(&self.view());
        observer.hud_changed(self.score, self.time_remaining);

        if self.fruit.is_none() {
            self.end(EndCause::BoardFull, observer);
        }

        true
    }

    fn reset(&mut self) {
        self.state = GameState::Start;
        self.end_cause = None;
        self.fruit = None;
        self.direction = Direction::Stop;
        self.next_direction = Direction::Stop;
        self.accelerating = false;
        self.accelerated_cells = 0;
        self.score = 0;
        self.time_remaining = self.settings.timer;
    }

    /// Feeds the current time into the clock and runs whatever steps and
    /// countdown seconds are due. Returns whether the game is still running,
    /// i.e. whether the caller should keep calling.
    pub fn advance<O: GameObserver + ?Sized>(&mut self, now: Duration, observer: &mut O) -> bool {
        if self.state != GameState::InProgress {
            return false;
        }

        let frame = self.clock.advance(now, self.accelerating);

        for _ in 0..frame.steps() {
            self.step(observer);
            if self.state != GameState::InProgress {
                return false;
            }
        }

        if frame.seconds() > 0 {
            self.time_remaining -= f64::from(frame.seconds());
            debug!("time remaining: {}s", self.time_remaining);
            observer.hud_changed(self.score, self.time_remaining);
        }

        true
    }

    /// One logical tick.
    pub fn step<O: GameObserver + ?Sized>(&mut self, observer: &mut O) -> StepOutcome {
        if self.state != GameState::InProgress {
            return StepOutcome::Idle;
        }

        if self.time_remaining <= 0.0 {
            self.end(EndCause::TimeUp, observer);
            return StepOutcome::Ended(EndCause::TimeUp);
        }

        self.direction = self.next_direction;
        let new_head = self.snake.head().offset(self.direction.delta());

        if self.accelerating {
            self.accelerated_cells += 1;
            if self.accelerated_cells >= self.settings.consumed {
                self.accelerated_cells = 0;
                if self.snake.shrink_one_if_longer() {
                    debug!("shrank to {} segments", self.snake.len());
                }
            }
        }

        if let Some(collision) = collision::check(new_head, &self.snake, &self.grid) {
            let cause = EndCause::from(collision);
            self.end(cause, observer);
            return StepOutcome::Ended(cause);
        }

        if self.fruit != Some(new_head) {
            self.snake.advance(new_head, 0);
            observer.board_changed(&self.view());
            return StepOutcome::Moved;
        }

        self.snake.advance(new_head, self.settings.fruit_add);
        self.score = self.score.saturating_add(self.rewards.payoff(self.accelerating));
        if let Some(bonus) = self.rewards.time_bonus() {
            self.time_remaining += bonus;
        }
        debug!("score: {}, time: {}s", self.score, self.time_remaining);
        observer.hud_changed(self.score, self.time_remaining);

        self.fruit = fruit::place_fruit(&self.snake, &self.grid, &mut self.rng);
        observer.board_changed(&self.view());

        if self.fruit.is_none() {
            self.end(EndCause::BoardFull, observer);
            return StepOutcome::Ended(EndCause::BoardFull);
        }

        StepOutcome::Ate
    }

    /// Stops the game. Only the first call per game has any effect.
    pub fn end<O: GameObserver + ?Sized>(&mut self, cause: EndCause, observer: &mut O) {
        if self.state == GameState::Ended {
            return;
        }

        self.accelerating = false;
        self.direction = Direction::Stop;
        self.next_direction = Direction::Stop;
        self.state = GameState::Ended;
        self.end_cause = Some(cause);

        let positions = self.snake.positions();
        info!("game over due to {}", cause);
        info!("snake length: {}", positions.len());
        info!("snake position: {:?}", positions);

        observer.game_over(cause, positions.len(), &positions);
    }

    pub fn key_down(&mut self, key: &str) {
        match input::map_key(key) {
            Some(KeyAction::Steer(direction)) => {
                self.request_direction(direction);
            }
            Some(KeyAction::Accelerate) => self.set_accelerating(true),
            None => {}
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if input::map_key(key) == Some(KeyAction::Accelerate) {
            self.set_accelerating(false);
        }
    }

    /// Queues a turn for the next step, unless it would reverse the snake.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        let allowed = input::can_change_direction(self.direction, direction);
        if allowed {
            self.next_direction = direction;
        }
        allowed
    }

    pub fn set_accelerating(&mut self, accelerating: bool) {
        self.accelerating = accelerating;
    }

    /// Puts the fruit on a chosen free cell, replacing the random one.
    /// Refused for cells off the board or under the snake.
    pub fn place_fruit_at(&mut self, pos: Position) -> bool {
        if !self.grid.in_bounds(pos) || self.snake.occupies(pos) {
            return false;
        }
        self.fruit = Some(pos);
        true
    }

    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            grid: self.grid,
            snake: &self.snake,
            fruit: self.fruit,
            direction: self.direction,
            state: self.state,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::InProgress
    }

    pub fn end_cause(&self) -> Option<EndCause> {
        self.end_cause
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn fruit(&self) -> Option<Position> {
        self.fruit
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn is_accelerating(&self) -> bool {
        self.accelerating
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    /// Whole seconds left as shown to the player.
    pub fn display_time(&self) -> u32 {
        display_seconds(self.time_remaining)
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }
}

/// Rounds and clamps at zero.
pub fn display_seconds(time_remaining: f64) -> u32 {
    time_remaining.max(0.0).round() as u32
}
