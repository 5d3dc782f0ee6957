use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};
use log::info;
use timed_snake::{Game, Settings};

use crate::error::AppError;
use crate::render::BoardRenderer;
use crate::term::TermManager;

const POLL_INTERVAL_MS: u64 = 5;
const SHIFT_KEY: &str = "Shift";

pub struct App {
    renderer: BoardRenderer,
    game: Game,
    epoch: Instant,
}

impl App {
    pub fn new(settings: Settings, seed: Option<u64>) -> Result<Self, AppError> {
        let grid_size = settings.grid_size;
        let game = match seed {
            Some(seed) => Game::with_seed(settings, seed)?,
            None => Game::new(settings)?,
        };
        let renderer = BoardRenderer::new(TermManager::new()?, grid_size)?;

        Ok(App { renderer, game, epoch: Instant::now() })
    }

    /// Runs until the player quits, leaving the terminal as it was found.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.renderer.term().setup()?;
        let res = self.run_games();
        let restored = self.renderer.term().restore();
        res?;
        Ok(restored?)
    }

    fn run_games(&mut self) -> Result<(), AppError> {
        if !self.show_intro()? {
            return Ok(());
        }

        while self.play()? {}
        Ok(())
    }

    fn show_intro(&mut self) -> Result<bool, AppError> {
        let shift_hint = if self.renderer.term().has_key_release_events() {
            "Hold Shift to speed up"
        } else {
            "Shift+direction to speed up"
        };
        let lines = [
            "Arrow keys or WASD to move",
            shift_hint,
            "Esc or CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.renderer.term().show_message(&lines)?;

        loop {
            let key = self.renderer.term().read_key_blocking()?;
            if is_quit(&key) {
                return Ok(false);
            }
            if key.kind == KeyEventKind::Press {
                break;
            }
        }

        self.renderer.term().hide_message()?;
        Ok(true)
    }

    /// Plays one game. Returns whether the player wants another.
    fn play(&mut self) -> Result<bool, AppError> {
        self.renderer.draw_frame()?;
        self.game.start(self.epoch.elapsed(), &mut self.renderer);
        self.renderer.take_error()?;

        while self.game.is_running() {
            let events = self.renderer.term().read_key_events_queue(Duration::from_millis(POLL_INTERVAL_MS))?;
            for key_ev in events {
                if is_quit(&key_ev) {
                    info!("quit during play, score {}", self.game.score());
                    return Ok(false);
                }
                self.feed_key(&key_ev);
            }

            self.game.advance(self.epoch.elapsed(), &mut self.renderer);
            self.renderer.take_error()?;
        }

        // Game over box is up; wait for a decision
        loop {
            let key = self.renderer.term().read_key_blocking()?;
            if is_quit(&key) {
                return Ok(false);
            }
            if key.kind == KeyEventKind::Press && matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                return Ok(true);
            }
        }
    }

    fn feed_key(&mut self, key_ev: &KeyEvent) {
        if !self.renderer.term().has_key_release_events() {
            // No releases without the keyboard protocol: whether Shift is
            // held is read off the modifiers of each key instead
            if key_ev.modifiers.contains(KeyModifiers::SHIFT) {
                self.game.key_down(SHIFT_KEY);
            } else {
                self.game.key_up(SHIFT_KEY);
            }
        }

        let name = match key_name(key_ev.code) {
            Some(name) => name,
            None => return,
        };

        match key_ev.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.game.key_down(&name),
            KeyEventKind::Release => self.game.key_up(&name),
        }
    }
}

/// Browser-style key names understood by the game's input mapping.
fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => SHIFT_KEY.to_string(),
        _ => return None,
    };

    Some(name)
}

fn is_quit(ev: &KeyEvent) -> bool {
    if ev.kind == KeyEventKind::Release {
        return false;
    }

    matches!(ev.code, KeyCode::Esc)
        || (ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL))
}
