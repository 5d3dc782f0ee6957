use std::io;

use timed_snake::game::display_seconds;
use timed_snake::{BoardView, Direction, EndCause, GameObserver, Position};

use crate::error::AppError;
use crate::term::TermManager;
use crate::{Coords, TermInt};

// Terminal characters are about twice as tall as they are wide
const CELL_WIDTH: TermInt = 2;

const EMPTY_CELL: &str = "  ";
const SNAKE_BODY_CELL: &str = "██";
const STOPPED_HEAD_CELL: &str = "▓▓";
const FRUIT_CELL: &str = "()";
const DEAD_SNAKE_CELL: &str = "XX";

/// Screen position of cell (0, 0) for a board centred in `available`.
fn board_origin(grid_size: i32, available: Coords) -> Result<Coords, AppError> {
    // Border on both sides plus the HUD row above
    let needed = TermInt::try_from(grid_size)
        .ok()
        .and_then(|cells| {
            let width = cells.checked_mul(CELL_WIDTH)?.checked_add(2)?;
            let height = cells.checked_add(3)?;
            Some((width, height))
        });

    let needed = match needed {
        Some(needed) if available.0 >= needed.0 && available.1 >= needed.1 => needed,
        Some(needed) => return Err(AppError::TerminalTooSmall { needed, available }),
        None => {
            let needed = (TermInt::MAX, TermInt::MAX);
            return Err(AppError::TerminalTooSmall { needed, available });
        }
    };

    let border_top_left = ((available.0 - needed.0) / 2, (available.1 - needed.1) / 2 + 1);
    Ok((border_top_left.0 + 1, border_top_left.1 + 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Body,
    Head(Direction),
    Fruit,
    Dead,
}

impl Cell {
    fn glyph(self) -> &'static str {
        match self {
            Cell::Empty => EMPTY_CELL,
            Cell::Body => SNAKE_BODY_CELL,
            Cell::Head(Direction::Up) => "^^",
            Cell::Head(Direction::Down) => "vv",
            Cell::Head(Direction::Left) => "<<",
            Cell::Head(Direction::Right) => ">>",
            Cell::Head(Direction::Stop) => STOPPED_HEAD_CELL,
            Cell::Fruit => FRUIT_CELL,
            Cell::Dead => DEAD_SNAKE_CELL,
        }
    }
}

/// Draws the board, HUD and game-over box on the terminal. Only cells that
/// changed since the last frame are printed.
pub struct BoardRenderer {
    term: TermManager,
    grid_size: i32,
    /// Screen position of cell (0, 0).
    origin: Coords,
    drawn: Vec<Cell>,
    score: u32,
    error: Option<io::Error>,
}

impl BoardRenderer {
    pub fn new(term: TermManager, grid_size: i32) -> Result<Self, AppError> {
        let origin = board_origin(grid_size, term.get_terminal_size())?;
        let cell_count = usize::try_from(grid_size).unwrap_or(0).pow(2);

        Ok(BoardRenderer {
            term,
            grid_size,
            origin,
            drawn: vec![Cell::Empty; cell_count],
            score: 0,
            error: None,
        })
    }

    pub fn term(&mut self) -> &mut TermManager {
        &mut self.term
    }

    /// First terminal error hit while handling a notification, if any.
    pub fn take_error(&mut self) -> io::Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Wipes the screen and draws an empty board.
    pub fn draw_frame(&mut self) -> io::Result<()> {
        self.term.clear()?;
        let cells = self.grid_size as TermInt;
        let border_top_left = (self.origin.0 - 1, self.origin.1 - 1);
        self.term.draw_borders(border_top_left, (cells * CELL_WIDTH + 2, cells + 2))?;

        for cell in self.drawn.iter_mut() {
            *cell = Cell::Empty;
        }
        self.score = 0;
        Ok(())
    }

    fn screen_pos(&self, pos: Position) -> Coords {
        (self.origin.0 + pos.x as TermInt * CELL_WIDTH, self.origin.1 + pos.y as TermInt)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let in_bounds = (0..self.grid_size).contains(&pos.x) && (0..self.grid_size).contains(&pos.y);
        in_bounds.then(|| (pos.y * self.grid_size + pos.x) as usize)
    }

    fn print_cell(&mut self, pos: Position, cell: Cell) -> io::Result<()> {
        let idx = match self.index(pos) {
            Some(idx) => idx,
            None => return Ok(()),
        };
        if self.drawn[idx] != cell {
            let screen_pos = self.screen_pos(pos);
            self.term.print_str_at(screen_pos, cell.glyph())?;
            self.drawn[idx] = cell;
        }
        Ok(())
    }

    fn draw_board(&mut self, board: &BoardView<'_>) -> io::Result<()> {
        let mut wanted = vec![Cell::Empty; self.drawn.len()];

        if let Some(idx) = board.fruit.and_then(|f| self.index(f)) {
            wanted[idx] = Cell::Fruit;
        }
        for &segment in board.snake.iter().skip(1) {
            if let Some(idx) = self.index(segment) {
                wanted[idx] = Cell::Body;
            }
        }
        // Drawn last so it shows over segments stacked on the same cell
        if let Some(idx) = self.index(board.snake.head()) {
            wanted[idx] = Cell::Head(board.direction);
        }

        for y in 0..self.grid_size {
            for x in 0..self.grid_size {
                let pos = Position::new(x, y);
                let idx = (y * self.grid_size + x) as usize;
                self.print_cell(pos, wanted[idx])?;
            }
        }

        self.term.flush()
    }

    fn draw_hud(&mut self, score: u32, time_remaining: f64) -> io::Result<()> {
        let line = format!("Score: {:<6} Time: {:>4}s", score, display_seconds(time_remaining));
        let pos = (self.origin.0 - 1, self.origin.1 - 2);
        self.term.print_str_at(pos, &line)?;
        self.term.flush()
    }

    fn draw_game_over(&mut self, cause: EndCause, snake_length: usize, positions: &[Position]) -> io::Result<()> {
        let won = cause == EndCause::BoardFull;

        if !won {
            for &pos in positions {
                self.print_cell(pos, Cell::Dead)?;
            }
        }

        let title = if won {"Board full!"} else {"Game over!"};
        self.term.show_message(&[
            title.to_string(),
            format!("Cause: {}", cause),
            format!("Score: {}", self.score),
            format!("Length: {}", snake_length),
            String::new(),
            "Enter to play again,".to_string(),
            "Esc or CTRL+C to quit.".to_string(),
        ])
    }

    fn record(&mut self, res: io::Result<()>) {
        if let Err(err) = res {
            self.error.get_or_insert(err);
        }
    }
}

impl GameObserver for BoardRenderer {
    fn board_changed(&mut self, board: &BoardView<'_>) {
        let res = self.draw_board(board);
        self.record(res);
    }

    fn hud_changed(&mut self, score: u32, time_remaining: f64) {
        self.score = score;
        let res = self.draw_hud(score, time_remaining);
        self.record(res);
    }

    fn game_over(&mut self, cause: EndCause, snake_length: usize, positions: &[Position]) {
        let res = self.draw_game_over(cause, snake_length, positions);
        self.record(res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_is_centred_below_the_hud() {
        // 25 cells: 52 columns, 28 rows including the HUD
        assert_eq!(board_origin(25, (120, 40)).unwrap(), (35, 8));
        assert_eq!(board_origin(25, (52, 28)).unwrap(), (1, 2));
    }

    #[test]
    fn small_terminal_is_an_error() {
        match board_origin(25, (51, 40)) {
            Err(AppError::TerminalTooSmall { needed, available }) => {
                assert_eq!(needed, (52, 28));
                assert_eq!(available, (51, 40));
            }
            other => panic!("expected TerminalTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn huge_grid_does_not_overflow() {
        for grid_size in [40_000, 65_536, i32::MAX] {
            match board_origin(grid_size, (120, 40)) {
                Err(AppError::TerminalTooSmall { needed, .. }) => {
                    assert_eq!(needed, (TermInt::MAX, TermInt::MAX));
                }
                other => panic!("expected TerminalTooSmall for {}, got {:?}", grid_size, other),
            }
        }
    }
}
