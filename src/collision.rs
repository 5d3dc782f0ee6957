use std::fmt;

use crate::grid::{Grid, Position};
use crate::snake::Snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfHit,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Collision::Wall => "wall",
            Collision::SelfHit => "self",
        })
    }
}

/// Classifies a prospective head against the board and the pre-move body.
/// The current head is ignored since it moves out of the way; the wall check
/// runs first.
pub fn check(new_head: Position, snake: &Snake, grid: &Grid) -> Option<Collision> {
    if !grid.in_bounds(new_head) {
        return Some(Collision::Wall);
    }

    if snake.body_occupies(new_head) {
        return Some(Collision::SelfHit);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook() -> Snake {
        // Head at (5,5) with a body curling round to its left.
        Snake::from_segments(vec![
            Position::new(5, 5),
            Position::new(5, 6),
            Position::new(4, 6),
            Position::new(4, 5),
            Position::new(4, 4),
        ])
    }

    #[test]
    fn walls_on_every_side() {
        let grid = Grid::new(25);
        let snake = Snake::new(Position::new(0, 0));

        for head in [
            Position::new(-1, 3),
            Position::new(25, 3),
            Position::new(3, -1),
            Position::new(3, 25),
        ] {
            assert_eq!(check(head, &snake, &grid), Some(Collision::Wall));
        }
    }

    #[test]
    fn body_hit_is_self() {
        let grid = Grid::new(25);
        assert_eq!(check(Position::new(4, 5), &hook(), &grid), Some(Collision::SelfHit));
        assert_eq!(check(Position::new(6, 5), &hook(), &grid), None);
    }

    #[test]
    fn current_head_is_not_an_obstacle() {
        let grid = Grid::new(25);
        assert_eq!(check(Position::new(5, 5), &hook(), &grid), None);

        let single = Snake::new(Position::new(2, 2));
        assert_eq!(check(Position::new(2, 2), &single, &grid), None);
    }

    #[test]
    fn wall_wins_over_self() {
        let grid = Grid::new(3);
        // Synthetic body that sits outside the board.
        let snake = Snake::from_segments(vec![Position::new(2, 1), Position::new(3, 1)]);
        assert_eq!(check(Position::new(3, 1), &snake, &grid), Some(Collision::Wall));
    }
}
