use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Grid, Position};
use crate::snake::Snake;

/// Picks a free cell uniformly at random, or `None` once the snake covers the
/// whole board.
pub fn place_fruit<R: Rng + ?Sized>(snake: &Snake, grid: &Grid, rng: &mut R) -> Option<Position> {
    let choices: Vec<Position> = grid.cells().filter(|&pos| !snake.occupies(pos)).collect();
    choices.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn never_lands_on_the_snake() {
        let grid = Grid::new(5);
        let snake = Snake::from_segments((0..5).map(|x| Position::new(x, 2)));
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..200 {
            let fruit = place_fruit(&snake, &grid, &mut rng).unwrap();
            assert!(grid.in_bounds(fruit));
            assert!(!snake.occupies(fruit));
        }
    }

    #[test]
    fn only_free_cell_is_chosen() {
        let grid = Grid::new(2);
        let snake = Snake::from_segments(vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
        ]);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(place_fruit(&snake, &grid, &mut rng), Some(Position::new(0, 1)));
    }

    #[test]
    fn full_board_has_no_fruit() {
        let grid = Grid::new(1);
        let snake = Snake::new(Position::new(0, 0));
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(place_fruit(&snake, &grid, &mut rng), None);
    }
}
