use std::collections::VecDeque;

use rand::Rng;

use crate::grid::Position;
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stop,
}

impl Direction {
    /// Unit step on the board; `Stop` does not move.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
            Stop => (0, 0),
        }
    }

    /// True when `other` would turn the snake straight back onto itself.
    pub fn is_reverse_of(self, other: Direction) -> bool {
        if self == Stop || other == Stop {
            return false;
        }

        let (a, b) = (self.delta(), other.delta());
        a.0 + b.0 == 0 && a.1 + b.1 == 0
    }
}

/// Body segments, head first.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    pub fn new(head: Position) -> Self {
        let mut body = VecDeque::new();
        body.push_front(head);
        Snake { body }
    }

    /// Builds a snake from explicit segments, head first.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    pub fn from_segments<I: IntoIterator<Item = Position>>(segments: I) -> Self {
        let body: VecDeque<_> = segments.into_iter().collect();
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Snake { body }
    }

    /// Single-segment snake somewhere inside the inclusive box.
    pub fn spawn<R: Rng + ?Sized>(left_top: Position, right_bottom: Position, rng: &mut R) -> Self {
        let x = rng.gen_range(left_top.x..=right_bottom.x);
        let y = rng.gen_range(left_top.y..=right_bottom.y);
        Snake::new(Position::new(x, y))
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.body.iter().copied().collect()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// True if `pos` lies on any segment except the head.
    pub fn body_occupies(&self, pos: Position) -> bool {
        self.body.iter().skip(1).any(|&segment| segment == pos)
    }

    /// Moves the head to `new_head`. With `grow == 0` the tail follows; otherwise
    /// the tail stays put and `grow` segments pile up on the new head cell.
    pub fn advance(&mut self, new_head: Position, grow: u32) {
        if grow == 0 {
            self.body.push_front(new_head);
            self.body.pop_back();
            return;
        }

        for _ in 0..grow {
            self.body.push_front(new_head);
        }
    }

    /// Drops the tail, but never the last remaining segment.
    pub fn shrink_one_if_longer(&mut self) -> bool {
        if self.body.len() > 1 {
            self.body.pop_back();
            true
        } else {
            false
        }
    }
}
