//! A critter's view of its eight surrounding cells.

use crate::critter::Critter;
use crate::grid::Grid;
use gridplay_core::{Direction, Vector};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Character shown for an empty cell
pub const EMPTY_CHAR: char = ' ';
/// Character shown for anything outside the grid
pub const EDGE_CHAR: char = '#';

/// Map character of a cell's occupant
pub fn char_from_element(element: Option<&Critter>) -> char {
    element.map_or(EMPTY_CHAR, |critter| critter.origin_char)
}

pub struct View<'a> {
    grid: &'a Grid<Critter>,
    origin: Vector,
}

impl<'a> View<'a> {
    pub fn new(grid: &'a Grid<Critter>, origin: Vector) -> Self {
        Self { grid, origin }
    }

    pub fn origin(&self) -> Vector {
        self.origin
    }

    /// Character one step away in `dir`; the grid edge looks like a wall.
    pub fn look(&self, dir: Direction) -> char {
        let target = self.origin.plus(dir.delta());
        if self.grid.is_inside(target) {
            char_from_element(self.grid.get(target))
        } else {
            EDGE_CHAR
        }
    }

    /// Every direction showing `ch`, in compass order
    pub fn find_all(&self, ch: char) -> Vec<Direction> {
        Direction::all()
            .into_iter()
            .filter(|&dir| self.look(dir) == ch)
            .collect()
    }

    /// A random direction showing `ch`
    pub fn find(&self, ch: char, rng: &mut ChaCha8Rng) -> Option<Direction> {
        self.find_all(ch).choose(rng).copied()
    }
}
