//! Bounded 2D grid with at most one occupant per cell.

use gridplay_core::Vector;
use serde::{Deserialize, Serialize};

/// A flat row-major grid of optional occupants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid<T> {
    pub width: i32,
    pub height: i32,
    space: Vec<Option<T>>,
}

impl<T> Grid<T> {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        let mut space = Vec::with_capacity(size);
        space.resize_with(size, || None);
        Self {
            width,
            height,
            space,
        }
    }

    pub fn is_inside(&self, pos: Vector) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Vector) -> Option<usize> {
        self.is_inside(pos)
            .then(|| (pos.x + self.width * pos.y) as usize)
    }

    /// Occupant at `pos`; `None` when empty or outside the grid
    pub fn get(&self, pos: Vector) -> Option<&T> {
        self.index(pos).and_then(|i| self.space[i].as_ref())
    }

    pub fn get_mut(&mut self, pos: Vector) -> Option<&mut T> {
        self.index(pos).and_then(move |i| self.space[i].as_mut())
    }

    pub fn is_empty_at(&self, pos: Vector) -> bool {
        self.is_inside(pos) && self.get(pos).is_none()
    }

    /// Replace the occupant at `pos`. Writes outside the grid are ignored.
    pub fn set(&mut self, pos: Vector, value: Option<T>) {
        if let Some(i) = self.index(pos) {
            self.space[i] = value;
        }
    }

    /// Remove and return the occupant at `pos`
    pub fn take(&mut self, pos: Vector) -> Option<T> {
        self.index(pos).and_then(|i| self.space[i].take())
    }

    fn index_to_pos(&self, index: usize) -> Vector {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Vector::new(x, y)
    }

    /// Iterator over all positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        (0..self.space.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over occupied cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Vector, &T)> + '_ {
        self.space
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|v| (self.index_to_pos(i), v)))
    }

    pub fn occupied(&self) -> usize {
        self.space.iter().filter(|cell| cell.is_some()).count()
    }
}
