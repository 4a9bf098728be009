//! Cell grid being painted, with its boundary of paintable cells.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub empty: bool,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            color: Color::BLACK,
            empty: true,
        }
    }

    pub fn change_color(&mut self, color: Color) {
        self.color = color;
        self.empty = false;
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

/// A fixed-size grid of cells.
///
/// `boundary` holds the empty cells that touch at least one painted cell,
/// in the order they became paintable.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
    boundary: Vec<usize>,
    on_boundary: Vec<bool>,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        let mut cells = Vec::with_capacity(size);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(x, y));
            }
        }

        Self {
            width,
            height,
            cells,
            boundary: Vec::new(),
            on_boundary: vec![false; size],
        }
    }

    pub fn in_grid(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Flat index of `(x, y)`, if inside the grid
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_grid(x, y).then(|| (y * self.width + x) as usize)
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn painted_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.empty).count()
    }

    pub fn paint(&mut self, index: usize, color: Color) {
        self.cells[index].change_color(color);
    }

    /// Indices of the 3x3 block around `index`, the cell itself included,
    /// clipped to the grid and scanned row by row.
    fn block(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let x = self.cells[index].x;
        let y = self.cells[index].y;
        (y - 1..=y + 1)
            .flat_map(move |j| (x - 1..=x + 1).map(move |i| (i, j)))
            .filter_map(move |(i, j)| self.index(i, j))
    }

    /// Neighbors of `index` (itself excluded) whose emptiness equals `empty`
    pub fn neighbors(&self, index: usize, empty: bool) -> Vec<usize> {
        self.block(index)
            .filter(|&n| n != index && self.cells[n].empty == empty)
            .collect()
    }

    pub fn empty_neighbors(&self, index: usize) -> Vec<usize> {
        self.neighbors(index, true)
    }

    pub fn occupied_neighbors(&self, index: usize) -> Vec<usize> {
        self.neighbors(index, false)
    }

    /// Whether any cell of the 3x3 block around `index` matches `empty`
    pub fn has_neighbors(&self, index: usize, empty: bool) -> bool {
        self.block(index).any(|n| self.cells[n].empty == empty)
    }

    pub fn has_empty_neighbors(&self, index: usize) -> bool {
        self.has_neighbors(index, true)
    }

    pub fn has_occupied_neighbors(&self, index: usize) -> bool {
        self.has_neighbors(index, false)
    }

    pub fn boundary(&self) -> &[usize] {
        &self.boundary
    }

    pub fn is_boundary(&self, index: usize) -> bool {
        self.on_boundary[index]
    }

    /// Replace the boundary with the given cells, skipping painted ones and
    /// repeats.
    pub fn set_boundary(&mut self, cells: impl IntoIterator<Item = usize>) {
        for &i in &self.boundary {
            self.on_boundary[i] = false;
        }
        self.boundary.clear();
        for i in cells {
            self.push_boundary(i);
        }
    }

    /// Rebuild the boundary from scratch in row-major order
    pub fn compute_boundary(&mut self) {
        let boundary: Vec<usize> = (0..self.cells.len())
            .filter(|&i| self.cells[i].empty && self.has_occupied_neighbors(i))
            .collect();
        self.set_boundary(boundary);
    }

    /// Incrementally update the boundary after `painted` received a color.
    ///
    /// `painted` leaves the boundary. Each of its empty neighbors joins unless
    /// some other painted cell already touches it, in which case it is on
    /// the boundary already.
    pub fn update_boundary(&mut self, painted: usize) {
        if self.on_boundary[painted] {
            if let Some(pos) = self.boundary.iter().position(|&i| i == painted) {
                self.boundary.remove(pos);
            }
            self.on_boundary[painted] = false;
        }

        for neighbor in self.empty_neighbors(painted) {
            let touches_other = self
                .block(neighbor)
                .any(|n| n != painted && !self.cells[n].empty);
            if !touches_other {
                self.push_boundary(neighbor);
            }
        }
    }

    fn push_boundary(&mut self, index: usize) {
        if self.cells[index].empty && !self.on_boundary[index] {
            self.on_boundary[index] = true;
            self.boundary.push(index);
        }
    }
}
