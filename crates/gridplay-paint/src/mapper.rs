//! Greedy placement of palette colors on the canvas boundary.

use crate::canvas::Canvas;
use crate::color::Color;
use crate::palette::Palette;
use gridplay_core::{Error, PainterConfig, Result};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// One colored cell, in the order it was painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintSummary {
    pub placed: usize,
    pub cells: usize,
    pub palette_left: usize,
    pub boundary_left: usize,
}

pub struct ColorMapper {
    canvas: Canvas,
    palette: Palette,
    colored: Vec<usize>,
    start: (i32, i32),
}

impl ColorMapper {
    pub fn new(config: &PainterConfig, rng: &mut ChaCha8Rng) -> Result<Self> {
        config.validate()?;

        let mut palette = Palette::shuffled(config.levels, rng);
        if config.sort_by_hue {
            palette.sort_by_hue();
        }

        debug!(
            width = config.width,
            height = config.height,
            palette = palette.len(),
            "Created color mapper"
        );

        Ok(Self::with_palette(
            Canvas::new(config.width, config.height),
            palette,
            config.start_cell(),
        ))
    }

    pub fn with_palette(canvas: Canvas, palette: Palette, start: (i32, i32)) -> Self {
        Self {
            canvas,
            palette,
            colored: Vec::new(),
            start,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Painted cell indices in placement order
    pub fn colored_cells(&self) -> &[usize] {
        &self.colored
    }

    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.placements_from(0)
    }

    /// Placements from the `start`-th one onward
    pub fn placements_from(&self, start: usize) -> impl Iterator<Item = Placement> + '_ {
        let start = start.min(self.colored.len());
        self.colored[start..].iter().map(|&i| {
            let cell = self.canvas.cell_at(i);
            Placement {
                x: cell.x,
                y: cell.y,
                color: cell.color,
            }
        })
    }

    pub fn is_seeded(&self) -> bool {
        !self.colored.is_empty()
    }

    pub fn choose_color(&mut self) -> Option<Color> {
        self.palette.next_color()
    }

    /// Mean squared color distance from `color` to the given cells' colors;
    /// `None` when there are no cells to compare against.
    pub fn average_color_distance(&self, color: &Color, cells: &[usize]) -> Option<f64> {
        if cells.is_empty() {
            return None;
        }
        let sum: u64 = cells
            .iter()
            .map(|&i| color.distance(&self.canvas.cell_at(i).color) as u64)
            .sum();
        Some(sum as f64 / cells.len() as f64)
    }

    /// Boundary cell whose painted neighbors are closest to `color`.
    /// The earliest boundary cell wins ties.
    pub fn best_cell(&self, color: &Color) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &cell in self.canvas.boundary() {
            let neighbors = self.canvas.occupied_neighbors(cell);
            let Some(dist) = self.average_color_distance(color, &neighbors) else {
                continue;
            };
            match best {
                Some((_, min)) if dist >= min => {}
                _ => best = Some((cell, dist)),
            }
        }
        best.map(|(cell, _)| cell)
    }

    fn color_cell(&mut self, index: usize, color: Color) {
        self.canvas.paint(index, color);
        self.colored.push(index);
    }

    /// Paint the start cell with the first palette color and make its
    /// neighbors the boundary.
    pub fn seed(&mut self, x: i32, y: i32) -> Result<()> {
        if self.is_seeded() {
            return Err(Error::InvalidState("canvas already seeded".to_string()));
        }
        let index = self.canvas.index(x, y).ok_or_else(|| {
            Error::Validation(format!("start cell ({x}, {y}) is outside the canvas"))
        })?;
        let color = self
            .choose_color()
            .ok_or_else(|| Error::InvalidState("palette is empty".to_string()))?;

        self.color_cell(index, color);
        let boundary = self.canvas.empty_neighbors(index);
        self.canvas.set_boundary(boundary);
        debug!(x, y, %color, "Seeded canvas");
        Ok(())
    }

    /// Place the next palette color; `None` once the palette or the
    /// boundary runs out.
    pub fn color_next_cell(&mut self) -> Option<Placement> {
        if self.canvas.boundary().is_empty() {
            return None;
        }
        let color = self.choose_color()?;
        let index = self.best_cell(&color)?;

        self.color_cell(index, color);
        self.canvas.update_boundary(index);

        let cell = self.canvas.cell_at(index);
        Some(Placement {
            x: cell.x,
            y: cell.y,
            color,
        })
    }

    /// Seed at the configured start if needed, then paint until exhausted.
    #[instrument(skip(self), fields(cells = self.canvas.len(), palette = self.palette.len()))]
    pub fn paint_all(&mut self) -> Result<PaintSummary> {
        if !self.is_seeded() {
            let (x, y) = self.start;
            self.seed(x, y)?;
        }

        let report_every = (self.canvas.len() / 10).max(1);
        while self.color_next_cell().is_some() {
            if self.colored.len() % report_every == 0 {
                debug!(
                    placed = self.colored.len(),
                    boundary = self.canvas.boundary().len(),
                    "Painting progress"
                );
            }
        }

        let summary = self.summary();
        info!(
            placed = summary.placed,
            cells = summary.cells,
            palette_left = summary.palette_left,
            boundary_left = summary.boundary_left,
            "Painting complete"
        );
        Ok(summary)
    }

    pub fn summary(&self) -> PaintSummary {
        PaintSummary {
            placed: self.colored.len(),
            cells: self.canvas.len(),
            palette_left: self.palette.len(),
            boundary_left: self.canvas.boundary().len(),
        }
    }
}
