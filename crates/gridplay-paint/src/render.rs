//! Rasterizing a painting into an RGB image.

use crate::canvas::Canvas;
use crate::mapper::{ColorMapper, Placement};
use gridplay_core::{Error, Result};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn blank(canvas: &Canvas, cell_size: u32) -> RgbImage {
    RgbImage::new(canvas.width as u32 * cell_size, canvas.height as u32 * cell_size)
}

fn fill_cell(image: &mut RgbImage, placement: &Placement, cell_size: u32) {
    let pixel = Rgb(placement.color.to_rgb());
    let x0 = placement.x as u32 * cell_size;
    let y0 = placement.y as u32 * cell_size;
    for y in y0..y0 + cell_size {
        for x in x0..x0 + cell_size {
            image.put_pixel(x, y, pixel);
        }
    }
}

/// The whole painting; unpainted cells stay black.
pub fn render(mapper: &ColorMapper, cell_size: u32) -> RgbImage {
    render_prefix(mapper, mapper.colored_cells().len(), cell_size)
}

/// The painting as it looked after the first `count` placements.
pub fn render_prefix(mapper: &ColorMapper, count: usize, cell_size: u32) -> RgbImage {
    let mut image = blank(mapper.canvas(), cell_size);
    for placement in mapper.placements().take(count) {
        fill_cell(&mut image, &placement, cell_size);
    }
    image
}

pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| Error::Image(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), "Saved image");
    Ok(())
}

/// Replays a finished painting placement by placement onto one image.
pub struct Replay<'a> {
    mapper: &'a ColorMapper,
    image: RgbImage,
    shown: usize,
    cell_size: u32,
}

impl<'a> Replay<'a> {
    pub fn new(mapper: &'a ColorMapper, cell_size: u32) -> Self {
        Self {
            mapper,
            image: blank(mapper.canvas(), cell_size),
            shown: 0,
            cell_size,
        }
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.mapper.colored_cells().len()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Paint up to `batch` more placements; returns how many were painted.
    pub fn advance(&mut self, batch: usize) -> usize {
        let mut painted = 0;
        for placement in self.mapper.placements_from(self.shown).take(batch) {
            fill_cell(&mut self.image, &placement, self.cell_size);
            painted += 1;
        }
        self.shown += painted;
        painted
    }

    /// Write a numbered frame every `every` placements into `dir`,
    /// finishing with the complete painting.
    pub fn write_frames(mut self, dir: impl AsRef<Path>, every: usize) -> Result<Vec<PathBuf>> {
        if every == 0 {
            return Err(Error::Validation("frame interval must be positive".to_string()));
        }
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut frames = Vec::new();
        while !self.is_done() {
            self.advance(every);
            let path = dir.join(format!("frame_{:06}.png", self.shown));
            save_png(&self.image, &path)?;
            frames.push(path);
        }

        info!(frames = frames.len(), dir = %dir.display(), "Wrote replay frames");
        Ok(frames)
    }
}
