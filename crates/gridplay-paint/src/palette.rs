//! Quantized RGB palette consumed front to back by the painter.

use crate::color::Color;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Palette {
    colors: VecDeque<Color>,
}

impl Palette {
    /// Every color whose channels are multiples of `256 / levels`, in
    /// r-major order.
    pub fn ordered(levels: u32) -> Self {
        let step = 256 / levels;
        let mut colors = VecDeque::with_capacity((levels as usize).pow(3));
        for i in 0..levels {
            for j in 0..levels {
                for k in 0..levels {
                    colors.push_back(Color::new(
                        (i * step) as u8,
                        (j * step) as u8,
                        (k * step) as u8,
                    ));
                }
            }
        }
        Self { colors }
    }

    /// The full palette in random order
    pub fn shuffled(levels: u32, rng: &mut ChaCha8Rng) -> Self {
        let mut palette = Self::ordered(levels);
        palette.colors.make_contiguous().shuffle(rng);
        palette
    }

    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
        }
    }

    /// Stable sort by hue, keeping the shuffled order among equal hues
    pub fn sort_by_hue(&mut self) {
        self.colors
            .make_contiguous()
            .sort_by(|a, b| a.hue().total_cmp(&b.hue()));
        tracing::debug!(colors = self.colors.len(), "Sorted palette by hue");
    }

    /// Take the next color off the front
    pub fn next_color(&mut self) -> Option<Color> {
        self.colors.pop_front()
    }

    pub fn peek(&self) -> Option<&Color> {
        self.colors.front()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> + '_ {
        self.colors.iter()
    }
}
