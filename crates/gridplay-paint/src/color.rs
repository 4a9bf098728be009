//! RGB colors.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn max(&self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    pub fn min(&self) -> u8 {
        self.r.min(self.g).min(self.b)
    }

    /// Squared Euclidean distance in RGB space
    pub fn distance(&self, other: &Color) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Hue as a sector position in `[0, 6)`; greys have hue 0.
    pub fn hue(&self) -> f64 {
        let max = self.max();
        let chroma = (max - self.min()) as f64;
        if chroma == 0.0 {
            return 0.0;
        }

        let (r, g, b) = (self.r as f64, self.g as f64, self.b as f64);
        if max == self.r {
            ((g - b) / chroma).rem_euclid(6.0)
        } else if max == self.g {
            (b - r) / chroma + 2.0
        } else {
            (r - g) / chroma + 4.0
        }
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}
