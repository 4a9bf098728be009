//! Color diffusion painter.
//!
//! Colors from a shuffled, quantized RGB palette are placed one at a time on
//! the boundary of the painted region, each at the spot whose painted
//! neighbors are closest to it in color.

pub mod color;
pub mod palette;
pub mod canvas;
pub mod mapper;
pub mod render;

pub use color::Color;
pub use palette::Palette;
pub use canvas::{Canvas, Cell};
pub use mapper::{ColorMapper, PaintSummary, Placement};
pub use render::{render, render_prefix, save_png, Replay};
