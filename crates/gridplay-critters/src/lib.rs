//! Critter world simulation.
//!
//! A small ecosystem on a 2D grid: walls, bouncing critters, wall followers,
//! plants and plant eaters take turns acting on what they see around them.

pub mod grid;
pub mod critter;
pub mod legend;
pub mod view;
pub mod world;
pub mod plans;
pub mod census;
pub mod render;

pub use grid::Grid;
pub use critter::{Action, Critter, CritterId, CritterKind, Species};
pub use legend::{Legend, Template};
pub use view::View;
pub use world::{TurnStats, World};
pub use census::Census;
