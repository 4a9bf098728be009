//! Terminal rendering of a critter world.

use crate::critter::Species;
use crate::view::char_from_element;
use crate::world::World;
use crossterm::style::{Color, Stylize};
use gridplay_core::Vector;
use std::fmt::Write;

pub fn species_color(species: Species) -> Color {
    match species {
        Species::Green => Color::Green,
        Species::Blue => Color::Blue,
        Species::Orange => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        Species::Red => Color::Red,
    }
}

/// The map with every critter that has a species drawn in its color
pub fn render_colored(world: &World) -> String {
    let grid = world.grid();
    let mut out = String::with_capacity(((grid.width + 1) * grid.height) as usize * 4);
    for y in 0..grid.height {
        for x in 0..grid.width {
            let element = grid.get(Vector::new(x, y));
            let ch = char_from_element(element);
            match element.and_then(|critter| critter.species) {
                Some(species) => {
                    let _ = write!(out, "{}", ch.with(species_color(species)));
                }
                None => out.push(ch),
            }
        }
        out.push('\n');
    }
    out
}

/// One-line status shown under the map
pub fn status_line(world: &World) -> String {
    let census = world.census();
    let mut line = format!("turn {:>5}  actors {:>4}", census.turn, census.actors);
    for (species, count) in &census.by_species {
        let _ = write!(line, "  {species} {count:>3}");
    }
    if census.living() > 0 {
        let _ = write!(line, "  avg energy {:.1}", census.avg_energy());
    }
    line
}
