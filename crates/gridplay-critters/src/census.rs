//! Population counts for a critter world.

use crate::critter::{Critter, Species};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    pub turn: u64,
    /// Occupants per map character, walls included
    pub by_char: BTreeMap<char, usize>,
    /// Energy-bearing critters per species
    pub by_species: BTreeMap<Species, usize>,
    /// Critters that take turns
    pub actors: usize,
    pub total_energy: f64,
    pub min_energy: Option<f64>,
    pub max_energy: Option<f64>,
}

impl Census {
    pub fn take(grid: &Grid<Critter>, turn: u64) -> Self {
        let mut census = Census {
            turn,
            ..Default::default()
        };

        for (_, critter) in grid.iter() {
            *census.by_char.entry(critter.origin_char).or_insert(0) += 1;
            if critter.can_act() {
                census.actors += 1;
            }
            if let Some(species) = critter.species {
                *census.by_species.entry(species).or_insert(0) += 1;
            }
            if let Some(energy) = critter.energy {
                census.total_energy += energy;
                census.min_energy = Some(census.min_energy.map_or(energy, |m| m.min(energy)));
                census.max_energy = Some(census.max_energy.map_or(energy, |m| m.max(energy)));
            }
        }

        census
    }

    pub fn count(&self, ch: char) -> usize {
        self.by_char.get(&ch).copied().unwrap_or(0)
    }

    pub fn species(&self, species: Species) -> usize {
        self.by_species.get(&species).copied().unwrap_or(0)
    }

    /// Number of critters carrying energy
    pub fn living(&self) -> usize {
        self.by_species.values().sum()
    }

    pub fn avg_energy(&self) -> f64 {
        match self.living() {
            0 => 0.0,
            n => self.total_energy / n as f64,
        }
    }
}
