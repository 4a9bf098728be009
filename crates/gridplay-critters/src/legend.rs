//! Mapping from map characters to the critters they create.

use crate::critter::Critter;
use crate::view::EMPTY_CHAR;
use gridplay_core::{EnergyConfig, Error, LegendKind, Result};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which kind of critter a legend entry builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    Wall,
    BouncingCritter,
    WallFollower,
    Plant,
    PlantEater,
}

impl Template {
    pub fn spawn(&self, ch: char, rng: &mut ChaCha8Rng, energy: &EnergyConfig) -> Critter {
        match self {
            Template::Wall => Critter::wall(ch),
            Template::BouncingCritter => Critter::bouncing(ch, rng),
            Template::WallFollower => Critter::wall_follower(ch),
            Template::Plant => Critter::plant(ch, rng, energy),
            Template::PlantEater => Critter::plant_eater(ch, rng, energy),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Legend {
    entries: BTreeMap<char, Template>,
}

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    /// `#` wall, `~` wall follower, `o` bouncing critter
    pub fn basic() -> Self {
        Self::new()
            .with('#', Template::Wall)
            .with('~', Template::WallFollower)
            .with('o', Template::BouncingCritter)
    }

    /// `#` wall, `o` plant eater, `*` plant
    pub fn lifelike() -> Self {
        Self::new()
            .with('#', Template::Wall)
            .with('o', Template::PlantEater)
            .with('*', Template::Plant)
    }

    pub fn from_kind(kind: LegendKind) -> Self {
        match kind {
            LegendKind::Basic => Self::basic(),
            LegendKind::Lifelike => Self::lifelike(),
        }
    }

    pub fn with(mut self, ch: char, template: Template) -> Self {
        self.entries.insert(ch, template);
        self
    }

    pub fn get(&self, ch: char) -> Option<Template> {
        self.entries.get(&ch).copied()
    }

    pub fn contains(&self, ch: char) -> bool {
        ch == EMPTY_CHAR || self.entries.contains_key(&ch)
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.keys().copied()
    }

    /// Build the occupant for a map character; a space is an empty cell.
    pub fn element_from_char(
        &self,
        ch: char,
        rng: &mut ChaCha8Rng,
        energy: &EnergyConfig,
    ) -> Result<Option<Critter>> {
        if ch == EMPTY_CHAR {
            return Ok(None);
        }
        let template = self
            .get(ch)
            .ok_or_else(|| Error::Validation(format!("no legend entry for '{ch}'")))?;
        Ok(Some(template.spawn(ch, rng, energy)))
    }
}
