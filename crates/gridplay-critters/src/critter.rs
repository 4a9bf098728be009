//! Critter state and behavior.

use crate::view::View;
use gridplay_core::{Direction, EnergyConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a critter instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CritterId(pub Uuid);

impl CritterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CritterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CritterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Green,
    Blue,
    Orange,
    Red,
}

impl Species {
    pub fn name(&self) -> &'static str {
        match self {
            Species::Green => "green",
            Species::Blue => "blue",
            Species::Orange => "orange",
            Species::Red => "red",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a critter asks the world to do on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "direction", rename_all = "lowercase")]
pub enum Action {
    Move(Direction),
    Eat(Direction),
    Grow,
    Reproduce(Direction),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Move(_) => "move",
            Action::Eat(_) => "eat",
            Action::Grow => "grow",
            Action::Reproduce(_) => "reproduce",
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Action::Move(dir) | Action::Eat(dir) | Action::Reproduce(dir) => Some(*dir),
            Action::Grow => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CritterKind {
    /// Inert; never acts
    Wall,
    /// Moves straight until blocked, then picks a random open direction
    Bouncing { direction: Direction },
    /// Keeps a wall on its left hand
    WallFollower { dir: Direction },
    Plant,
    PlantEater,
}

/// An occupant of the critter grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Critter {
    pub id: CritterId,
    pub kind: CritterKind,
    /// Map character this critter was created from
    pub origin_char: char,
    /// Only plants and plant eaters carry energy
    pub energy: Option<f64>,
    pub species: Option<Species>,
}

impl Critter {
    fn with_kind(kind: CritterKind, origin_char: char) -> Self {
        Self {
            id: CritterId::new(),
            kind,
            origin_char,
            energy: None,
            species: None,
        }
    }

    pub fn wall(origin_char: char) -> Self {
        Self::with_kind(CritterKind::Wall, origin_char)
    }

    pub fn bouncing(origin_char: char, rng: &mut ChaCha8Rng) -> Self {
        let direction = *Direction::all()
            .choose(rng)
            .unwrap_or(&Direction::S);
        Self::with_kind(CritterKind::Bouncing { direction }, origin_char)
    }

    pub fn wall_follower(origin_char: char) -> Self {
        Self::with_kind(CritterKind::WallFollower { dir: Direction::S }, origin_char)
    }

    pub fn plant(origin_char: char, rng: &mut ChaCha8Rng, energy: &EnergyConfig) -> Self {
        let mut critter = Self::with_kind(CritterKind::Plant, origin_char);
        critter.energy = Some(energy.plant_min_energy + rng.gen::<f64>() * energy.plant_energy_spread);
        critter.species = Some(if rng.gen_bool(0.5) {
            Species::Green
        } else {
            Species::Blue
        });
        critter
    }

    pub fn plant_eater(origin_char: char, rng: &mut ChaCha8Rng, energy: &EnergyConfig) -> Self {
        let mut critter = Self::with_kind(CritterKind::PlantEater, origin_char);
        critter.energy = Some(energy.plant_eater_energy);
        critter.species = Some(if rng.gen_bool(0.5) {
            Species::Orange
        } else {
            Species::Red
        });
        critter
    }

    /// Whether the world should give this critter a turn
    pub fn can_act(&self) -> bool {
        !matches!(self.kind, CritterKind::Wall)
    }

    pub fn has_energy(&self) -> bool {
        self.energy.is_some()
    }

    /// Energy-bearing critter that has run out
    pub fn is_depleted(&self) -> bool {
        matches!(self.energy, Some(e) if e <= 0.0)
    }

    pub fn add_energy(&mut self, amount: f64) {
        if let Some(energy) = self.energy.as_mut() {
            *energy += amount;
        }
    }

    /// Decide what to do given the surroundings
    pub fn act(
        &mut self,
        view: &View<'_>,
        rng: &mut ChaCha8Rng,
        config: &EnergyConfig,
    ) -> Option<Action> {
        let energy = self.energy.unwrap_or(0.0);
        match &mut self.kind {
            CritterKind::Wall => None,

            CritterKind::Bouncing { direction } => {
                if view.look(*direction) != ' ' {
                    *direction = view.find(' ', rng).unwrap_or(Direction::S);
                }
                Some(Action::Move(*direction))
            }

            CritterKind::WallFollower { dir } => {
                let mut start = *dir;
                if view.look(dir.rotate(-3)) != ' ' {
                    *dir = dir.rotate(-2);
                    start = *dir;
                }
                while view.look(*dir) != ' ' {
                    *dir = dir.rotate(1);
                    if *dir == start {
                        break;
                    }
                }
                Some(Action::Move(*dir))
            }

            CritterKind::Plant => {
                if energy > config.plant_reproduce_threshold {
                    if let Some(space) = view.find(' ', rng) {
                        return Some(Action::Reproduce(space));
                    }
                }
                (energy < config.plant_grow_ceiling).then_some(Action::Grow)
            }

            CritterKind::PlantEater => {
                let space = view.find(' ', rng);
                if energy > config.plant_eater_reproduce_threshold {
                    if let Some(space) = space {
                        return Some(Action::Reproduce(space));
                    }
                }
                if let Some(plant) = view.find('*', rng) {
                    return Some(Action::Eat(plant));
                }
                space.map(Action::Move)
            }
        }
    }
}
