//! Configuration types for the painter and the critter world.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Read a JSON config file; missing fields fall back to their defaults.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&text)?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Color diffusion painter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// Width of the canvas in cells
    pub width: i32,
    /// Height of the canvas in cells
    pub height: i32,
    /// Quantization steps per RGB channel
    pub levels: u32,
    /// Seed cell; `None` picks the center
    pub start: Option<(i32, i32)>,
    /// Pixel size of one cell in rendered images
    pub cell_size: u32,
    /// Sort the shuffled palette by hue before painting
    pub sort_by_hue: bool,
    /// Random seed for the palette shuffle
    pub seed: u64,
    /// Dump a replay frame every this many placements
    pub frame_every: Option<usize>,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 128,
            levels: 32,
            start: None,
            cell_size: 4,
            sort_by_hue: false,
            seed: 0,
            frame_every: None,
        }
    }
}

impl PainterConfig {
    /// Start cell, defaulting to the middle of the canvas
    pub fn start_cell(&self) -> (i32, i32) {
        self.start.unwrap_or((self.width / 2, self.height / 2))
    }

    /// Number of distinct palette colors
    pub fn palette_size(&self) -> usize {
        (self.levels as usize).pow(3)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::Validation(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.levels == 0 || self.levels > 256 {
            return Err(Error::Validation(format!(
                "levels must be in 1..=256, got {}",
                self.levels
            )));
        }
        if self.cell_size == 0 {
            return Err(Error::Validation("cell_size must be positive".to_string()));
        }
        // canvas cells and the RGB image buffer must both be addressable
        let cells = self.width.checked_mul(self.height);
        let image_bytes = (self.width as u32)
            .checked_mul(self.cell_size)
            .zip((self.height as u32).checked_mul(self.cell_size))
            .and_then(|(w, h)| (w as usize).checked_mul(h as usize))
            .and_then(|pixels| pixels.checked_mul(3));
        if cells.is_none() || image_bytes.is_none() {
            return Err(Error::Validation(format!(
                "{}x{} canvas at cell size {} is too large",
                self.width, self.height, self.cell_size
            )));
        }
        if self.frame_every == Some(0) {
            return Err(Error::Validation("frame_every must be positive".to_string()));
        }
        let (x, y) = self.start_cell();
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Err(Error::Validation(format!(
                "start cell ({x}, {y}) is outside the {}x{} canvas",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Which turn-resolution rules a critter world follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulesKind {
    /// Only moves, no energy bookkeeping
    Basic,
    /// Energy-driven grow/move/eat/reproduce
    Lifelike,
}

/// Which built-in legend maps characters to critters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendKind {
    /// `#` wall, `~` wall follower, `o` bouncer
    Basic,
    /// `#` wall, `o` plant eater, `*` plant
    Lifelike,
}

macro_rules! lowercase_enum_str {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($ty::$variant => f.write_str($name),)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(Error::Validation(format!(
                        "unknown {} '{}'",
                        stringify!($ty),
                        other
                    ))),
                }
            }
        }
    };
}

lowercase_enum_str!(RulesKind { Basic => "basic", Lifelike => "lifelike" });
lowercase_enum_str!(LegendKind { Basic => "basic", Lifelike => "lifelike" });

/// Energy economy of the lifelike rules and of the energy-bearing critters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Energy spent per successful move
    pub move_cost: f64,
    /// A critter must hold more than this to move
    pub min_move_energy: f64,
    /// Charged when a critter's action is not carried out
    pub idle_penalty: f64,
    /// Gained per grow action
    pub grow_gain: f64,
    /// Parent pays this many times the newborn's energy
    pub reproduce_cost_factor: f64,
    /// Plants reproduce above this energy
    pub plant_reproduce_threshold: f64,
    /// Plants stop growing at this energy
    pub plant_grow_ceiling: f64,
    /// Lower bound of a new plant's energy
    pub plant_min_energy: f64,
    /// Width of the random range added to `plant_min_energy`
    pub plant_energy_spread: f64,
    /// Energy of a new plant eater
    pub plant_eater_energy: f64,
    /// Plant eaters reproduce above this energy
    pub plant_eater_reproduce_threshold: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            move_cost: 1.0,
            min_move_energy: 1.0,
            idle_penalty: 0.2,
            grow_gain: 0.5,
            reproduce_cost_factor: 2.0,
            plant_reproduce_threshold: 15.0,
            plant_grow_ceiling: 20.0,
            plant_min_energy: 3.0,
            plant_energy_spread: 4.0,
            plant_eater_energy: 20.0,
            plant_eater_reproduce_threshold: 60.0,
        }
    }
}

/// Critter world run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CritterConfig {
    /// Name of a built-in plan (`plan1`, `plan2`, `plan3`)
    pub plan: String,
    /// Path to a text map; overrides `plan` when set
    pub map_path: Option<String>,
    pub legend: LegendKind,
    pub rules: RulesKind,
    /// Number of turns to run; `None` runs until interrupted
    pub turns: Option<u64>,
    /// Milliseconds between turns
    pub interval_ms: u64,
    /// Random seed for critter decisions and species
    pub seed: u64,
    /// Log a population census every this many turns
    pub census_every: u64,
    pub energy: EnergyConfig,
}

impl Default for CritterConfig {
    fn default() -> Self {
        Self {
            plan: "plan3".to_string(),
            map_path: None,
            legend: LegendKind::Lifelike,
            rules: RulesKind::Lifelike,
            turns: None,
            interval_ms: 200,
            seed: 0,
            census_every: 50,
            energy: EnergyConfig::default(),
        }
    }
}

impl CritterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.census_every == 0 {
            return Err(Error::Validation("census_every must be positive".to_string()));
        }
        let e = &self.energy;
        if e.plant_energy_spread < 0.0 || e.plant_min_energy <= 0.0 {
            return Err(Error::Validation(
                "plants must start with positive energy".to_string(),
            ));
        }
        if e.plant_eater_energy <= 0.0 {
            return Err(Error::Validation(
                "plant eaters must start with positive energy".to_string(),
            ));
        }
        Ok(())
    }
}
