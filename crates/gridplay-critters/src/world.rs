//! Turn-based world engine for the critter grid.

use crate::census::Census;
use crate::critter::{Action, Critter, CritterId};
use crate::grid::Grid;
use crate::legend::Legend;
use crate::plans;
use crate::view::{char_from_element, View};
use gridplay_core::{CritterConfig, EnergyConfig, Error, Result, RulesKind, Vector};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, instrument, trace};

/// What happened during one turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStats {
    pub acted: u32,
    pub moved: u32,
    pub ate: u32,
    pub grew: u32,
    pub born: u32,
    pub died: u32,
    pub idle: u32,
}

impl TurnStats {
    fn absorb(&mut self, other: &TurnStats) {
        self.acted += other.acted;
        self.moved += other.moved;
        self.ate += other.ate;
        self.grew += other.grew;
        self.born += other.born;
        self.died += other.died;
        self.idle += other.idle;
    }
}

pub struct World {
    grid: Grid<Critter>,
    legend: Legend,
    rules: RulesKind,
    energy: EnergyConfig,
    map: Vec<String>,
    rng: ChaCha8Rng,
    turn: u64,
    totals: TurnStats,
}

impl World {
    /// Populate a world from map rows, one character per cell.
    pub fn from_map<S: AsRef<str>>(
        map: &[S],
        legend: Legend,
        rules: RulesKind,
        energy: EnergyConfig,
        mut rng: ChaCha8Rng,
    ) -> Result<Self> {
        let map: Vec<String> = map.iter().map(|row| row.as_ref().to_string()).collect();
        let grid = Self::populate(&map, &legend, &energy, &mut rng)?;
        info!(
            width = grid.width,
            height = grid.height,
            rules = %rules,
            critters = grid.occupied(),
            "Created world"
        );

        Ok(Self {
            grid,
            legend,
            rules,
            energy,
            map,
            rng,
            turn: 0,
            totals: TurnStats::default(),
        })
    }

    /// Build the world a run configuration describes
    pub fn from_config(config: &CritterConfig) -> Result<Self> {
        config.validate()?;
        let map = match &config.map_path {
            Some(path) => plans::load_map(path)?,
            None => plans::plan_by_name(&config.plan)?
                .iter()
                .map(|row| row.to_string())
                .collect(),
        };
        Self::from_map(
            &map,
            Legend::from_kind(config.legend),
            config.rules,
            config.energy.clone(),
            ChaCha8Rng::seed_from_u64(config.seed),
        )
    }

    fn populate(
        map: &[String],
        legend: &Legend,
        energy: &EnergyConfig,
        rng: &mut ChaCha8Rng,
    ) -> Result<Grid<Critter>> {
        let width = map
            .first()
            .map(|row| row.chars().count())
            .filter(|&w| w > 0)
            .ok_or_else(|| Error::Validation("map has no cells".to_string()))?;

        let mut grid = Grid::new(width as i32, map.len() as i32);
        for (y, row) in map.iter().enumerate() {
            let row_width = row.chars().count();
            if row_width != width {
                return Err(Error::Validation(format!(
                    "map row {y} is {row_width} wide, expected {width}"
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let element = legend
                    .element_from_char(ch, rng, energy)
                    .map_err(|e| match e {
                        Error::Validation(msg) => Error::Validation(format!("at ({x}, {y}): {msg}")),
                        other => other,
                    })?;
                grid.set(Vector::new(x as i32, y as i32), element);
            }
        }
        Ok(grid)
    }

    /// Repopulate from the starting map, keeping the random stream going
    pub fn reset(&mut self) -> Result<()> {
        self.grid = Self::populate(&self.map, &self.legend, &self.energy, &mut self.rng)?;
        self.turn = 0;
        self.totals = TurnStats::default();
        info!("World reset");
        Ok(())
    }

    pub fn grid(&self) -> &Grid<Critter> {
        &self.grid
    }

    pub fn rules(&self) -> RulesKind {
        self.rules
    }

    pub fn turn_count(&self) -> u64 {
        self.turn
    }

    pub fn totals(&self) -> &TurnStats {
        &self.totals
    }

    pub fn census(&self) -> Census {
        Census::take(&self.grid, self.turn)
    }

    /// Give every critter one action, in row-major order.
    ///
    /// A critter that moves forward in the scan order is not visited again.
    pub fn turn(&mut self) -> TurnStats {
        let mut acted: HashSet<CritterId> = HashSet::new();
        let mut stats = TurnStats::default();

        let positions: Vec<Vector> = self.grid.positions().collect();
        for pos in positions {
            let Some(critter) = self.grid.get(pos) else {
                continue;
            };
            if !critter.can_act() || !acted.insert(critter.id) {
                continue;
            }
            stats.acted += 1;
            self.let_act(pos, &mut stats);
        }

        self.turn += 1;
        self.totals.absorb(&stats);
        debug!(
            turn = self.turn,
            acted = stats.acted,
            moved = stats.moved,
            ate = stats.ate,
            born = stats.born,
            died = stats.died,
            "Turn complete"
        );
        stats
    }

    /// Run `turns` turns, logging a census every `census_every` of them.
    #[instrument(skip(self), fields(rules = %self.rules))]
    pub fn run(&mut self, turns: u64, census_every: u64) -> Census {
        for _ in 0..turns {
            self.turn();
            if census_every > 0 && self.turn % census_every == 0 {
                self.log_census();
            }
        }
        self.emit_summary();
        self.census()
    }

    pub fn log_census(&self) {
        let census = self.census();
        info!(
            event = "population_census",
            turn = census.turn,
            actors = census.actors,
            living = census.living(),
            plants = census.count('*'),
            avg_energy = format!("{:.2}", census.avg_energy()),
            "Population census"
        );
    }

    pub fn emit_summary(&self) {
        let census = self.census();
        info!(
            event = "run_summary",
            turns = self.turn,
            actors = census.actors,
            living = census.living(),
            births = self.totals.born,
            deaths = self.totals.died,
            meals = self.totals.ate,
            "Run complete"
        );
    }

    fn let_act(&mut self, pos: Vector, stats: &mut TurnStats) {
        let Some(mut critter) = self.grid.take(pos) else {
            return;
        };

        let action = {
            let view = View::new(&self.grid, pos);
            critter.act(&view, &mut self.rng, &self.energy)
        };
        trace!(critter = %critter.id, ?pos, ?action, "Critter acted");

        match self.rules {
            RulesKind::Basic => {
                let at = match action {
                    Some(Action::Move(dir)) => {
                        let dest = pos.plus(dir.delta());
                        if self.grid.is_empty_at(dest) {
                            stats.moved += 1;
                            dest
                        } else {
                            pos
                        }
                    }
                    _ => pos,
                };
                self.grid.set(at, Some(critter));
            }
            RulesKind::Lifelike => {
                let outcome = match action {
                    Some(action) => self.apply_lifelike(&mut critter, pos, action, stats),
                    None => None,
                };
                let at = match outcome {
                    Some(at) => at,
                    None => {
                        stats.idle += 1;
                        critter.add_energy(-self.energy.idle_penalty);
                        pos
                    }
                };

                if critter.is_depleted() {
                    stats.died += 1;
                    debug!(
                        critter = %critter.id,
                        kind = %critter.origin_char,
                        ?at,
                        "Critter ran out of energy"
                    );
                } else {
                    self.grid.set(at, Some(critter));
                }
            }
        }
    }

    /// Carry out `action` under the lifelike rules. Returns where the critter
    /// ends up, or `None` when the action could not be carried out.
    fn apply_lifelike(
        &mut self,
        critter: &mut Critter,
        pos: Vector,
        action: Action,
        stats: &mut TurnStats,
    ) -> Option<Vector> {
        let dest = action
            .direction()
            .map(|dir| pos.plus(dir.delta()))
            .filter(|&dest| self.grid.is_inside(dest));

        match action {
            Action::Grow => {
                critter.add_energy(self.energy.grow_gain);
                stats.grew += 1;
                Some(pos)
            }

            Action::Move(_) => {
                let dest = dest?;
                if critter.energy.is_some_and(|e| e <= self.energy.min_move_energy)
                    || self.grid.get(dest).is_some()
                {
                    return None;
                }
                critter.add_energy(-self.energy.move_cost);
                stats.moved += 1;
                Some(dest)
            }

            Action::Eat(_) => {
                let dest = dest?;
                let food = self.grid.get(dest)?.energy?;
                self.grid.set(dest, None);
                critter.add_energy(food);
                stats.ate += 1;
                stats.died += 1;
                Some(pos)
            }

            Action::Reproduce(_) => {
                let baby = self
                    .legend
                    .element_from_char(critter.origin_char, &mut self.rng, &self.energy)
                    .ok()
                    .flatten();
                let mut baby = baby?;
                let dest = dest?;
                let cost = self.energy.reproduce_cost_factor * baby.energy.unwrap_or(0.0);
                if critter.energy.map_or(true, |e| e <= cost) || self.grid.get(dest).is_some() {
                    return None;
                }
                critter.add_energy(-cost);
                baby.species = critter.species;
                trace!(parent = %critter.id, baby = %baby.id, ?dest, "Critter reproduced");
                self.grid.set(dest, Some(baby));
                stats.born += 1;
                Some(pos)
            }
        }
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.grid.height {
            let row: String = (0..self.grid.width)
                .map(|x| char_from_element(self.grid.get(Vector::new(x, y))))
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::critter::{CritterKind, Species};
    use gridplay_core::{Direction, LegendKind};

    fn world(map: &[&str], legend: Legend, rules: RulesKind) -> World {
        World::from_map(
            map,
            legend,
            rules,
            EnergyConfig::default(),
            ChaCha8Rng::seed_from_u64(42),
        )
        .unwrap()
    }

    fn critter_at(world: &World, x: i32, y: i32) -> Option<&Critter> {
        world.grid().get(Vector::new(x, y))
    }

    #[test]
    fn test_world_creation_round_trips_map() {
        let world = world(plans::PLAN1, Legend::basic(), RulesKind::Basic);
        let expected: String = plans::PLAN1.iter().map(|row| format!("{row}\n")).collect();
        assert_eq!(world.to_string(), expected);
        assert_eq!(world.grid().width, 28);
        assert_eq!(world.grid().height, 12);
    }

    #[test]
    fn test_from_map_rejects_bad_maps() {
        let ragged = World::from_map(
            &["###", "#"],
            Legend::basic(),
            RulesKind::Basic,
            EnergyConfig::default(),
            ChaCha8Rng::seed_from_u64(0),
        );
        assert!(matches!(ragged, Err(Error::Validation(_))));

        let unknown = World::from_map(
            &["#?#"],
            Legend::basic(),
            RulesKind::Basic,
            EnergyConfig::default(),
            ChaCha8Rng::seed_from_u64(0),
        );
        assert!(matches!(unknown, Err(Error::Validation(_))));

        let empty: [&str; 0] = [];
        let empty = World::from_map(
            &empty,
            Legend::basic(),
            RulesKind::Basic,
            EnergyConfig::default(),
            ChaCha8Rng::seed_from_u64(0),
        );
        assert!(empty.is_err());
    }

    #[test]
    fn test_from_config_default_plan() {
        let world = World::from_config(&CritterConfig::default()).unwrap();
        assert_eq!(world.rules(), RulesKind::Lifelike);
        assert_eq!(world.to_string().lines().next(), Some(plans::PLAN3[0]));
    }

    #[test]
    fn test_basic_turn_moves_each_critter_once() {
        let mut world = world(&["#####", "#o  #", "#####"], Legend::basic(), RulesKind::Basic);
        if let Some(critter) = world.grid.get_mut(Vector::new(1, 1)) {
            critter.kind = CritterKind::Bouncing {
                direction: Direction::E,
            };
        }

        let stats = world.turn();
        assert_eq!(stats.acted, 1);
        assert_eq!(stats.moved, 1);
        assert_eq!(world.to_string(), "#####\n# o #\n#####\n");
    }

    #[test]
    fn test_walls_never_move() {
        let mut world = world(plans::PLAN2, Legend::basic(), RulesKind::Basic);
        let walls_before: Vec<Vector> = world
            .grid()
            .iter()
            .filter(|(_, c)| c.origin_char == '#')
            .map(|(p, _)| p)
            .collect();
        for _ in 0..30 {
            world.turn();
        }
        let walls_after: Vec<Vector> = world
            .grid()
            .iter()
            .filter(|(_, c)| c.origin_char == '#')
            .map(|(p, _)| p)
            .collect();
        assert_eq!(walls_before, walls_after);
        assert_eq!(world.census().count('~'), 2);
        assert_eq!(world.census().count('o'), 1);
    }

    #[test]
    fn test_lifelike_plant_grows() {
        let mut world = world(&["###", "#*#", "###"], Legend::lifelike(), RulesKind::Lifelike);
        let before = critter_at(&world, 1, 1).unwrap().energy.unwrap();
        world.turn();
        let after = critter_at(&world, 1, 1).unwrap().energy.unwrap();
        assert!((after - before - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_lifelike_plant_reproduces() {
        let mut world = world(&["####", "#* #", "####"], Legend::lifelike(), RulesKind::Lifelike);
        world.grid.get_mut(Vector::new(1, 1)).unwrap().energy = Some(16.0);
        let species = critter_at(&world, 1, 1).unwrap().species;

        let stats = world.turn();
        assert_eq!(stats.born, 1);
        let parent = critter_at(&world, 1, 1).unwrap();
        let baby = critter_at(&world, 2, 1).unwrap();
        assert_eq!(baby.species, species);
        assert_eq!(baby.origin_char, '*');
        assert_ne!(baby.id, parent.id);
        assert!(parent.energy.unwrap() > 0.0);
    }

    #[test]
    fn test_newborn_ahead_in_scan_order_acts_same_turn() {
        let mut world = world(&["####", "#* #", "####"], Legend::lifelike(), RulesKind::Lifelike);
        world.grid.get_mut(Vector::new(1, 1)).unwrap().energy = Some(16.0);

        let stats = world.turn();
        assert_eq!(stats.born, 1);
        assert_eq!(stats.acted, 2);
        assert_eq!(stats.grew, 1);

        // parent paid twice the newborn's starting energy
        let parent = critter_at(&world, 1, 1).unwrap().energy.unwrap();
        let start = (16.0 - parent) / 2.0;
        let baby = critter_at(&world, 2, 1).unwrap().energy.unwrap();
        assert!((baby - (start + world.energy.grow_gain)).abs() < 1e-9);
    }

    #[test]
    fn test_newborn_behind_in_scan_order_waits() {
        let mut world = world(&["####", "# *#", "####"], Legend::lifelike(), RulesKind::Lifelike);
        world.grid.get_mut(Vector::new(2, 1)).unwrap().energy = Some(16.0);

        let stats = world.turn();
        assert_eq!(stats.born, 1);
        assert_eq!(stats.acted, 1);
        assert_eq!(stats.grew, 0);

        let parent = critter_at(&world, 2, 1).unwrap().energy.unwrap();
        let baby = critter_at(&world, 1, 1).unwrap().energy.unwrap();
        assert!((baby - (16.0 - parent) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_reproduction_needs_enough_energy() {
        let mut world = world(&["####", "#o #", "####"], Legend::lifelike(), RulesKind::Lifelike);
        // above the behavior threshold but below twice a newborn's energy
        world.grid.get_mut(Vector::new(1, 1)).unwrap().energy = Some(61.0);
        world.energy.plant_eater_energy = 40.0;

        let stats = world.turn();
        assert_eq!(stats.born, 0);
        assert_eq!(stats.idle, 1);
        let eater = critter_at(&world, 1, 1).unwrap();
        assert!((eater.energy.unwrap() - 60.8).abs() < 1e-9);
    }

    #[test]
    fn test_lifelike_eater_eats_plant() {
        let mut world = world(&["####", "#o*#", "####"], Legend::lifelike(), RulesKind::Lifelike);
        let plant_energy = critter_at(&world, 2, 1).unwrap().energy.unwrap();

        let stats = world.turn();
        assert_eq!(stats.ate, 1);
        assert!(critter_at(&world, 2, 1).is_none());
        let eater = critter_at(&world, 1, 1).unwrap();
        assert!((eater.energy.unwrap() - (20.0 + plant_energy)).abs() < 1e-9);
    }

    #[test]
    fn test_lifelike_move_costs_energy() {
        let mut world = world(&["####", "#o #", "####"], Legend::lifelike(), RulesKind::Lifelike);
        world.turn();
        let eater = critter_at(&world, 2, 1).unwrap();
        assert_eq!(eater.energy, Some(19.0));
        assert!(critter_at(&world, 1, 1).is_none());
    }

    #[test]
    fn test_exhausted_critter_cannot_move() {
        let mut world = world(&["####", "#o #", "####"], Legend::lifelike(), RulesKind::Lifelike);
        world.grid.get_mut(Vector::new(1, 1)).unwrap().energy = Some(1.0);
        let stats = world.turn();
        assert_eq!(stats.moved, 0);
        assert_eq!(stats.idle, 1);
        assert!((critter_at(&world, 1, 1).unwrap().energy.unwrap() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_idle_critter_starves() {
        let mut world = world(&["###", "#o#", "###"], Legend::lifelike(), RulesKind::Lifelike);
        world.grid.get_mut(Vector::new(1, 1)).unwrap().energy = Some(0.3);

        let stats = world.turn();
        assert_eq!(stats.died, 0);
        let stats = world.turn();
        assert_eq!(stats.died, 1);
        assert!(critter_at(&world, 1, 1).is_none());
        assert_eq!(world.totals().died, 1);
    }

    #[test]
    fn test_energyless_critter_in_lifelike_world() {
        let legend = Legend::basic();
        let mut world = world(&["###", "#~#", "###"], legend, RulesKind::Lifelike);
        for _ in 0..10 {
            world.turn();
        }
        let follower = critter_at(&world, 1, 1).unwrap();
        assert_eq!(follower.energy, None);
    }

    #[test]
    fn test_reset_restores_population() {
        let mut world = World::from_config(&CritterConfig::default()).unwrap();
        let before = world.census();
        world.run(20, 5);
        assert_eq!(world.turn_count(), 20);

        world.reset().unwrap();
        let after = world.census();
        assert_eq!(world.turn_count(), 0);
        assert_eq!(before.by_char, after.by_char);
    }

    #[test]
    fn test_species_inherited_across_generations() {
        let mut world = world(plans::PLAN3, Legend::lifelike(), RulesKind::Lifelike);
        world.run(60, 20);
        for (_, critter) in world.grid().iter() {
            match critter.origin_char {
                '*' => assert!(matches!(critter.species, Some(Species::Green | Species::Blue))),
                'o' => assert!(matches!(critter.species, Some(Species::Orange | Species::Red))),
                _ => assert!(critter.species.is_none()),
            }
        }
    }

    #[test]
    fn test_legend_kind_from_config() {
        let config = CritterConfig {
            plan: "plan1".to_string(),
            legend: LegendKind::Basic,
            rules: RulesKind::Basic,
            ..Default::default()
        };
        let mut world = World::from_config(&config).unwrap();
        let stats = world.turn();
        assert_eq!(stats.acted, 4);
    }
}
