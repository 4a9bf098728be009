//! `gridplay critters`: run a critter world in the terminal.

use anyhow::{bail, Context, Result};
use clap::Args;
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use gridplay_core::{load_json, CritterConfig, LegendKind, RulesKind};
use gridplay_critters::render::{render_colored, status_line};
use gridplay_critters::World;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

use crate::input::{self, Control, RawMode};

#[derive(Debug, Args)]
pub struct CrittersArgs {
    /// JSON config file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Built-in plan: plan1, plan2 or plan3
    #[arg(long, conflicts_with = "map")]
    pub plan: Option<String>,
    /// Plain text map file, one row per line
    #[arg(long)]
    pub map: Option<PathBuf>,
    /// basic or lifelike
    #[arg(long)]
    pub legend: Option<LegendKind>,
    /// basic or lifelike
    #[arg(long)]
    pub rules: Option<RulesKind>,
    /// Stop after this many turns
    #[arg(long)]
    pub turns: Option<u64>,
    /// Delay between turns
    #[arg(long)]
    pub interval_ms: Option<u64>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Log a population census every N turns
    #[arg(long)]
    pub census_every: Option<u64>,
    /// Draw the map without species colors
    #[arg(long)]
    pub no_color: bool,
    /// Run all turns at once and print only the final map
    #[arg(long, requires = "turns")]
    pub headless: bool,
    /// Write the final census to this file as JSON
    #[arg(long)]
    pub census_out: Option<PathBuf>,
}

impl CrittersArgs {
    pub fn resolve(&self) -> Result<CritterConfig> {
        let mut config: CritterConfig = match &self.config {
            Some(path) => load_json(path)
                .with_context(|| format!("failed to load critter config {}", path.display()))?,
            None => CritterConfig::default(),
        };

        if let Some(plan) = &self.plan {
            config.plan = plan.clone();
            config.map_path = None;
        }
        if let Some(map) = &self.map {
            config.map_path = Some(map.display().to_string());
        }
        if let Some(legend) = self.legend {
            config.legend = legend;
        }
        if let Some(rules) = self.rules {
            config.rules = rules;
        }
        if self.turns.is_some() {
            config.turns = self.turns;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(census_every) = self.census_every {
            config.census_every = census_every;
        }

        config.validate().context("invalid critter config")?;
        if self.headless && config.turns.is_none() {
            bail!("--headless needs a turn limit");
        }
        Ok(config)
    }
}

/// Writes frames to stdout, clearing the screen first when it is a terminal.
struct Screen {
    color: bool,
    clear: bool,
    /// Raw mode needs explicit carriage returns and shows the key help
    raw: bool,
}

impl Screen {
    fn new(color: bool, raw: bool) -> Self {
        let clear = io::stdout().is_terminal();
        Self { color, clear, raw }
    }

    fn frame(&self, world: &World, paused: bool) -> String {
        let map = if self.color {
            render_colored(world)
        } else {
            world.to_string()
        };
        let mut frame = format!("{map}{}", status_line(world));
        if paused {
            frame.push_str("  [paused]");
        }
        frame.push('\n');
        if self.raw {
            frame.push_str(input::KEY_HELP);
            frame.push('\n');
            frame = frame.replace('\n', "\r\n");
        }
        frame
    }

    fn draw(&self, world: &World, paused: bool) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if self.clear {
            queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        stdout.write_all(self.frame(world, paused).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

pub async fn run(args: CrittersArgs) -> Result<()> {
    let config = args.resolve()?;
    let mut world = World::from_config(&config).context("failed to build critter world")?;
    let interactive = !args.headless && io::stdin().is_terminal() && io::stdout().is_terminal();

    info!(
        plan = config.map_path.as_deref().unwrap_or(config.plan.as_str()),
        legend = %config.legend,
        rules = %config.rules,
        seed = config.seed,
        "Starting critter world"
    );

    if args.headless {
        // resolve() guarantees a turn limit
        world.run(config.turns.unwrap_or_default(), config.census_every);
        Screen::new(!args.no_color, false).draw(&world, false)?;
    } else {
        let (tx, mut controls) = mpsc::unbounded_channel();
        let raw_mode = if interactive {
            let raw_mode = RawMode::enable().context("failed to enable raw terminal mode")?;
            input::spawn_key_reader(tx);
            Some(raw_mode)
        } else {
            drop(tx);
            None
        };

        let screen = Screen::new(!args.no_color, raw_mode.is_some());
        screen.draw(&world, false)?;
        let result = animate(&mut world, &config, &screen, &mut controls).await;
        drop(raw_mode);
        result?;
        world.emit_summary();
    }

    if let Some(path) = &args.census_out {
        write_census(&world, path)?;
    }
    Ok(())
}

fn write_census(world: &World, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&world.census())?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Census written");
    Ok(())
}

/// One turn per tick until the turn limit, a quit key or a shutdown signal.
/// Space pauses the ticker and `r` rebuilds the world from its map.
async fn animate(
    world: &mut World,
    config: &CritterConfig,
    screen: &Screen,
    controls: &mut UnboundedReceiver<Control>,
) -> Result<()> {
    let mut ticker = interval(Duration::from_millis(config.interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    let shutdown = crate::shutdown_signal();
    tokio::pin!(shutdown);
    let mut paused = false;
    let mut controls_open = true;

    loop {
        if config.turns.is_some_and(|limit| world.turn_count() >= limit) {
            info!(turns = world.turn_count(), "Turn limit reached");
            break;
        }

        tokio::select! {
            biased;

            _ = &mut shutdown => break,
            control = controls.recv(), if controls_open => match control {
                Some(Control::Quit) => {
                    info!(turns = world.turn_count(), "Quit requested");
                    break;
                }
                Some(Control::TogglePause) => {
                    paused = !paused;
                    if !paused {
                        ticker.reset();
                    }
                    info!(paused, turn = world.turn_count(), "Animation toggled");
                    screen.draw(world, paused)?;
                }
                Some(Control::Reset) => {
                    world.reset().context("failed to reset critter world")?;
                    ticker.reset();
                    screen.draw(world, paused)?;
                }
                None => controls_open = false,
            },
            _ = ticker.tick(), if !paused => {
                let stats = world.turn();
                debug!(turn = world.turn_count(), acted = stats.acted, born = stats.born, died = stats.died, "Turn");
                screen.draw(world, paused)?;
                if world.turn_count() % config.census_every == 0 {
                    world.log_census();
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridplay_critters::Legend;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn plain_screen() -> Screen {
        Screen {
            color: false,
            clear: false,
            raw: false,
        }
    }

    fn lifelike_config() -> CritterConfig {
        CritterConfig {
            interval_ms: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_frame_has_map_and_status() {
        let world = World::from_map(
            &["####", "#o #", "####"],
            Legend::basic(),
            RulesKind::Basic,
            Default::default(),
            ChaCha8Rng::seed_from_u64(1),
        )
        .unwrap();
        let screen = plain_screen();
        let frame = screen.frame(&world, false);
        assert!(frame.starts_with("####\n#o #\n####\n"));
        assert!(frame.lines().last().unwrap().starts_with("turn"));
        assert!(screen.frame(&world, true).trim_end().ends_with("[paused]"));

        let raw = Screen {
            raw: true,
            ..plain_screen()
        };
        let frame = raw.frame(&world, false);
        assert!(frame.starts_with("####\r\n#o #\r\n"));
        assert!(frame.ends_with(&format!("{}\r\n", input::KEY_HELP)));
    }

    #[tokio::test]
    async fn test_animation_stops_at_turn_limit() {
        let config = CritterConfig {
            plan: "plan2".to_string(),
            legend: LegendKind::Basic,
            rules: RulesKind::Basic,
            turns: Some(3),
            interval_ms: 10,
            ..Default::default()
        };
        let mut world = World::from_config(&config).unwrap();
        let (_tx, mut controls) = mpsc::unbounded_channel();
        animate(&mut world, &config, &plain_screen(), &mut controls)
            .await
            .unwrap();
        assert_eq!(world.turn_count(), 3);
    }

    #[tokio::test]
    async fn test_reset_key_rebuilds_world() {
        let config = lifelike_config();
        let mut world = World::from_config(&config).unwrap();
        let start = world.census();
        world.run(10, 5);
        assert_eq!(world.turn_count(), 10);

        let (tx, mut controls) = mpsc::unbounded_channel();
        tx.send(Control::Reset).unwrap();
        tx.send(Control::Quit).unwrap();
        animate(&mut world, &config, &plain_screen(), &mut controls)
            .await
            .unwrap();

        assert_eq!(world.turn_count(), 0);
        assert_eq!(world.census().by_char, start.by_char);
    }

    #[tokio::test]
    async fn test_paused_world_does_not_advance() {
        let config = lifelike_config();
        let mut world = World::from_config(&config).unwrap();

        let (tx, mut controls) = mpsc::unbounded_channel();
        tx.send(Control::TogglePause).unwrap();
        let quit = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(60)).await;
            tx.send(Control::Quit).unwrap();
        });
        animate(&mut world, &config, &plain_screen(), &mut controls)
            .await
            .unwrap();
        quit.await.unwrap();
        assert_eq!(world.turn_count(), 0);
    }

    #[tokio::test]
    async fn test_closed_controls_keep_animating() {
        let config = CritterConfig {
            turns: Some(4),
            ..lifelike_config()
        };
        let mut world = World::from_config(&config).unwrap();
        let (tx, mut controls) = mpsc::unbounded_channel::<Control>();
        drop(tx);
        animate(&mut world, &config, &plain_screen(), &mut controls)
            .await
            .unwrap();
        assert_eq!(world.turn_count(), 4);
    }

    #[test]
    fn test_census_written_as_json() {
        let config = CritterConfig {
            plan: "plan2".to_string(),
            legend: LegendKind::Basic,
            rules: RulesKind::Basic,
            ..Default::default()
        };
        let world = World::from_config(&config).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("census.json");
        write_census(&world, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let census: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(census["turn"], 0);
        assert_eq!(census["actors"].as_u64(), Some(world.census().actors as u64));
    }
}
