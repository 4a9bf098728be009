//! `gridplay`: the color diffusion painter and the critter world.

mod critters;
mod input;
mod logging;
mod paint;

use anyhow::Result;
use clap::{Parser, Subcommand};
use logging::LogFormat;
use tokio::signal;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "gridplay", version, about = "Grid painter and critter world demos")]
struct Cli {
    /// Log output format on stderr
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Paint every palette color onto the canvas and save a PNG
    Paint(paint::PaintArgs),
    /// Animate a critter world in the terminal
    Critters(critters::CrittersArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format)?;

    match cli.command {
        Command::Paint(args) => paint::run(args),
        Command::Critters(args) => critters::run(args).await,
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use gridplay_core::{LegendKind, RulesKind};
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_paint_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "gridplay", "paint", "--width", "16", "--levels", "8", "--start-x", "1", "--start-y",
            "2", "--sort-by-hue",
        ])
        .unwrap();
        let Command::Paint(args) = cli.command else {
            panic!("expected paint");
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.width, 16);
        assert_eq!(config.height, 128);
        assert_eq!(config.levels, 8);
        assert_eq!(config.start, Some((1, 2)));
        assert!(config.sort_by_hue);
        assert_eq!(args.output.to_str(), Some("painting.png"));
    }

    #[test]
    fn test_paint_rejects_bad_levels() {
        let cli = Cli::try_parse_from(["gridplay", "paint", "--levels", "0"]).unwrap();
        let Command::Paint(args) = cli.command else {
            panic!("expected paint");
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_start_needs_both_coordinates() {
        assert!(Cli::try_parse_from(["gridplay", "paint", "--start-x", "3"]).is_err());
    }

    #[test]
    fn test_critter_config_file_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"plan": "plan1", "legend": "basic", "seed": 4, "interval_ms": 50}}"#)
            .unwrap();
        let path = file.path().display().to_string();

        let cli = Cli::try_parse_from([
            "gridplay", "--log-format", "json", "critters", "--config", path.as_str(), "--rules", "basic",
            "--turns", "10",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Critters(args) = cli.command else {
            panic!("expected critters");
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.plan, "plan1");
        assert_eq!(config.legend, LegendKind::Basic);
        assert_eq!(config.rules, RulesKind::Basic);
        assert_eq!(config.seed, 4);
        assert_eq!(config.interval_ms, 50);
        assert_eq!(config.turns, Some(10));
    }

    #[test]
    fn test_plan_and_map_conflict() {
        assert!(
            Cli::try_parse_from(["gridplay", "critters", "--plan", "plan1", "--map", "x.txt"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["gridplay", "critters", "--headless"]).is_err());
        assert!(Cli::try_parse_from(["gridplay", "critters", "--rules", "chaotic"]).is_err());
    }

    #[test]
    fn test_paint_writes_png_and_frames() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");
        let frames = dir.path().join("frames");
        let cli = Cli::try_parse_from([
            "gridplay",
            "paint",
            "--width",
            "6",
            "--height",
            "4",
            "--levels",
            "4",
            "--cell-size",
            "2",
            "--frame-every",
            "10",
            "--output",
            output.to_str().unwrap(),
            "--frames-dir",
            frames.to_str().unwrap(),
        ])
        .unwrap();
        let Command::Paint(args) = cli.command else {
            panic!("expected paint");
        };
        paint::run(args).unwrap();

        assert!(output.exists());
        // 24 placements at 10 per frame
        assert_eq!(std::fs::read_dir(&frames).unwrap().count(), 3);
    }
}
