//! `gridplay paint`: run the color diffusion painter and save the result.

use anyhow::{Context, Result};
use clap::Args;
use gridplay_core::{load_json, PainterConfig};
use gridplay_paint::{render, save_png, ColorMapper, Replay};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct PaintArgs {
    /// JSON config file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Canvas width in cells
    #[arg(long)]
    pub width: Option<i32>,
    /// Canvas height in cells
    #[arg(long)]
    pub height: Option<i32>,
    /// Quantization steps per color channel
    #[arg(long)]
    pub levels: Option<u32>,
    /// Seed for the palette shuffle
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, requires = "start_y")]
    pub start_x: Option<i32>,
    #[arg(long, requires = "start_x")]
    pub start_y: Option<i32>,
    /// Pixel size of one cell in the output image
    #[arg(long)]
    pub cell_size: Option<u32>,
    /// Sort the palette by hue instead of painting in shuffled order
    #[arg(long)]
    pub sort_by_hue: bool,
    /// Where to write the finished painting
    #[arg(long, short, default_value = "painting.png")]
    pub output: PathBuf,
    /// Also dump a replay frame every N placements
    #[arg(long)]
    pub frame_every: Option<usize>,
    /// Directory for replay frames
    #[arg(long, default_value = "frames")]
    pub frames_dir: PathBuf,
}

impl PaintArgs {
    /// The config file (or defaults) with command line overrides applied
    pub fn resolve(&self) -> Result<PainterConfig> {
        let mut config: PainterConfig = match &self.config {
            Some(path) => load_json(path)
                .with_context(|| format!("failed to load painter config {}", path.display()))?,
            None => PainterConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(levels) = self.levels {
            config.levels = levels;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let (Some(x), Some(y)) = (self.start_x, self.start_y) {
            config.start = Some((x, y));
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if self.sort_by_hue {
            config.sort_by_hue = true;
        }
        if self.frame_every.is_some() {
            config.frame_every = self.frame_every;
        }

        config.validate().context("invalid painter config")?;
        Ok(config)
    }
}

pub fn run(args: PaintArgs) -> Result<()> {
    let config = args.resolve()?;
    info!(
        width = config.width,
        height = config.height,
        colors = config.palette_size(),
        seed = config.seed,
        "Starting painter"
    );

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut mapper = ColorMapper::new(&config, &mut rng)?;
    let summary = mapper.paint_all()?;

    let image = render(&mapper, config.cell_size);
    save_png(&image, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    if let Some(every) = config.frame_every {
        let frames = Replay::new(&mapper, config.cell_size)
            .write_frames(&args.frames_dir, every)
            .context("failed to write replay frames")?;
        info!(frames = frames.len(), "Replay frames written");
    }

    info!(
        output = %args.output.display(),
        placed = summary.placed,
        cells = summary.cells,
        "Painting saved"
    );
    Ok(())
}
