//! 生成高度图并保存为 PNG

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use heightfield::terrain::{save_png, BiomeTable, HeightmapConfig, HeightmapPipeline};

/// Render a seeded heightmap to a PNG file
#[derive(Debug, Parser)]
#[command(name = "render_heightmap", version, about)]
struct Args {
    /// JSON heightmap configuration; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the noise seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the output size, as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size)]
    size: Option<(usize, usize)>,

    /// Colour by elevation band instead of writing grayscale
    #[arg(long)]
    biomes: bool,

    /// Output PNG path
    #[arg(long, default_value = "heightmap.png")]
    out: PathBuf,
}

fn parse_size(s: &str) -> Result<(usize, usize), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("bad size '{}', expected WIDTHxHEIGHT", s))?;
    let width = w.parse().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let height = h.parse().map_err(|e| format!("bad height '{}': {}", h, e))?;
    Ok((width, height))
}

impl Args {
    /// Config file first, then command line overrides
    fn heightmap_config(&self) -> Result<HeightmapConfig> {
        let mut config = match &self.config {
            Some(path) => HeightmapConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => HeightmapConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.noise.seed = seed;
        }
        if let Some((width, height)) = self.size {
            config.width = width;
            config.height = height;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let pipeline = HeightmapPipeline::new(args.heightmap_config()?)?;
    let config = pipeline.config();
    log::info!(
        "generating {}x{} heightmap (seed {})",
        config.width,
        config.height,
        config.noise.seed
    );

    let image = if args.biomes {
        let matrix = pipeline.noise_matrix()?;
        let (min, max) = matrix.min_max();
        println!("Height stats:");
        println!("  Min: {:.4}", min);
        println!("  Max: {:.4}", max);
        println!("  Avg: {:.4}", matrix.mean());
        BiomeTable::default_table()?.colorize(&matrix)?
    } else {
        pipeline.noise_map()?
    };

    save_png(&image, &args.out).with_context(|| format!("writing {}", args.out.display()))?;
    log::info!("wrote {}", args.out.display());
    println!("  -> {}", args.out.display());
    Ok(())
}
