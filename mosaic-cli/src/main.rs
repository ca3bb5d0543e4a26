//! Mosaic CLI
//!
//! Quantizes an image region into a small palette with k-means and repaints
//! it in fixed-size blocks.
//!
//! Run with: `mosaic -i photo.jpg -o out/mosaic.png -k 8 --block 10`
//!
//! ## Region
//!
//! Pass `-x` and `-y` to restrict the effect to a rectangle. `--width` and
//! `--height` default to the rest of the image:
//!
//!   mosaic -i photo.jpg -o out.png -x 100 -y 50 --width 200
//!
//! A region that does not fit the image is ignored and the whole image is
//! used instead.
//!
//! ## YAML config file
//!
//! ```yaml
//! k: 6
//! block: 16
//! iterations: 100
//! tolerance: 0.0005
//! seed: 42
//! region:
//!   x: 100
//!   y: 50
//!   width: 200      # optional, -1 or absent = rest of image
//! ```
//!
//! Flags given on the command line override values from `--config`.

use std::path::{Path, PathBuf};
use anyhow::Context;
use clap::Parser;
use image::ImageFormat;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use mosaic_core::{Mosaic, MosaicOptions, Region};

/// YAML config file format
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MosaicConfig {
    #[serde(default)]
    k: Option<usize>,
    #[serde(default)]
    block: Option<u32>,
    #[serde(default)]
    iterations: Option<usize>,
    #[serde(default)]
    tolerance: Option<f64>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    region: Option<RegionConfig>,
}

/// Region section of the config file (width/height default to the rest of the image)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegionConfig {
    x: i64,
    y: i64,
    #[serde(default = "default_extent")]
    width: i64,
    #[serde(default = "default_extent")]
    height: i64,
}

fn default_extent() -> i64 { -1 }

fn load_config(path: &Path) -> anyhow::Result<MosaicConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {:?}", path))
}

#[derive(Parser, Debug)]
#[command(name = "mosaic")]
#[command(about = "Render k-means block mosaics", long_about = None)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Input image path
    #[arg(short, long)]
    input: PathBuf,

    /// Output image path (format from extension, PNG if unknown)
    #[arg(short, long)]
    output: PathBuf,

    /// Number of palette colors [default: 8]
    #[arg(short)]
    k: Option<usize>,

    /// Block size in pixels [default: 10]
    #[arg(long)]
    block: Option<u32>,

    /// Maximum k-means iterations [default: 50]
    #[arg(long)]
    iterations: Option<usize>,

    /// k-means convergence tolerance [default: 0.001]
    #[arg(long)]
    tolerance: Option<f64>,

    /// X coordinate of the region's top-left corner (-1 = whole image)
    #[arg(short = 'x', allow_negative_numbers = true)]
    region_x: Option<i64>,

    /// Y coordinate of the region's top-left corner (-1 = whole image)
    #[arg(short = 'y', allow_negative_numbers = true)]
    region_y: Option<i64>,

    /// Region width (-1 = rest of the image)
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i64>,

    /// Region height (-1 = rest of the image)
    #[arg(long, allow_negative_numbers = true)]
    height: Option<i64>,

    /// Random seed for reproducibility (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log k-means progress
    #[arg(short, long)]
    verbose: bool,
}

/// Region coordinates as given by the user, before image bounds are known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RegionArgs {
    x: i64,
    y: i64,
    width: i64,
    height: i64,
}

impl RegionArgs {
    /// Merge CLI coordinates over the config's; unset values are -1
    fn resolve(args: &Args, config: Option<&RegionConfig>) -> Self {
        let base = config.map_or((-1, -1, -1, -1), |r| (r.x, r.y, r.width, r.height));
        Self {
            x: args.region_x.unwrap_or(base.0),
            y: args.region_y.unwrap_or(base.1),
            width: args.width.unwrap_or(base.2),
            height: args.height.unwrap_or(base.3),
        }
    }

    /// A region is requested only when both origin coordinates are given.
    /// Negative width/height extend to the image's far edge.
    fn to_region(self, image_width: u32, image_height: u32) -> Option<Region> {
        if self.x < 0 || self.y < 0 {
            return None;
        }
        let width = if self.width < 0 { image_width as i64 - self.x } else { self.width };
        let height = if self.height < 0 { image_height as i64 - self.y } else { self.height };
        Some(Region::new(self.x, self.y, width, height))
    }
}

/// Build options from CLI flags, then config values, then defaults
fn build_options(args: &Args, config: &MosaicConfig, region: Option<Region>) -> MosaicOptions {
    let defaults = MosaicOptions::default();
    MosaicOptions {
        k: args.k.or(config.k).unwrap_or(defaults.k),
        block_size: args.block.or(config.block).unwrap_or(defaults.block_size),
        iterations: args.iterations.or(config.iterations).unwrap_or(defaults.iterations),
        tolerance: args.tolerance.or(config.tolerance).unwrap_or(defaults.tolerance),
        region,
    }
}

/// Write `image`, picking the format from the extension (PNG otherwise)
fn save_image(image: &image::RgbaImage, output: &Path) -> anyhow::Result<()> {
    let format = ImageFormat::from_path(output).unwrap_or(ImageFormat::Png);
    let result = match format {
        // No alpha channel in these formats
        ImageFormat::Jpeg | ImageFormat::Pnm => image::DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save_with_format(output, format),
        _ => image.save_with_format(output, format),
    };
    result.with_context(|| format!("failed to save image: {:?}", output))
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.config.as_deref().map(load_config).transpose()?.unwrap_or_default();

    info!("Loading image: {:?}", args.input);
    let image = image::open(&args.input)
        .with_context(|| format!("failed to open input image: {:?}", args.input))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    info!("Image size: {}x{}", width, height);

    let region = RegionArgs::resolve(&args, config.region.as_ref()).to_region(width, height);
    let options = build_options(&args, &config, region);
    debug!("Options: {:?}", options);

    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    info!("Using seed: {}", seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let result = Mosaic::new(options)
        .compute(&image, &mut rng)
        .context("failed to create mosaic")?;
    info!(
        "Mosaicked {}x{} region at ({}, {}) with {} colors ({} k-means iterations{})",
        result.region.width,
        result.region.height,
        result.region.x,
        result.region.y,
        result.palette.len(),
        result.iterations,
        if result.converged { "" } else { ", not converged" },
    );

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {:?}", parent))?;
    }
    save_image(&result.image, &args.output)?;

    info!("Output saved to: {:?}", args.output);
    Ok(())
}
