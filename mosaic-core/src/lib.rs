//! Core k-means block mosaic library.
//!
//! Quantizes the colors of an image region into a small palette with
//! Lloyd-style k-means, then repaints the region in fixed-size blocks, each
//! block recolored to the palette entry nearest its average color.

mod color;
mod mosaic;
mod palette;
mod quantize;
mod region;
mod render;

pub use color::{average_color, distance, Color, ColorSum};
pub use mosaic::{create_mosaic, create_mosaic_seeded, Mosaic, MosaicOptions, MosaicResult};
pub use palette::Palette;
pub use quantize::{ColorSamples, KMeans, Quantization, RegionSamples};
pub use region::{resolve_region, validate_region, Blocks, Rect, Region, RegionCheck, RegionViolation};
pub use render::MosaicRenderer;

/// Error type for mosaic operations
#[derive(Debug, thiserror::Error)]
pub enum MosaicError {
    #[error("Invalid configuration: k must be at least 1")]
    ZeroColors,

    #[error("Invalid configuration: block size must be at least 1")]
    ZeroBlockSize,

    #[error("Invalid configuration: iterations must be at least 1")]
    ZeroIterations,

    #[error("Invalid configuration: tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),

    #[error("Invalid configuration: {samples} sampled pixels cannot seed {k} clusters")]
    InsufficientSamples { samples: usize, k: usize },

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Rect {rect:?} does not fit a {width}x{height} image")]
    RectOutOfBounds { rect: Rect, width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, MosaicError>;
