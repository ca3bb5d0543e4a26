//! Mosaic options and the resolve → quantize → render pipeline.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    resolve_region, KMeans, MosaicError, MosaicRenderer, Palette, Rect, Region, RegionSamples,
    Result,
};

/// Mosaic configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicOptions {
    /// Palette size
    pub k: usize,
    /// Block edge length in pixels
    pub block_size: u32,
    /// Maximum k-means rounds
    pub iterations: usize,
    /// k-means convergence threshold
    pub tolerance: f64,
    /// Area to mosaic (None = whole image)
    pub region: Option<Region>,
}

impl Default for MosaicOptions {
    fn default() -> Self {
        Self {
            k: 8,
            block_size: 10,
            iterations: 50,
            tolerance: 0.001,
            region: None,
        }
    }
}

impl MosaicOptions {
    /// Check everything that does not depend on the image
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(MosaicError::ZeroColors);
        }
        if self.block_size == 0 {
            return Err(MosaicError::ZeroBlockSize);
        }
        if self.iterations == 0 {
            return Err(MosaicError::ZeroIterations);
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(MosaicError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    fn kmeans(&self) -> KMeans {
        KMeans::new(self.k, self.iterations, self.tolerance)
    }
}

/// Result of a mosaic computation
#[derive(Debug)]
pub struct MosaicResult {
    /// Output image, same dimensions as the input
    pub image: image::RgbaImage,
    /// Colors blocks were painted with
    pub palette: Palette,
    /// Region actually mosaicked after bounds checking
    pub region: Rect,
    /// k-means rounds run
    pub iterations: usize,
    pub converged: bool,
}

/// Mosaic pipeline bound to a set of options
#[derive(Debug, Clone)]
pub struct Mosaic {
    options: MosaicOptions,
}

impl Mosaic {
    pub fn new(options: MosaicOptions) -> Self {
        Self { options }
    }

    /// Resolve the region, cluster its colors and paint the blocks
    pub fn compute<R: Rng + ?Sized>(
        &self,
        image: &image::RgbaImage,
        rng: &mut R,
    ) -> Result<MosaicResult> {
        self.options.validate()?;
        let (width, height) = image.dimensions();
        let region = resolve_region(width, height, self.options.region.as_ref())?;

        let quantization = self
            .options
            .kmeans()
            .run(&RegionSamples::new(image, region), rng)?;
        log::debug!(
            "Palette of {} colors after {} rounds (converged: {}, last shift {:.6})",
            quantization.palette.len(),
            quantization.iterations,
            quantization.converged,
            quantization.max_shift,
        );

        let output = MosaicRenderer::new(self.options.block_size)
            .render(image, region, &quantization.palette)?;

        Ok(MosaicResult {
            image: output,
            palette: quantization.palette,
            region,
            iterations: quantization.iterations,
            converged: quantization.converged,
        })
    }
}

/// Create a mosaic of `image`, drawing initial centroids from `rng`
pub fn create_mosaic<R: Rng + ?Sized>(
    image: &image::RgbaImage,
    options: &MosaicOptions,
    rng: &mut R,
) -> Result<image::RgbaImage> {
    Mosaic::new(options.clone())
        .compute(image, rng)
        .map(|result| result.image)
}

/// Create a mosaic reproducibly from a seed
pub fn create_mosaic_seeded(
    image: &image::RgbaImage,
    options: &MosaicOptions,
    seed: u64,
) -> Result<image::RgbaImage> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    create_mosaic(image, options, &mut rng)
}
