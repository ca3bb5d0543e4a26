//! K-means color quantization.

use rand::Rng;

use crate::palette::nearest_index;
use crate::{Color, ColorSum, MosaicError, Palette, Rect, Result};

/// Re-readable source of sample colors.
///
/// K-means walks its input once per round, so samples are read from the
/// source on demand instead of being collected up front.
pub trait ColorSamples {
    /// Number of samples
    fn len(&self) -> usize;

    /// Sample at `index` (`index < len()`)
    fn get(&self, index: usize) -> Color;

    /// All samples, in index order
    fn colors(&self) -> impl Iterator<Item = Color> + '_;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ColorSamples for [Color] {
    fn len(&self) -> usize {
        <[Color]>::len(self)
    }

    fn get(&self, index: usize) -> Color {
        self[index]
    }

    fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.iter().copied()
    }
}

/// Pixels of an image region, read lazily in row-major order
#[derive(Debug, Clone, Copy)]
pub struct RegionSamples<'a> {
    image: &'a image::RgbaImage,
    rect: Rect,
}

impl<'a> RegionSamples<'a> {
    /// `rect` must lie inside `image` (as returned by `resolve_region`)
    pub fn new(image: &'a image::RgbaImage, rect: Rect) -> Self {
        Self { image, rect }
    }
}

impl ColorSamples for RegionSamples<'_> {
    fn len(&self) -> usize {
        self.rect.area() as usize
    }

    fn get(&self, index: usize) -> Color {
        let w = self.rect.width as usize;
        let x = self.rect.x + (index % w) as u32;
        let y = self.rect.y + (index / w) as u32;
        Color::from_rgba8(self.image.get_pixel(x, y))
    }

    fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.rect
            .pixels()
            .map(move |(x, y)| Color::from_rgba8(self.image.get_pixel(x, y)))
    }
}

/// Result of a clustering run
#[derive(Debug, Clone)]
pub struct Quantization {
    pub palette: Palette,
    /// Refinement rounds actually run
    pub iterations: usize,
    /// Whether the last round moved every centroid less than the tolerance
    pub converged: bool,
    /// Largest centroid displacement in the last round
    pub max_shift: f64,
}

/// Lloyd-style k-means over RGB colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    /// Number of clusters
    pub k: usize,
    /// Upper bound on refinement rounds
    pub max_iterations: usize,
    /// Stop once no centroid moves this far in a round
    pub tolerance: f64,
}

impl KMeans {
    pub fn new(k: usize, max_iterations: usize, tolerance: f64) -> Self {
        Self { k, max_iterations, tolerance }
    }

    fn validate(&self, samples: usize) -> Result<()> {
        if self.k == 0 {
            return Err(MosaicError::ZeroColors);
        }
        if self.max_iterations == 0 {
            return Err(MosaicError::ZeroIterations);
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(MosaicError::InvalidTolerance(self.tolerance));
        }
        if samples < self.k {
            return Err(MosaicError::InsufficientSamples { samples, k: self.k });
        }
        Ok(())
    }

    /// Cluster `samples` into `k` centroids.
    ///
    /// Initial centroids are drawn uniformly with replacement from the
    /// samples, so duplicates are possible. Each round assigns every sample to
    /// its nearest centroid and moves non-empty clusters to their mean; empty
    /// clusters keep their centroid. Stops after `max_iterations` rounds or
    /// once the largest displacement drops strictly below `tolerance`.
    pub fn run<S, R>(&self, samples: &S, rng: &mut R) -> Result<Quantization>
    where
        S: ColorSamples + ?Sized,
        R: Rng + ?Sized,
    {
        let n = samples.len();
        self.validate(n)?;

        let mut centroids: Vec<Color> = (0..self.k)
            .map(|_| samples.get(rng.gen_range(0..n)))
            .collect();

        let mut iterations = 0;
        let mut converged = false;
        let mut max_shift = 0.0;

        for round in 0..self.max_iterations {
            let mut sums = vec![ColorSum::new(); self.k];
            for color in samples.colors() {
                sums[nearest_index(&centroids, &color)].add(color);
            }

            let mut shift = 0.0f64;
            for (centroid, sum) in centroids.iter_mut().zip(&sums) {
                if sum.is_empty() {
                    continue;
                }
                let updated = sum.mean();
                shift = shift.max(centroid.dist(&updated));
                *centroid = updated;
            }

            iterations = round + 1;
            max_shift = shift;
            log::debug!(
                "k-means round {}: max shift {:.6}, empty clusters {}",
                iterations,
                shift,
                sums.iter().filter(|s| s.is_empty()).count(),
            );

            if shift < self.tolerance {
                converged = true;
                break;
            }
        }

        Ok(Quantization {
            palette: Palette::new(centroids),
            iterations,
            converged,
            max_shift,
        })
    }
}
