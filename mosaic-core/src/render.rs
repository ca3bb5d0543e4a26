//! Block rasterization onto a copy of the source image.

use crate::{Color, ColorSum, MosaicError, Palette, Rect, Result};

/// Paints a region block by block with palette colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicRenderer {
    /// Block edge length in pixels
    pub block_size: u32,
}

impl MosaicRenderer {
    pub fn new(block_size: u32) -> Self {
        Self { block_size }
    }

    /// Render a mosaic of `rect` over a copy of `image`.
    ///
    /// Each block (clipped at the rect's right and bottom edges) is filled
    /// with the palette entry nearest its mean color. Pixels outside `rect`
    /// keep their source bytes.
    pub fn render(
        &self,
        image: &image::RgbaImage,
        rect: Rect,
        palette: &Palette,
    ) -> Result<image::RgbaImage> {
        if self.block_size == 0 {
            return Err(MosaicError::ZeroBlockSize);
        }
        let (width, height) = image.dimensions();
        if !rect.fits(width, height) {
            return Err(MosaicError::RectOutOfBounds { rect, width, height });
        }

        let mut canvas = image.clone();
        let mut blocks = 0usize;

        for block in rect.blocks(self.block_size) {
            let mean = block
                .pixels()
                .map(|(x, y)| Color::from_rgba8(image.get_pixel(x, y)))
                .collect::<ColorSum>()
                .mean();
            let fill = palette.nearest(&mean).ok_or(MosaicError::ZeroColors)?.to_rgba8();

            for (x, y) in block.pixels() {
                canvas.put_pixel(x, y, fill);
            }
            blocks += 1;
        }

        log::debug!(
            "Painted {} blocks of {}px over {}x{} at ({}, {})",
            blocks, self.block_size, rect.width, rect.height, rect.x, rect.y,
        );
        Ok(canvas)
    }
}
