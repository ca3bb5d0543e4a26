//! Region validation and block tiling.

use crate::{MosaicError, Result};

/// Requested mosaic region in image coordinates.
///
/// Any values are accepted here; [`resolve_region`] turns a request into a
/// [`Rect`] that is guaranteed to fit the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Region {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }
}

/// Rectangle inside image bounds with non-zero width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rect covering a whole `width` x `height` image
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge, saturating at `u32::MAX`
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `u32::MAX`
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the rect lies entirely inside a `width` x `height` image
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Pixel coordinates in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x, right) = (self.x, self.right());
        (self.y..self.bottom()).flat_map(move |py| (x..right).map(move |px| (px, py)))
    }

    /// Tile into `block_size` squares anchored at the top-left corner.
    /// Blocks on the right and bottom edges are clipped to the rect.
    pub fn blocks(&self, block_size: u32) -> Blocks {
        Blocks {
            area: *self,
            size: block_size.max(1),
            x: self.x,
            y: self.y,
        }
    }
}

/// Row-major iterator over the (possibly clipped) blocks of a [`Rect`]
#[derive(Debug, Clone)]
pub struct Blocks {
    area: Rect,
    size: u32,
    x: u32,
    y: u32,
}

impl Iterator for Blocks {
    type Item = Rect;

    fn next(&mut self) -> Option<Rect> {
        if self.area.width == 0 || self.y >= self.area.bottom() {
            return None;
        }
        let width = self.size.min(self.area.right() - self.x);
        let height = self.size.min(self.area.bottom() - self.y);
        let block = Rect::new(self.x, self.y, width, height);

        self.x += width;
        if self.x >= self.area.right() {
            self.x = self.area.x;
            self.y += height;
        }
        Some(block)
    }
}

/// Which bound a requested region violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegionViolation {
    #[error("region origin is negative")]
    NegativeOrigin,

    #[error("region has zero or negative extent")]
    EmptyExtent,

    #[error("region extends past the right edge of the image")]
    ExceedsWidth,

    #[error("region extends past the bottom edge of the image")]
    ExceedsHeight,
}

/// Outcome of checking a requested region against image bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionCheck {
    Valid(Rect),
    Fallback(RegionViolation),
}

/// Check `region` against a `width` x `height` image without correcting it
pub fn validate_region(width: u32, height: u32, region: &Region) -> RegionCheck {
    let violation = if region.x < 0 || region.y < 0 {
        Some(RegionViolation::NegativeOrigin)
    } else if region.width <= 0 || region.height <= 0 {
        Some(RegionViolation::EmptyExtent)
    } else if region.x.saturating_add(region.width) > width as i64 {
        Some(RegionViolation::ExceedsWidth)
    } else if region.y.saturating_add(region.height) > height as i64 {
        Some(RegionViolation::ExceedsHeight)
    } else {
        None
    };

    match violation {
        Some(v) => RegionCheck::Fallback(v),
        // All four values fit in u32 once the bounds checks pass
        None => RegionCheck::Valid(Rect::new(
            region.x as u32,
            region.y as u32,
            region.width as u32,
            region.height as u32,
        )),
    }
}

/// Resolve an optional request to a rect inside the image.
///
/// Out-of-bounds requests silently become the full image; only an image with
/// no pixels is an error.
pub fn resolve_region(width: u32, height: u32, region: Option<&Region>) -> Result<Rect> {
    if width == 0 || height == 0 {
        return Err(MosaicError::EmptyImage);
    }
    let full = Rect::full(width, height);

    let Some(region) = region else {
        return Ok(full);
    };
    match validate_region(width, height, region) {
        RegionCheck::Valid(rect) => Ok(rect),
        RegionCheck::Fallback(violation) => {
            log::warn!(
                "Ignoring region {:?} for {}x{} image ({}); using the whole image",
                region, width, height, violation,
            );
            Ok(full)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_region_is_full_image() {
        let rect = resolve_region(100, 80, None).unwrap();
        assert_eq!(rect, Rect::full(100, 80));
    }

    #[test]
    fn test_valid_region_kept() {
        let region = Region::new(25, 25, 50, 50);
        assert_eq!(
            validate_region(100, 100, &region),
            RegionCheck::Valid(Rect::new(25, 25, 50, 50))
        );
        assert_eq!(
            resolve_region(100, 100, Some(&region)).unwrap(),
            Rect::new(25, 25, 50, 50)
        );
    }

    #[test]
    fn test_region_touching_far_edge_is_valid() {
        let region = Region::new(80, 90, 20, 10);
        assert!(matches!(validate_region(100, 100, &region), RegionCheck::Valid(_)));
    }

    #[test]
    fn test_invalid_regions_fall_back() {
        let cases = [
            (Region::new(90, 0, 20, 20), RegionViolation::ExceedsWidth),
            (Region::new(0, 95, 10, 10), RegionViolation::ExceedsHeight),
            (Region::new(-1, 0, 10, 10), RegionViolation::NegativeOrigin),
            (Region::new(0, -5, 10, 10), RegionViolation::NegativeOrigin),
            (Region::new(10, 10, 0, 10), RegionViolation::EmptyExtent),
            (Region::new(10, 10, 10, -3), RegionViolation::EmptyExtent),
            (Region::new(1, 1, i64::MAX, 1), RegionViolation::ExceedsWidth),
        ];
        for (region, expected) in cases {
            assert_eq!(
                validate_region(100, 100, &region),
                RegionCheck::Fallback(expected),
                "{:?}",
                region,
            );
            assert_eq!(
                resolve_region(100, 100, Some(&region)).unwrap(),
                Rect::full(100, 100),
            );
        }
    }

    #[test]
    fn test_empty_image_is_error() {
        assert!(matches!(resolve_region(0, 10, None), Err(MosaicError::EmptyImage)));
        assert!(matches!(resolve_region(10, 0, None), Err(MosaicError::EmptyImage)));
    }

    #[test]
    fn test_rect_geometry() {
        let rect = Rect::new(2, 3, 4, 5);
        assert_eq!(rect.right(), 6);
        assert_eq!(rect.bottom(), 8);
        assert_eq!(rect.area(), 20);
        assert!(rect.contains(2, 3));
        assert!(rect.contains(5, 7));
        assert!(!rect.contains(6, 7));
        assert!(!rect.contains(1, 3));

        let pixels: Vec<_> = Rect::new(1, 1, 2, 2).pixels().collect();
        assert_eq!(pixels, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_rect_near_u32_max() {
        let rect = Rect::new(u32::MAX - 1, u32::MAX - 3, 5, 2);
        assert_eq!(rect.right(), u32::MAX);
        assert_eq!(rect.bottom(), u32::MAX - 1);
        assert!(!rect.fits(10, 10));
        assert!(!rect.fits(u32::MAX, u32::MAX));
        assert_eq!(rect.pixels().count(), 2);
        assert_eq!(rect.blocks(4).count(), 1);

        assert!(Rect::new(0, 0, 10, 10).fits(10, 10));
        assert!(!Rect::new(1, 0, 10, 10).fits(10, 10));
    }

    #[test]
    fn test_blocks_clip_last_column() {
        let rect = Rect::full(105, 10);
        let blocks: Vec<Rect> = rect.blocks(10).collect();

        assert_eq!(blocks.len(), 11);
        assert!(blocks[..10].iter().all(|b| b.width == 10 && b.height == 10));
        assert_eq!(blocks[10], Rect::new(100, 0, 5, 10));
    }

    #[test]
    fn test_blocks_cover_region_exactly_once() {
        let rect = Rect::new(3, 7, 23, 17);
        let blocks: Vec<Rect> = rect.blocks(5).collect();

        // 5 columns (last 3 wide), 4 rows (last 2 tall)
        assert_eq!(blocks.len(), 20);
        assert_eq!(blocks[0], Rect::new(3, 7, 5, 5));
        assert_eq!(blocks[4], Rect::new(23, 7, 3, 5));
        assert_eq!(blocks[19], Rect::new(23, 22, 3, 2));

        let covered: u64 = blocks.iter().map(Rect::area).sum();
        assert_eq!(covered, rect.area());
        for block in &blocks {
            assert!(block.pixels().all(|(x, y)| rect.contains(x, y)));
        }
    }

    #[test]
    fn test_block_larger_than_rect() {
        let blocks: Vec<Rect> = Rect::new(4, 4, 3, 2).blocks(10).collect();
        assert_eq!(blocks, vec![Rect::new(4, 4, 3, 2)]);
    }
}
