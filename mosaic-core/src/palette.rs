//! Quantized color palette.

use crate::Color;

/// Ordered set of centroid colors produced by clustering
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }

    /// Index of the entry closest to `color`; the lowest index wins ties.
    /// Returns 0 for an empty palette.
    pub fn nearest_index(&self, color: &Color) -> usize {
        nearest_index(&self.colors, color)
    }

    /// Entry closest to `color`, `None` for an empty palette
    pub fn nearest(&self, color: &Color) -> Option<Color> {
        self.colors.get(self.nearest_index(color)).copied()
    }
}

/// Linear scan for the nearest centroid. Strict `<` keeps the earliest index on ties.
pub(crate) fn nearest_index(centroids: &[Color], color: &Color) -> usize {
    let mut min_dist = f64::INFINITY;
    let mut nearest = 0;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = color.dist_sq(centroid);
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }
    nearest
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest() {
        let palette = Palette::new(vec![
            Color::new(1.0, 0.0, 0.0),
            Color::new(0.0, 0.0, 1.0),
        ]);
        let almost_red = Color::new(0.9, 0.0, 0.1);

        assert_eq!(palette.nearest_index(&almost_red), 0);
        assert_eq!(palette.nearest(&almost_red), Some(Color::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_nearest_tie_prefers_lowest_index() {
        let black = Color::BLACK;
        let white = Color::new(1.0, 1.0, 1.0);
        let palette = Palette::new(vec![white, black, white]);
        // Equidistant from black and white
        let gray = Color::new(0.5, 0.5, 0.5);
        assert_eq!(palette.nearest_index(&gray), 0);

        // Duplicate entries resolve to the first copy
        let palette = Palette::new(vec![black, white, white]);
        assert_eq!(palette.nearest_index(&Color::new(0.9, 0.9, 0.9)), 1);
    }

    #[test]
    fn test_nearest_minimizes_distance() {
        let palette = Palette::new(vec![
            Color::new(0.1, 0.1, 0.1),
            Color::new(0.5, 0.2, 0.8),
            Color::new(0.9, 0.9, 0.2),
            Color::new(0.4, 0.6, 0.4),
        ]);
        let queries = [
            Color::new(0.0, 0.0, 0.0),
            Color::new(0.45, 0.5, 0.5),
            Color::new(1.0, 1.0, 0.0),
            Color::new(0.6, 0.1, 0.9),
        ];
        for query in &queries {
            let idx = palette.nearest_index(query);
            let best = query.dist(&palette.as_slice()[idx]);
            for entry in &palette {
                assert!(best <= query.dist(entry));
            }
        }
    }

    #[test]
    fn test_empty_palette() {
        let palette = Palette::new(vec![]);
        assert_eq!(palette.nearest(&Color::BLACK), None);
    }
}
