//! Normalized RGB colors and running color averages.

/// RGB color with channels normalized to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Normalize an 8-bit pixel. Alpha is ignored.
    pub fn from_rgba8(pixel: &image::Rgba<u8>) -> Self {
        let [r, g, b, _] = pixel.0;
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Quantize back to a fully opaque 8-bit pixel
    pub fn to_rgba8(&self) -> image::Rgba<u8> {
        image::Rgba([
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            255,
        ])
    }

    /// Squared distance to another color
    pub fn dist_sq(&self, other: &Color) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db
    }

    /// Euclidean distance to another color
    pub fn dist(&self, other: &Color) -> f64 {
        self.dist_sq(other).sqrt()
    }
}

#[inline]
fn channel_to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Euclidean distance between two colors in RGB space
pub fn distance(a: &Color, b: &Color) -> f64 {
    a.dist(b)
}

/// Running per-channel sum, averaged without keeping the members around
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorSum {
    r: f64,
    g: f64,
    b: f64,
    count: u64,
}

impl ColorSum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, color: Color) {
        self.r += color.r;
        self.g += color.g;
        self.b += color.b;
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Arithmetic mean of everything added so far (black when empty)
    pub fn mean(&self) -> Color {
        if self.count == 0 {
            return Color::BLACK;
        }
        let n = self.count as f64;
        Color::new(self.r / n, self.g / n, self.b / n)
    }
}

impl FromIterator<Color> for ColorSum {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut sum = ColorSum::new();
        for color in iter {
            sum.add(color);
        }
        sum
    }
}

/// Mean color of a set of colors (black for an empty set)
pub fn average_color<I: IntoIterator<Item = Color>>(colors: I) -> Color {
    colors.into_iter().collect::<ColorSum>().mean()
}
