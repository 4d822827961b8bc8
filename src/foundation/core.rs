use std::str::FromStr;

use crate::foundation::error::{MapError, MapResult};

pub use kurbo::Point;

/// Zero-based frame index within a raster sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Axis-aligned geographic box in the map's coordinate reference system.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Western edge.
    pub x_min: f64,
    /// Southern edge.
    pub y_min: f64,
    /// Eastern edge.
    pub x_max: f64,
    /// Northern edge.
    pub y_max: f64,
}

impl Bounds {
    /// Create a box from its corner coordinates.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Width over height. Fails for boxes with no extent in either direction.
    pub fn aspect_ratio(&self) -> MapResult<f64> {
        let (w, h) = (self.width(), self.height());
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Err(MapError::configuration(format!(
                "bounding box has no area: {self:?}"
            )));
        }
        Ok(w / h)
    }

    /// Convert to a `geo` rectangle.
    pub fn to_geo(self) -> geo::Rect<f64> {
        geo::Rect::new(
            geo::coord! { x: self.x_min, y: self.y_min },
            geo::coord! { x: self.x_max, y: self.y_max },
        )
    }

    /// Convert from a `geo` rectangle.
    pub fn from_geo(rect: geo::Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

/// Interpolation position between the true geometry (0.0) and the cartogram (1.0).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Slide(f64);

impl Slide {
    /// True geometry.
    pub const ORIGINAL: Slide = Slide(0.0);
    /// Fully morphed cartogram geometry.
    pub const MORPHED: Slide = Slide(1.0);

    /// Validate a slide value; anything outside `[0, 1]` is a configuration error.
    pub fn new(value: f64) -> MapResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MapError::configuration(format!(
                "slide must be within [0, 1], got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// The raw slide value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Slide {
    fn default() -> Self {
        Self::MORPHED
    }
}

/// Straight (non-premultiplied) RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Create a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form, as used in CSS.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb8 {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(MapError::configuration(format!(
                "colour must be six hex digits, got '{s}'"
            )));
        }
        let bytes = hex::decode(digits)
            .map_err(|e| MapError::configuration(format!("invalid hex colour '{s}': {e}")))?;
        match bytes[..] {
            [r, g, b] => Ok(Self { r, g, b }),
            _ => Err(MapError::configuration(format!("invalid hex colour '{s}'"))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
