//! Output dimensions and the geographic-to-output mapping.

use std::str::FromStr;

use crate::foundation::core::{Bounds, Point};
use crate::foundation::error::{MapError, MapResult};

/// A `<width>x<height>` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridSize {
    /// Width in output units.
    pub width: u32,
    /// Height in output units.
    pub height: u32,
}

impl FromStr for GridSize {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || MapError::configuration(format!("expected <width>x<height>, got '{s}'"));
        let (w, h) = s.split_once('x').ok_or_else(bad)?;
        let digits = |v: &str| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit());
        if !digits(w) || !digits(h) {
            return Err(bad());
        }
        Ok(Self {
            width: w.parse().map_err(|_| bad())?,
            height: h.parse().map_err(|_| bad())?,
        })
    }
}

/// How the output size is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeSpec {
    /// The map's canonical width and height.
    Native,
    /// Both sides given; the aspect ratio is not preserved.
    Explicit {
        /// Output width.
        width: u32,
        /// Output height.
        height: u32,
    },
    /// Height follows from the bounding box's aspect ratio.
    Width(u32),
    /// Width follows from the bounding box's aspect ratio.
    Height(u32),
    /// Largest size with the bounding box's aspect ratio fitting inside the box.
    FitBox {
        /// Box width.
        width: u32,
        /// Box height.
        height: u32,
    },
}

/// User-facing sizing options; at most one mode may be chosen.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Exact output size.
    pub output_grid: Option<GridSize>,
    /// Box the output must fit inside.
    pub fit_box: Option<GridSize>,
    /// Output width; with `height` unset the height follows the aspect ratio.
    pub width: Option<u32>,
    /// Output height; with `width` unset the width follows the aspect ratio.
    pub height: Option<u32>,
}

impl ViewportConfig {
    /// Resolve the sizing mode, rejecting conflicting options.
    pub fn size_spec(&self) -> MapResult<SizeSpec> {
        let sized = self.width.is_some() || self.height.is_some();
        match (self.output_grid, self.fit_box) {
            (Some(_), Some(_)) => Err(MapError::configuration(
                "an output grid and a fit-to-box size cannot both be given",
            )),
            (Some(_), None) | (None, Some(_)) if sized => Err(MapError::configuration(
                "width/height cannot be combined with an output grid or fit-to-box size",
            )),
            (Some(g), None) => Ok(SizeSpec::Explicit {
                width: g.width,
                height: g.height,
            }),
            (None, Some(b)) => Ok(SizeSpec::FitBox {
                width: b.width,
                height: b.height,
            }),
            (None, None) => Ok(match (self.width, self.height) {
                (Some(width), Some(height)) => SizeSpec::Explicit { width, height },
                (Some(w), None) => SizeSpec::Width(w),
                (None, Some(h)) => SizeSpec::Height(h),
                (None, None) => SizeSpec::Native,
            }),
        }
    }
}

/// Resolved output space and its mapping from the governing bounding box.
///
/// A zero width or height means raw geographic output: coordinates pass through with only the
/// y axis negated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Governing bounding box.
    pub bounds: Bounds,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
}

impl Viewport {
    /// `native` is the map's canonical `(width, height)`.
    pub fn new(bounds: Bounds, spec: SizeSpec, native: (u32, u32)) -> MapResult<Self> {
        let (width, height) = match spec {
            SizeSpec::Native => native,
            SizeSpec::Explicit { width, height } => (width, height),
            SizeSpec::Width(w) => (w, derived_px(w, f64::from(w) / bounds.aspect_ratio()?)),
            SizeSpec::Height(h) => (derived_px(h, f64::from(h) * bounds.aspect_ratio()?), h),
            SizeSpec::FitBox { width, height } => {
                let aspect = bounds.aspect_ratio()?;
                if width == 0 || height == 0 {
                    return Err(MapError::configuration(
                        "fit-to-box size must be > 0 in both dimensions",
                    ));
                }
                let box_ratio = f64::from(width) / f64::from(height);
                if box_ratio > aspect {
                    (derived_px(height, f64::from(height) * aspect), height)
                } else {
                    (width, derived_px(width, f64::from(width) / aspect))
                }
            }
        };
        if width != 0 && height != 0 {
            bounds.aspect_ratio()?;
        }
        Ok(Self {
            bounds,
            width,
            height,
        })
    }

    /// True when output coordinates are geographic rather than scaled.
    pub fn is_raw(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Map a geographic coordinate into output space (y grows downwards).
    pub fn transform(&self, x: f64, y: f64) -> Point {
        if self.is_raw() {
            return Point::new(x, -y);
        }
        let b = &self.bounds;
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        // Normalise first so the box corners land exactly on 0 and W/H.
        Point::new(
            (x - b.x_min) / b.width() * w,
            h - (y - b.y_min) / b.height() * h,
        )
    }

    /// `(min_x, min_y, extent_x, extent_y)` of the output coordinate space.
    pub fn view_box(&self) -> (f64, f64, f64, f64) {
        if self.is_raw() {
            let b = &self.bounds;
            (b.x_min, -b.y_max, b.width(), b.height())
        } else {
            (0.0, 0.0, f64::from(self.width), f64::from(self.height))
        }
    }
}

fn round_px(v: f64) -> u32 {
    v.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// A side derived from a non-zero request never rounds down to 0.
fn derived_px(given: u32, v: f64) -> u32 {
    if given == 0 { 0 } else { round_px(v).max(1) }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/viewport.rs"]
mod tests;
