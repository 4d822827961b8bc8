//! Cartogram interpolation and the per-vertex coordinate pipeline.

/// Cartogram displacement grids.
pub mod grid;

use crate::foundation::core::{Point, Slide};
use crate::viewport::Viewport;

/// Warps a geographic coordinate towards its cartogram position.
///
/// Implementations must be deterministic and return the input unchanged at slide 0.
pub trait Interpolate {
    /// Position of `(x, y)` at `slide` (0 = true geometry, 1 = cartogram).
    fn interpolate(&self, x: f64, y: f64, slide: f64) -> (f64, f64);
}

impl<F> Interpolate for F
where
    F: Fn(f64, f64, f64) -> (f64, f64),
{
    fn interpolate(&self, x: f64, y: f64, slide: f64) -> (f64, f64) {
        self(x, y, slide)
    }
}

/// The identity warp.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Interpolate for Identity {
    fn interpolate(&self, x: f64, y: f64, _slide: f64) -> (f64, f64) {
        (x, y)
    }
}

/// Interpolate (when configured) then map through the viewport.
#[derive(Clone, Copy)]
pub struct CoordinateResolver<'a> {
    viewport: &'a Viewport,
    interp: Option<&'a dyn Interpolate>,
    slide: Slide,
}

impl<'a> CoordinateResolver<'a> {
    /// Create a resolver for one slide value.
    pub fn new(viewport: &'a Viewport, interp: Option<&'a dyn Interpolate>, slide: Slide) -> Self {
        Self {
            viewport,
            interp,
            slide,
        }
    }

    /// The slide this resolver interpolates at.
    pub fn slide(&self) -> Slide {
        self.slide
    }

    /// Same resolver at a different slide.
    pub fn with_slide(self, slide: Slide) -> Self {
        Self { slide, ..self }
    }

    /// Output position of a geographic vertex.
    #[inline]
    pub fn resolve(&self, x: f64, y: f64) -> Point {
        let (x, y) = match self.interp {
            Some(f) => f.interpolate(x, y, self.slide.value()),
            None => (x, y),
        };
        self.viewport.transform(x, y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interp/resolver.rs"]
mod tests;
