use std::io::Cursor;

use anyhow::Context as _;
use geo::MultiPolygon;

use crate::feed::Region;
use crate::foundation::core::{Point, Slide};
use crate::foundation::error::MapResult;
use crate::interp::{CoordinateResolver, Interpolate};
use crate::viewport::Viewport;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Encode as PNG (straight alpha).
    pub fn encode_png(&self) -> MapResult<Vec<u8>> {
        let mut rgba = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut rgba);
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, rgba)
            .context("frame buffer does not match its dimensions")?;
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Geographic-to-output mapping shared by every back-end of one render.
#[derive(Clone, Copy)]
pub struct Projection<'a> {
    /// Output space.
    pub viewport: &'a Viewport,
    /// Cartogram warp, if any.
    pub interp: Option<&'a dyn Interpolate>,
}

impl<'a> Projection<'a> {
    /// Pair a viewport with an optional warp.
    pub fn new(viewport: &'a Viewport, interp: Option<&'a dyn Interpolate>) -> Self {
        Self { viewport, interp }
    }

    /// Resolver for vertices at `slide`.
    pub fn at(&self, slide: Slide) -> CoordinateResolver<'a> {
        CoordinateResolver::new(self.viewport, self.interp, slide)
    }
}

/// Which shape(s) a vector element shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pose {
    /// A single pose at the given slide.
    Fixed(Slide),
    /// Keyframe animation between slide 0 and slide 1.
    Morph,
}

/// Output back-end contract. Raster, SVG and JSON outputs implement it.
///
/// Calls arrive in drawing order: the outline first, then regions, then overlay points.
pub trait MapBackend {
    /// Draw the world outline beneath everything else.
    fn draw_outline(&mut self, outline: &MultiPolygon<f64>) -> MapResult<()>;
    /// Draw one region.
    fn draw_region(&mut self, region: &Region) -> MapResult<()>;
    /// Draw overlay points, given in geographic coordinates.
    fn draw_points(&mut self, points: &[Point]) -> MapResult<()>;
}
