//! Raster back-end on `vello_cpu`: one immediate-mode canvas per frame.

use std::sync::Arc;

use geo::MultiPolygon;

use crate::feed::Region;
use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::{MapError, MapResult};
use crate::interp::CoordinateResolver;
use crate::render::backend::{FrameRGBA, MapBackend, Pose, Projection};
use crate::render::path::{emit_multipolygon, emit_polygon};
use crate::render::points::{OverlayConfig, circle_path};
use crate::render::style::{BackgroundImage, StyleConfig};

fn paint(c: Rgb8, alpha: u8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, alpha)
}

fn surface_dim(v: u32, axis: &str) -> MapResult<u16> {
    if v == 0 {
        return Err(MapError::configuration(format!(
            "raster output needs a non-zero {axis}"
        )));
    }
    v.try_into().map_err(|_| {
        MapError::configuration(format!(
            "raster {axis} {v} exceeds the surface limit of {}",
            u16::MAX
        ))
    })
}

fn background_pixmap(img: &BackgroundImage) -> MapResult<vello_cpu::Pixmap> {
    let w = surface_dim(img.width, "background image width")?;
    let h = surface_dim(img.height, "background image height")?;
    if img.rgba8_premul.len() != img.width as usize * img.height as usize * 4 {
        return Err(MapError::configuration(
            "background image byte length does not match its dimensions",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(img.width as usize * img.height as usize);
    for px in img.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Decode an encoded picture (PNG, JPEG, ...) into a [`BackgroundImage`].
pub fn decode_background(bytes: &[u8]) -> MapResult<BackgroundImage> {
    use anyhow::Context as _;

    let rgba = image::load_from_memory(bytes)
        .context("decode background image")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    for px in rgba8_premul.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
    Ok(BackgroundImage {
        width,
        height,
        rgba8_premul,
    })
}

/// Draws one frame at a fixed slide.
pub struct RasterCanvas<'a> {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    resolver: CoordinateResolver<'a>,
    style: &'a StyleConfig,
    overlay: &'a OverlayConfig,
    tagged: bool,
}

impl<'a> RasterCanvas<'a> {
    /// Paints the background colour and optional background image.
    pub fn new(
        projection: Projection<'a>,
        pose: Pose,
        style: &'a StyleConfig,
        overlay: &'a OverlayConfig,
        tagged: bool,
    ) -> MapResult<Self> {
        let Pose::Fixed(slide) = pose else {
            return Err(MapError::unsupported(
                "raster output draws one pose per frame; request frames instead of animation",
            ));
        };
        let vp = projection.viewport;
        let width = surface_dim(vp.width, "width")?;
        let height = surface_dim(vp.height, "height")?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let full = vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        ctx.set_paint(paint(style.background, 255));
        ctx.fill_rect(&full);

        if let Some(img) = &style.background_image {
            if (img.width, img.height) != (vp.width, vp.height) {
                return Err(MapError::configuration(format!(
                    "background image is {}x{} but the output is {}x{}",
                    img.width, img.height, vp.width, vp.height
                )));
            }
            ctx.set_paint(vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(background_pixmap(img)?)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            });
            ctx.fill_rect(&full);
        }
        ctx.set_fill_rule(vello_cpu::peniko::Fill::EvenOdd);

        Ok(Self {
            ctx,
            width,
            height,
            resolver: projection.at(slide),
            style,
            overlay,
            tagged,
        })
    }

    fn stroke(&mut self, path: &vello_cpu::kurbo::BezPath) {
        if let Some(stroke) = self.style.stroke {
            self.ctx.set_paint(paint(stroke, 255));
            self.ctx
                .set_stroke(vello_cpu::kurbo::Stroke::new(self.style.stroke_width));
            self.ctx.stroke_path(path);
        }
    }

    /// Rasterize everything drawn so far into a premultiplied frame.
    pub fn finish(mut self) -> FrameRGBA {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

impl MapBackend for RasterCanvas<'_> {
    fn draw_outline(&mut self, outline: &MultiPolygon<f64>) -> MapResult<()> {
        let mut path = vello_cpu::kurbo::BezPath::new();
        emit_multipolygon(outline, &self.resolver, &mut path);
        self.stroke(&path);
        Ok(())
    }

    fn draw_region(&mut self, region: &Region) -> MapResult<()> {
        let fill = self.style.region_fill(self.tagged, region.has_data);
        for polygon in &region.shape {
            let mut path = vello_cpu::kurbo::BezPath::new();
            emit_polygon(polygon, &self.resolver, &mut path);
            if path.elements().is_empty() {
                continue;
            }
            self.ctx.set_paint(paint(fill, 255));
            self.ctx.fill_path(&path);
            self.stroke(&path);
        }
        Ok(())
    }

    fn draw_points(&mut self, points: &[Point]) -> MapResult<()> {
        let alpha = (self.overlay.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.ctx.set_paint(paint(self.overlay.fill, alpha));
        for p in points {
            let centre = self.resolver.resolve(p.x, p.y);
            self.ctx.fill_path(&circle_path(centre, self.overlay.radius));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
