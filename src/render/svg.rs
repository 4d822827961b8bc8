//! Vector back-end: an SVG document with one `<path>` per region.

use std::fmt::Write as _;

use geo::MultiPolygon;

use crate::feed::Region;
use crate::foundation::core::{Point, Slide};
use crate::foundation::error::MapResult;
use crate::render::backend::{MapBackend, Pose, Projection};
use crate::render::keyframes::animate_element;
use crate::render::path::{fixed, path_d};
use crate::render::points::{OverlayConfig, write_circles};
use crate::render::style::StyleConfig;

fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Whether `name` can be used verbatim as an XML `id`.
pub fn is_xml_id(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Accumulates region, outline and circle elements; [`SvgDocument::finish`] wraps them.
pub struct SvgDocument<'a> {
    projection: Projection<'a>,
    pose: Pose,
    decimals: usize,
    style: &'a StyleConfig,
    overlay: &'a OverlayConfig,
    tagged: bool,
    body: String,
}

impl<'a> SvgDocument<'a> {
    /// `tagged` is set when a dataset drives the `has-data`/`no-data` classes.
    pub fn new(
        projection: Projection<'a>,
        pose: Pose,
        decimals: usize,
        style: &'a StyleConfig,
        overlay: &'a OverlayConfig,
        tagged: bool,
    ) -> Self {
        Self {
            projection,
            pose,
            decimals,
            style,
            overlay,
            tagged,
            body: String::new(),
        }
    }

    /// Writes a path element; returns `false` when the shape produced no path data.
    fn write_path(&mut self, id: &str, class: Option<&str>, shape: &MultiPolygon<f64>) -> bool {
        let class_attr = match class {
            Some(c) if !c.is_empty() => format!(r#" class="{}""#, xml_escape(c)),
            _ => String::new(),
        };
        let id = xml_escape(id);
        match self.pose {
            Pose::Fixed(slide) => {
                let d = path_d(shape, &self.projection.at(slide), self.decimals);
                if d.is_empty() {
                    return false;
                }
                let _ = writeln!(self.body, r#"<path id="{id}" d="{d}"{class_attr}/>"#);
            }
            Pose::Morph => {
                let original = path_d(shape, &self.projection.at(Slide::ORIGINAL), self.decimals);
                if original.is_empty() {
                    return false;
                }
                let morphed = path_d(shape, &self.projection.at(Slide::MORPHED), self.decimals);
                let _ = writeln!(
                    self.body,
                    r#"<path id="{id}" d="{original}"{class_attr}>"#
                );
                let _ = writeln!(self.body, "{}", animate_element("d", &original, &morphed));
                self.body.push_str("</path>\n");
            }
        }
        true
    }

    /// Complete document. `canonical` is the map's native size, used in raw mode.
    pub fn finish(self, canonical: (u32, u32), bounds_rect: bool) -> String {
        let viewport = self.projection.viewport;
        let (x, y, w, h) = viewport.view_box();
        let (width, height) = if viewport.is_raw() {
            canonical
        } else {
            (viewport.width, viewport.height)
        };

        let mut out = String::new();
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink""#);
        if width != 0 && height != 0 {
            let _ = write!(out, r#" width="{width}" height="{height}""#);
        }
        let (x, y, w, h) = (fixed(x, 5), fixed(y, 5), fixed(w, 5), fixed(h, 5));
        let _ = writeln!(out, r#" viewBox="{x} {y} {w} {h}">"#);
        if let Some(css) = self.style.css(self.overlay) {
            let _ = writeln!(out, "<style><![CDATA[\n{}\n]]></style>", css.trim_end());
        }
        if bounds_rect {
            let _ = writeln!(
                out,
                r#"<path id="bounds" d="M {x} {y} h {w} v {h} h -{w} Z"/>"#
            );
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

impl MapBackend for SvgDocument<'_> {
    fn draw_outline(&mut self, outline: &MultiPolygon<f64>) -> MapResult<()> {
        self.write_path("outline", None, outline);
        Ok(())
    }

    fn draw_region(&mut self, region: &Region) -> MapResult<()> {
        if !is_xml_id(&region.name) {
            tracing::warn!(region = %region.name, "region name is not a valid XML id");
        }
        let classes = self.style.region_classes(self.tagged, region.has_data);
        if !self.write_path(&region.name, Some(&classes), &region.shape) {
            tracing::debug!(region = %region.name, "region produced no path data");
        }
        Ok(())
    }

    fn draw_points(&mut self, points: &[Point]) -> MapResult<()> {
        write_circles(
            &mut self.body,
            points,
            &self.projection,
            self.pose,
            self.overlay.radius,
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
