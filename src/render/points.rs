//! Point overlay: circle markers plotted over the regions.

use std::fmt::Write as _;

use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Point, Rgb8, Slide};
use crate::render::backend::{Pose, Projection};
use crate::render::keyframes::animate_element;
use crate::render::path::fixed;

/// Where overlay points come from and how they are drawn.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Point table in the geometry source.
    pub table: String,
    /// Radius in output units.
    pub radius: f64,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f64,
    /// Fill colour.
    pub fill: Rgb8,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            table: String::new(),
            radius: 2.0,
            opacity: 0.1,
            fill: Rgb8::new(0xff, 0x00, 0x00),
        }
    }
}

/// Append one `<circle>` per point. Centres are rounded to whole output units.
pub fn write_circles(
    out: &mut String,
    points: &[Point],
    projection: &Projection<'_>,
    pose: Pose,
    radius: f64,
) {
    match pose {
        Pose::Fixed(slide) => {
            let at = projection.at(slide);
            for p in points {
                let c = at.resolve(p.x, p.y);
                let _ = writeln!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="{radius}"/>"#,
                    fixed(c.x, 0),
                    fixed(c.y, 0)
                );
            }
        }
        Pose::Morph => {
            let (from, to) = (projection.at(Slide::ORIGINAL), projection.at(Slide::MORPHED));
            for p in points {
                let o = from.resolve(p.x, p.y);
                let m = to.resolve(p.x, p.y);
                let (ox, oy) = (fixed(o.x, 0), fixed(o.y, 0));
                let (mx, my) = (fixed(m.x, 0), fixed(m.y, 0));
                let _ = writeln!(out, r#"<circle cx="{ox}" cy="{oy}" r="{radius}">"#);
                let _ = writeln!(out, "{}", animate_element("cx", &ox, &mx));
                let _ = writeln!(out, "{}", animate_element("cy", &oy, &my));
                out.push_str("</circle>\n");
            }
        }
    }
}

/// Filled disc outline for the raster back-end.
pub fn circle_path(center: Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    vello_cpu::kurbo::Circle::new((center.x, center.y), radius).to_path(0.1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/points.rs"]
mod tests;
