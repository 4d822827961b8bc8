//! Ring emission shared by every back-end.
//!
//! Rings are stored closed (last coordinate repeats the first). Emitters drop that
//! trailing duplicate and issue an explicit close instead, so each ring yields one
//! `move_to`, a `line_to` per remaining vertex, and one `close`.

use std::fmt::Write as _;

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::foundation::core::Point;
use crate::interp::CoordinateResolver;

/// Receives the commands of one path.
pub trait PathSink {
    /// Start a new subpath.
    fn move_to(&mut self, p: Point);
    /// Straight segment to `p`.
    fn line_to(&mut self, p: Point);
    /// Close the current subpath.
    fn close(&mut self);
}

fn open_ring(coords: &[Coord<f64>]) -> &[Coord<f64>] {
    match coords {
        [first, .., last] if first == last => &coords[..coords.len() - 1],
        _ => coords,
    }
}

/// One ring: `move_to`, a `line_to` per remaining vertex, `close`. Empty rings emit nothing.
pub fn emit_ring<S: PathSink + ?Sized>(
    ring: &LineString<f64>,
    resolver: &CoordinateResolver<'_>,
    sink: &mut S,
) {
    let Some((first, rest)) = open_ring(&ring.0).split_first() else {
        return;
    };
    sink.move_to(resolver.resolve(first.x, first.y));
    for c in rest {
        sink.line_to(resolver.resolve(c.x, c.y));
    }
    sink.close();
}

/// Exterior ring first, then every interior ring.
pub fn emit_polygon<S: PathSink + ?Sized>(
    polygon: &Polygon<f64>,
    resolver: &CoordinateResolver<'_>,
    sink: &mut S,
) {
    emit_ring(polygon.exterior(), resolver, sink);
    for interior in polygon.interiors() {
        emit_ring(interior, resolver, sink);
    }
}

/// Every polygon of `shape`, in order.
pub fn emit_multipolygon<S: PathSink + ?Sized>(
    shape: &MultiPolygon<f64>,
    resolver: &CoordinateResolver<'_>,
    sink: &mut S,
) {
    for polygon in shape {
        emit_polygon(polygon, resolver, sink);
    }
}

/// Builds an SVG path `d` string with fixed decimal places.
#[derive(Clone, Debug)]
pub struct PathData {
    decimals: usize,
    d: String,
}

impl PathData {
    /// Empty path data writing `decimals` places per coordinate.
    pub fn new(decimals: usize) -> Self {
        Self {
            decimals,
            d: String::new(),
        }
    }

    /// True until the first command.
    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    /// The finished `d` string.
    pub fn into_string(self) -> String {
        self.d
    }

    fn command(&mut self, cmd: char, p: Point) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        let n = self.decimals;
        let _ = write!(self.d, "{cmd} {} {}", fixed(p.x, n), fixed(p.y, n));
    }
}

/// `v` with `decimals` places. Values that round to zero print unsigned.
pub(crate) fn fixed(v: f64, decimals: usize) -> String {
    let s = format!("{v:.decimals$}");
    match s.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_owned(),
        _ => s,
    }
}

impl PathSink for PathData {
    fn move_to(&mut self, p: Point) {
        self.command('M', p);
    }

    fn line_to(&mut self, p: Point) {
        self.command('L', p);
    }

    fn close(&mut self) {
        self.d.push_str(" Z");
    }
}

/// `d` attribute for a whole region at the resolver's slide.
pub fn path_d(
    shape: &MultiPolygon<f64>,
    resolver: &CoordinateResolver<'_>,
    decimals: usize,
) -> String {
    let mut data = PathData::new(decimals);
    emit_multipolygon(shape, resolver, &mut data);
    data.into_string()
}

impl PathSink for vello_cpu::kurbo::BezPath {
    fn move_to(&mut self, p: Point) {
        vello_cpu::kurbo::BezPath::move_to(self, (p.x, p.y));
    }

    fn line_to(&mut self, p: Point) {
        vello_cpu::kurbo::BezPath::line_to(self, (p.x, p.y));
    }

    fn close(&mut self) {
        self.close_path();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/path.rs"]
mod tests;
