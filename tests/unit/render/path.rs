use super::*;
use geo::{LineString, MultiPolygon, Polygon, polygon};

use crate::foundation::core::{Bounds, Slide};
use crate::viewport::{SizeSpec, Viewport};

fn raw_viewport() -> Viewport {
    Viewport::new(Bounds::new(0.0, 0.0, 10.0, 10.0), SizeSpec::Native, (0, 0)).unwrap()
}

#[derive(Default)]
struct Recorder {
    moves: usize,
    lines: usize,
    closes: usize,
    points: Vec<Point>,
}

impl PathSink for Recorder {
    fn move_to(&mut self, p: Point) {
        self.moves += 1;
        self.points.push(p);
    }
    fn line_to(&mut self, p: Point) {
        self.lines += 1;
        self.points.push(p);
    }
    fn close(&mut self) {
        self.closes += 1;
    }
}

fn square_with_hole() -> Polygon<f64> {
    polygon!(
        exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
        interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0)]],
    )
}

#[test]
fn closed_ring_drops_duplicate_closing_vertex() {
    let vp = raw_viewport();
    let r = CoordinateResolver::new(&vp, None, Slide::MORPHED);
    let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    let mut rec = Recorder::default();
    emit_ring(&ring, &r, &mut rec);
    assert_eq!((rec.moves, rec.lines, rec.closes), (1, 2, 1));
    assert_eq!(rec.points.len(), 3);
}

#[test]
fn empty_ring_emits_nothing() {
    let vp = raw_viewport();
    let r = CoordinateResolver::new(&vp, None, Slide::MORPHED);
    let mut rec = Recorder::default();
    emit_ring(&LineString::new(vec![]), &r, &mut rec);
    assert_eq!((rec.moves, rec.lines, rec.closes), (0, 0, 0));
}

#[test]
fn every_ring_closes_exactly_once() {
    let vp = raw_viewport();
    let r = CoordinateResolver::new(&vp, None, Slide::MORPHED);
    let mp = MultiPolygon::new(vec![square_with_hole(), square_with_hole()]);
    let mut rec = Recorder::default();
    emit_multipolygon(&mp, &r, &mut rec);
    assert_eq!(rec.moves, 4);
    assert_eq!(rec.closes, 4);
    assert_eq!(rec.lines, 2 * (3 + 2));
}

#[test]
fn path_data_is_m_l_z_in_raw_coordinates() {
    let vp = raw_viewport();
    let r = CoordinateResolver::new(&vp, None, Slide::MORPHED);
    let mp = MultiPolygon::new(vec![square_with_hole()]);
    assert_eq!(
        path_d(&mp, &r, 0),
        "M 0 0 L 4 0 L 4 -4 L 0 -4 Z M 1 -1 L 2 -1 L 2 -2 Z"
    );
}

#[test]
fn path_data_honours_decimal_places() {
    let vp = raw_viewport();
    let r = CoordinateResolver::new(&vp, None, Slide::MORPHED);
    let mp = MultiPolygon::new(vec![polygon![
        (x: 0.126, y: 0.0),
        (x: 1.0, y: 0.0),
        (x: 1.0, y: 1.0),
    ]]);
    assert_eq!(
        path_d(&mp, &r, 2),
        "M 0.13 0.00 L 1.00 0.00 L 1.00 -1.00 Z"
    );
}

#[test]
fn small_negatives_rounding_to_zero_print_unsigned() {
    let mut data = PathData::new(0);
    data.move_to(Point::new(-0.3, -0.0));
    data.line_to(Point::new(-0.7, 0.4));
    data.close();
    assert_eq!(data.into_string(), "M 0 0 L -1 0 Z");

    assert_eq!(fixed(-0.004, 2), "0.00");
    assert_eq!(fixed(-0.006, 2), "-0.01");
    assert_eq!(fixed(-12.0, 0), "-12");
}

#[test]
fn bez_path_sink_counts_match() {
    let vp = raw_viewport();
    let r = CoordinateResolver::new(&vp, None, Slide::MORPHED);
    let mut path = vello_cpu::kurbo::BezPath::new();
    emit_polygon(&square_with_hole(), &r, &mut path);
    let closes = path
        .elements()
        .iter()
        .filter(|el| matches!(el, vello_cpu::kurbo::PathEl::ClosePath))
        .count();
    assert_eq!(closes, 2);
    assert_eq!(path.elements().len(), 4 + 1 + 3 + 1);
}
