use geo::{MultiPolygon, polygon};

use super::*;
use crate::foundation::core::Bounds;
use crate::foundation::error::MapError;
use crate::interp::{Identity, Interpolate};
use crate::viewport::{SizeSpec, Viewport};

fn triangle(name: &str) -> Region {
    Region {
        name: name.into(),
        shape: MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 4.0, y: 0.0),
            (x: 0.0, y: 4.0),
        ]]),
        has_data: true,
    }
}

fn viewport() -> Viewport {
    Viewport::new(
        Bounds::new(0.0, 0.0, 4.0, 4.0),
        SizeSpec::Explicit {
            width: 8,
            height: 8,
        },
        (0, 0),
    )
    .unwrap()
}

#[test]
fn maps_region_names_to_path_data() {
    let vp = viewport();
    let mut json = JsonPaths::new(Projection::new(&vp, None), 1);
    json.draw_region(&triangle("b")).unwrap();
    json.draw_region(&triangle("a")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json.finish().unwrap()).unwrap();
    assert_eq!(value["a"], "M 0.0 8.0 L 8.0 8.0 L 0.0 0.0 Z");
    assert_eq!(value.as_object().unwrap().len(), 2);
}

#[test]
fn identity_interpolation_matches_none() {
    let vp = viewport();
    let identity: &dyn Interpolate = &Identity;
    let mut plain = JsonPaths::new(Projection::new(&vp, None), 3);
    let mut warped = JsonPaths::new(Projection::new(&vp, Some(identity)), 3);
    plain.draw_region(&triangle("r")).unwrap();
    warped.draw_region(&triangle("r")).unwrap();
    assert_eq!(plain.into_map(), warped.into_map());
}

#[test]
fn outline_and_points_are_unsupported() {
    let vp = viewport();
    let mut json = JsonPaths::new(Projection::new(&vp, None), 0);
    assert!(matches!(
        json.draw_points(&[Point::new(1.0, 1.0)]),
        Err(MapError::Unsupported(_))
    ));
    assert!(matches!(
        json.draw_outline(&triangle("o").shape),
        Err(MapError::Unsupported(_))
    ));
}
