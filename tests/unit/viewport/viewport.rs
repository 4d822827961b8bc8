use super::*;

fn world() -> Bounds {
    Bounds::new(-17_005_833.33, -8_625_154.47, 17_005_833.33, 8_625_154.47)
}

#[test]
fn grid_size_parses_width_x_height() {
    assert_eq!(
        "800x400".parse::<GridSize>().unwrap(),
        GridSize {
            width: 800,
            height: 400
        }
    );
    for bad in ["800", "800x", "x400", "80 0x400", "-1x2", "800X400", "1x2x3"] {
        assert!(
            bad.parse::<GridSize>().unwrap_err().is_configuration(),
            "{bad}"
        );
    }
}

#[test]
fn grid_and_box_are_mutually_exclusive() {
    let cfg = ViewportConfig {
        output_grid: Some("10x10".parse().unwrap()),
        fit_box: Some("20x20".parse().unwrap()),
        ..ViewportConfig::default()
    };
    assert!(cfg.size_spec().unwrap_err().is_configuration());

    let cfg = ViewportConfig {
        fit_box: Some("20x20".parse().unwrap()),
        width: Some(5),
        ..ViewportConfig::default()
    };
    assert!(cfg.size_spec().is_err());
}

#[test]
fn size_spec_selection() {
    let only_width = ViewportConfig {
        width: Some(300),
        ..ViewportConfig::default()
    };
    assert_eq!(only_width.size_spec().unwrap(), SizeSpec::Width(300));
    assert_eq!(
        ViewportConfig::default().size_spec().unwrap(),
        SizeSpec::Native
    );
}

#[test]
fn corners_map_exactly_for_explicit_size() {
    for b in [world(), Bounds::new(0.1, 0.2, 0.7, 0.9), Bounds::new(-3.3, 1e-3, 1e7 / 3.0, 17.17)] {
        let vp = Viewport::new(
            b,
            SizeSpec::Explicit {
                width: 977,
                height: 431,
            },
            (0, 0),
        )
        .unwrap();
        assert_eq!(vp.transform(b.x_min, b.y_min), Point::new(0.0, 431.0));
        assert_eq!(vp.transform(b.x_max, b.y_max), Point::new(977.0, 0.0));
    }
}

#[test]
fn transform_flips_y() {
    let vp = Viewport::new(
        Bounds::new(0.0, 0.0, 100.0, 50.0),
        SizeSpec::Explicit {
            width: 200,
            height: 100,
        },
        (0, 0),
    )
    .unwrap();
    assert_eq!(vp.transform(25.0, 10.0), Point::new(50.0, 80.0));
}

#[test]
fn fit_box_never_exceeds_box_and_keeps_aspect() {
    let boxes = [(200, 200), (1000, 10), (10, 1000), (640, 480), (1, 1)];
    let bounds = [world(), Bounds::new(0.0, 0.0, 3.0, 7.0), Bounds::new(5.0, 5.0, 6.0, 6.0)];
    for b in bounds {
        let aspect = b.aspect_ratio().unwrap();
        for (bw, bh) in boxes {
            let vp = Viewport::new(
                b,
                SizeSpec::FitBox {
                    width: bw,
                    height: bh,
                },
                (0, 0),
            )
            .unwrap();
            assert!(vp.width <= bw && vp.height <= bh, "{vp:?} in {bw}x{bh}");
            assert!(!vp.is_raw());
            if f64::from(bw) / f64::from(bh) > aspect {
                assert_eq!(vp.height, bh);
                let want = (f64::from(bh) * aspect).round().max(1.0);
                assert_eq!(f64::from(vp.width), want, "{vp:?} in {bw}x{bh}");
            } else {
                assert_eq!(vp.width, bw);
                let want = (f64::from(bw) / aspect).round().max(1.0);
                assert_eq!(f64::from(vp.height), want, "{vp:?} in {bw}x{bh}");
            }
        }
    }
}

#[test]
fn tiny_box_on_wide_bounds_stays_scaled() {
    let b = Bounds::new(0.0, 0.0, 30.0, 10.0);
    let vp = Viewport::new(
        b,
        SizeSpec::FitBox {
            width: 1,
            height: 1,
        },
        (0, 0),
    )
    .unwrap();
    assert_eq!((vp.width, vp.height), (1, 1));
    assert!(!vp.is_raw());
    assert_eq!(vp.transform(30.0, 10.0), Point::new(1.0, 0.0));
    assert_eq!(vp.view_box(), (0.0, 0.0, 1.0, 1.0));

    let vp = Viewport::new(b, SizeSpec::Width(1), (0, 0)).unwrap();
    assert_eq!((vp.width, vp.height), (1, 1));
    let tall = Bounds::new(0.0, 0.0, 10.0, 30.0);
    let vp = Viewport::new(tall, SizeSpec::Height(1), (0, 0)).unwrap();
    assert_eq!((vp.width, vp.height), (1, 1));

    let zero_box = SizeSpec::FitBox {
        width: 0,
        height: 5,
    };
    assert!(Viewport::new(b, zero_box, (0, 0)).unwrap_err().is_configuration());
}

#[test]
fn single_dimension_preserves_aspect() {
    let b = Bounds::new(0.0, 0.0, 300.0, 100.0);
    let vp = Viewport::new(b, SizeSpec::Width(90), (0, 0)).unwrap();
    assert_eq!((vp.width, vp.height), (90, 30));
    let vp = Viewport::new(b, SizeSpec::Height(7), (0, 0)).unwrap();
    assert_eq!((vp.width, vp.height), (21, 7));
}

#[test]
fn native_size_and_raw_passthrough() {
    let b = Bounds::new(10.0, 20.0, 30.0, 60.0);
    let vp = Viewport::new(b, SizeSpec::Native, (640, 320)).unwrap();
    assert_eq!((vp.width, vp.height), (640, 320));

    let raw = Viewport::new(b, SizeSpec::Native, (0, 0)).unwrap();
    assert!(raw.is_raw());
    assert_eq!(raw.transform(12.5, 33.0), Point::new(12.5, -33.0));
    assert_eq!(raw.view_box(), (10.0, -60.0, 20.0, 40.0));
}

#[test]
fn degenerate_bounds_are_rejected_when_scaling() {
    let flat = Bounds::new(0.0, 0.0, 10.0, 0.0);
    assert!(Viewport::new(flat, SizeSpec::Width(100), (0, 0)).is_err());
    assert!(
        Viewport::new(
            flat,
            SizeSpec::Explicit {
                width: 10,
                height: 10
            },
            (0, 0)
        )
        .is_err()
    );
}
