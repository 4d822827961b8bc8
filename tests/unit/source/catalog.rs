use super::*;
use geo::{CoordsIter, polygon};

const SRID: i32 = 954030;

fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: x, y: y),
        (x: x + size, y: y),
        (x: x + size, y: y + size),
        (x: x, y: y + size),
    ]])
}

fn wiggly() -> MultiPolygon<f64> {
    let mut coords = Vec::new();
    for i in 0..=20 {
        coords.push((i as f64, if i % 2 == 0 { 0.0 } else { 0.1 }));
    }
    coords.push((20.0, 10.0));
    coords.push((0.0, 10.0));
    MultiPolygon::new(vec![geo::Polygon::new(coords.into(), vec![])])
}

fn source() -> CatalogSource {
    let mut datasets = BTreeMap::new();
    datasets.insert(
        "population".to_string(),
        BTreeSet::from(["Alpha".to_string()]),
    );
    CatalogSource::new(Catalog {
        srid: SRID,
        maps: vec![MapDescriptor {
            name: "world".to_string(),
            srid: SRID,
            width: 200,
            height: 100,
            bounds: Bounds::new(0.0, 0.0, 200.0, 100.0),
            division_id: 1,
        }],
        regions: vec![
            CatalogRegion::from_geometry("Alpha", 1, &square(0.0, 0.0, 10.0), SRID),
            CatalogRegion::from_geometry("Beta", 1, &square(150.0, 50.0, 60.0), SRID),
            CatalogRegion::from_geometry("Gamma", 2, &square(0.0, 0.0, 10.0), SRID),
            CatalogRegion::from_geometry("Wiggly", 1, &wiggly(), SRID),
        ],
        datasets,
        points: BTreeMap::from([("cities".to_string(), vec![[1.0, 2.0], [3.0, 4.0]])]),
        outline: None,
    })
}

fn names(src: &CatalogSource, query: &RegionQuery<'_>) -> Vec<String> {
    src.fetch_regions(query)
        .unwrap()
        .map(|r| r.unwrap().name)
        .collect()
}

fn query(policy: &SimplificationPolicy) -> RegionQuery<'_> {
    RegionQuery {
        division_id: 1,
        srid: SRID,
        simplification: policy,
        dataset: None,
        bbox: None,
        region: None,
    }
}

#[test]
fn regions_are_scoped_to_division() {
    let src = source();
    let policy = SimplificationPolicy::new(0.0);
    assert_eq!(names(&src, &query(&policy)), ["Alpha", "Beta", "Wiggly"]);
}

#[test]
fn single_region_selection() {
    let src = source();
    let policy = SimplificationPolicy::new(0.0);
    let q = RegionQuery {
        region: Some("Beta"),
        ..query(&policy)
    };
    assert_eq!(names(&src, &q), ["Beta"]);
}

#[test]
fn bbox_filter_intersects_without_clipping() {
    let src = source();
    let policy = SimplificationPolicy::new(0.0);
    let q = RegionQuery {
        bbox: Some(Bounds::new(140.0, 40.0, 160.0, 60.0)),
        ..query(&policy)
    };
    let rows: Vec<_> = src.fetch_regions(&q).unwrap().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 1);
    let (_, geom) = decode_ewkb(&rows[0].geometry).unwrap();
    assert_eq!(geom, square(150.0, 50.0, 60.0));
}

#[test]
fn has_data_reflects_dataset_membership() {
    let src = source();
    let policy = SimplificationPolicy::new(0.0);
    let q = RegionQuery {
        dataset: Some("population"),
        ..query(&policy)
    };
    let flags: Vec<_> = src
        .fetch_regions(&q)
        .unwrap()
        .map(|r| {
            let r = r.unwrap();
            (r.name, r.has_data)
        })
        .collect();
    assert_eq!(
        flags,
        [
            ("Alpha".to_string(), true),
            ("Beta".to_string(), false),
            ("Wiggly".to_string(), false)
        ]
    );

    let no_dataset: Vec<_> = src
        .fetch_regions(&query(&policy))
        .unwrap()
        .map(|r| r.unwrap().has_data)
        .collect();
    assert!(no_dataset.iter().all(|h| !h));
}

#[test]
fn per_region_tolerance_is_applied() {
    let src = source();
    let coarse = SimplificationPolicy::new(0.0).with_alternate(1.0, ["Wiggly"]);
    let q = RegionQuery {
        region: Some("Wiggly"),
        ..query(&coarse)
    };
    let row = src.fetch_regions(&q).unwrap().next().unwrap().unwrap();
    let (_, simplified) = decode_ewkb(&row.geometry).unwrap();
    assert!(simplified.coords_count() < wiggly().coords_count());

    let exact = SimplificationPolicy::new(0.0);
    let q = RegionQuery {
        region: Some("Wiggly"),
        ..query(&exact)
    };
    let row = src.fetch_regions(&q).unwrap().next().unwrap().unwrap();
    let (_, untouched) = decode_ewkb(&row.geometry).unwrap();
    assert_eq!(untouched, wiggly());
}

#[test]
fn foreign_srid_and_unknown_names_fail() {
    let src = source();
    let policy = SimplificationPolicy::new(0.0);
    let q = RegionQuery {
        srid: 4326,
        ..query(&policy)
    };
    assert!(matches!(
        src.fetch_regions(&q).err().unwrap(),
        MapError::DataSource(_)
    ));
    assert!(src.load_map("moon").is_err());
    assert!(src.fetch_points("villages", SRID).is_err());
    assert_eq!(src.load_map("world").unwrap().division_id, 1);
}

#[test]
fn malformed_geometry_surfaces_as_row_error() {
    let mut catalog = source().catalog().clone();
    catalog.regions.push(CatalogRegion {
        name: "Broken".to_string(),
        division_id: 1,
        geometry: "0106".to_string(),
    });
    let src = CatalogSource::new(catalog);
    let policy = SimplificationPolicy::new(0.0);
    let results: Vec<_> = src.fetch_regions(&query(&policy)).unwrap().collect();
    assert!(matches!(
        results.last().unwrap(),
        Err(MapError::DataSource(_))
    ));
}

#[test]
fn catalog_parses_from_json() {
    let json = r#"{
        "srid": 4326,
        "maps": [{"name": "m", "srid": 4326, "width": 10, "height": 5,
                  "bounds": {"x_min": 0, "y_min": 0, "x_max": 2, "y_max": 1},
                  "division_id": 7}],
        "points": {"p": [[0.5, 0.5]]}
    }"#;
    let src = CatalogSource::from_reader(json.as_bytes()).unwrap();
    assert_eq!(src.load_map("m").unwrap().width, 10);
    assert_eq!(
        src.fetch_points("p", 4326).unwrap(),
        vec![Point::new(0.5, 0.5)]
    );
    assert_eq!(src.fetch_outline(4326).unwrap(), None);
}
