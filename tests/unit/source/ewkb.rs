use super::*;
use geo::polygon;

fn be_polygon_with_srid() -> Vec<u8> {
    let mut out = vec![0u8];
    out.extend_from_slice(&(WKB_POLYGON | EWKB_SRID).to_be_bytes());
    out.extend_from_slice(&4326i32.to_be_bytes());
    out.extend_from_slice(&1u32.to_be_bytes());
    out.extend_from_slice(&4u32.to_be_bytes());
    for (x, y) in [(0.0f64, 0.0f64), (4.0, 0.0), (4.0, 3.0), (0.0, 0.0)] {
        out.extend_from_slice(&x.to_be_bytes());
        out.extend_from_slice(&y.to_be_bytes());
    }
    out
}

#[test]
fn decodes_big_endian_polygon_as_multipolygon() {
    let (srid, mp) = decode_ewkb(&be_polygon_with_srid()).unwrap();
    assert_eq!(srid, Some(4326));
    assert_eq!(mp.0.len(), 1);
    let ext = mp.0[0].exterior();
    assert_eq!(ext.0.len(), 4);
    assert_eq!(ext.0[2], Coord { x: 4.0, y: 3.0 });
}

#[test]
fn encoded_multipolygon_with_hole_decodes_to_same_shape() {
    let square = polygon!(
        exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
        interiors: [[(x: 2.0, y: 2.0), (x: 4.0, y: 2.0), (x: 4.0, y: 4.0)]],
    );
    let islet = polygon![(x: 20.0, y: 20.0), (x: 21.0, y: 20.0), (x: 21.0, y: 21.0)];
    let mp = MultiPolygon::new(vec![square, islet]);

    let (srid, back) = decode_ewkb(&encode_ewkb(&mp, 954030)).unwrap();
    assert_eq!(srid, Some(954030));
    assert_eq!(back, mp);
}

#[test]
fn z_ordinates_are_discarded() {
    let mut out = vec![1u8];
    out.extend_from_slice(&(WKB_POLYGON | EWKB_Z).to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&3u32.to_le_bytes());
    for (x, y, z) in [(0.0f64, 0.0f64, 9.0f64), (1.0, 0.0, 9.0), (0.0, 0.0, 9.0)] {
        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
        out.extend_from_slice(&z.to_le_bytes());
    }
    let (srid, mp) = decode_ewkb(&out).unwrap();
    assert_eq!(srid, None);
    assert_eq!(mp.0[0].exterior().0[1], Coord { x: 1.0, y: 0.0 });
}

#[test]
fn truncated_and_foreign_geometry_are_data_source_errors() {
    let bytes = be_polygon_with_srid();
    let err = decode_ewkb(&bytes[..bytes.len() - 3]).unwrap_err();
    assert!(matches!(err, MapError::DataSource(_)));

    let mut point = vec![1u8];
    point.extend_from_slice(&1u32.to_le_bytes());
    point.extend_from_slice(&0.0f64.to_le_bytes());
    point.extend_from_slice(&0.0f64.to_le_bytes());
    assert!(matches!(
        decode_ewkb(&point).unwrap_err(),
        MapError::DataSource(_)
    ));

    assert!(decode_ewkb(&[7u8, 0, 0, 0, 0]).is_err());
}

#[test]
fn hex_accepts_postgres_bytea_prefix() {
    assert_eq!(decode_hex("\\x01ff").unwrap(), vec![0x01, 0xff]);
    assert_eq!(decode_hex("0A0b").unwrap(), vec![0x0a, 0x0b]);
    assert_eq!(encode_hex(&[0x0a, 0xff]), "0AFF");
    assert!(decode_hex("abc").is_err());
    assert!(decode_hex("zz").is_err());
    assert!(matches!(decode_hex("0g"), Err(MapError::DataSource(_))));
}
