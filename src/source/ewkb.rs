//! Extended well-known-binary codec for (multi)polygon geometry.
//!
//! Decoding accepts both byte orders, an optional embedded SRID and Z/M ordinates (which are
//! discarded). Encoding always writes little-endian, SRID-tagged multipolygons.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::foundation::error::{MapError, MapResult};

const WKB_POLYGON: u32 = 3;
const WKB_MULTIPOLYGON: u32 = 6;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// Decode EWKB (or plain WKB) bytes into a multipolygon and the embedded SRID, if any.
///
/// A single polygon is promoted to a one-member multipolygon.
pub fn decode_ewkb(bytes: &[u8]) -> MapResult<(Option<i32>, MultiPolygon<f64>)> {
    let mut r = Reader::new(bytes);
    let header = r.header()?;
    let geom = match header.kind {
        WKB_POLYGON => MultiPolygon::new(vec![r.polygon_body(header.dims)?]),
        WKB_MULTIPOLYGON => r.multipolygon_body()?,
        other => {
            return Err(MapError::data_source(format!(
                "unsupported geometry type {other} (expected polygon or multipolygon)"
            )));
        }
    };
    if !r.is_empty() {
        return Err(MapError::data_source(format!(
            "{} trailing bytes after geometry",
            r.remaining()
        )));
    }
    Ok((header.srid, geom))
}

/// Encode a multipolygon as little-endian EWKB, tagged with `srid`.
pub fn encode_ewkb(geom: &MultiPolygon<f64>, srid: i32) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(1u8);
    out.extend_from_slice(&(WKB_MULTIPOLYGON | EWKB_SRID).to_le_bytes());
    out.extend_from_slice(&srid.to_le_bytes());
    out.extend_from_slice(&(geom.0.len() as u32).to_le_bytes());
    for polygon in &geom.0 {
        out.push(1u8);
        out.extend_from_slice(&WKB_POLYGON.to_le_bytes());
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        out.extend_from_slice(&(1 + polygon.interiors().len() as u32).to_le_bytes());
        for ring in rings {
            out.extend_from_slice(&(ring.0.len() as u32).to_le_bytes());
            for c in &ring.0 {
                out.extend_from_slice(&c.x.to_le_bytes());
                out.extend_from_slice(&c.y.to_le_bytes());
            }
        }
    }
    out
}

/// Hex text as printed by PostGIS for `bytea` / EWKB columns.
pub fn decode_hex(text: &str) -> MapResult<Vec<u8>> {
    let text = text.trim();
    let text = text.strip_prefix("\\x").unwrap_or(text);
    hex::decode(text).map_err(|e| MapError::data_source(format!("invalid hex geometry: {e}")))
}

/// Upper-case hex, the form PostGIS prints.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

#[derive(Clone, Copy, Debug)]
struct Header {
    kind: u32,
    dims: usize,
    srid: Option<i32>,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    little_endian: bool,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            little_endian: true,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take<const N: usize>(&mut self) -> MapResult<[u8; N]> {
        let end = self.pos + N;
        let slice = self.bytes.get(self.pos..end).ok_or_else(|| {
            MapError::data_source(format!("geometry truncated at byte {}", self.pos))
        })?;
        self.pos = end;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn u32(&mut self) -> MapResult<u32> {
        let b = self.take::<4>()?;
        Ok(if self.little_endian {
            u32::from_le_bytes(b)
        } else {
            u32::from_be_bytes(b)
        })
    }

    fn f64(&mut self) -> MapResult<f64> {
        let b = self.take::<8>()?;
        Ok(if self.little_endian {
            f64::from_le_bytes(b)
        } else {
            f64::from_be_bytes(b)
        })
    }

    fn header(&mut self) -> MapResult<Header> {
        let [order] = self.take::<1>()?;
        self.little_endian = match order {
            0 => false,
            1 => true,
            other => {
                return Err(MapError::data_source(format!(
                    "invalid byte order marker {other}"
                )));
            }
        };
        let raw = self.u32()?;
        let mut dims = 2;
        if raw & EWKB_Z != 0 {
            dims += 1;
        }
        if raw & EWKB_M != 0 {
            dims += 1;
        }
        let srid = if raw & EWKB_SRID != 0 {
            Some(self.u32()? as i32)
        } else {
            None
        };
        // ISO WKB encodes Z/M as 1000/2000/3000 offsets on the type code.
        let base = raw & 0x0fff_ffff;
        let (kind, iso_dims) = match base / 1000 {
            0 => (base, 0),
            1 | 2 => (base % 1000, 1),
            3 => (base % 1000, 2),
            _ => {
                return Err(MapError::data_source(format!(
                    "unrecognised geometry type code {raw:#x}"
                )));
            }
        };
        Ok(Header {
            kind,
            dims: dims + iso_dims,
            srid,
        })
    }

    fn count(&mut self) -> MapResult<usize> {
        let n = self.u32()? as usize;
        // Every element takes at least 4 bytes; reject counts the buffer cannot hold.
        if n.saturating_mul(4) > self.remaining() {
            return Err(MapError::data_source(format!(
                "element count {n} exceeds remaining geometry bytes"
            )));
        }
        Ok(n)
    }

    fn ring(&mut self, dims: usize) -> MapResult<LineString<f64>> {
        let n = self.count()?;
        let mut coords = Vec::with_capacity(n);
        for _ in 0..n {
            let x = self.f64()?;
            let y = self.f64()?;
            for _ in 2..dims {
                self.f64()?;
            }
            coords.push(Coord { x, y });
        }
        Ok(LineString::new(coords))
    }

    fn polygon_body(&mut self, dims: usize) -> MapResult<Polygon<f64>> {
        let rings = self.count()?;
        if rings == 0 {
            return Ok(Polygon::new(LineString::new(Vec::new()), Vec::new()));
        }
        let exterior = self.ring(dims)?;
        let interiors = (1..rings)
            .map(|_| self.ring(dims))
            .collect::<MapResult<Vec<_>>>()?;
        Ok(Polygon::new(exterior, interiors))
    }

    fn multipolygon_body(&mut self) -> MapResult<MultiPolygon<f64>> {
        let n = self.count()?;
        let mut polygons = Vec::with_capacity(n);
        for _ in 0..n {
            let header = self.header()?;
            if header.kind != WKB_POLYGON {
                return Err(MapError::data_source(format!(
                    "multipolygon member has type {}",
                    header.kind
                )));
            }
            polygons.push(self.polygon_body(header.dims)?);
        }
        Ok(MultiPolygon::new(polygons))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/ewkb.rs"]
mod tests;
