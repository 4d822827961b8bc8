//! File-backed geometry source.
//!
//! A catalog is a JSON document holding map descriptors, region geometry as hex EWKB (the form
//! PostGIS prints), dataset membership and overlay point tables. All geometry shares one SRID;
//! reprojection is not available here.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context as _;
use geo::{Intersects, MultiPolygon, Simplify};

use crate::foundation::core::{Bounds, Point};
use crate::foundation::error::{MapError, MapResult};
use crate::source::ewkb::{decode_ewkb, decode_hex, encode_ewkb, encode_hex};
use crate::source::simplification::SimplificationPolicy;
use crate::source::{
    GeometrySource, MapDescriptor, MapProvider, RegionQuery, RegionRow, RowCursor,
};

/// On-disk catalog document.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    /// SRID shared by every geometry in the catalog.
    pub srid: i32,
    /// Map descriptors, looked up by name.
    #[serde(default)]
    pub maps: Vec<MapDescriptor>,
    /// Region geometry for every division.
    #[serde(default)]
    pub regions: Vec<CatalogRegion>,
    /// Dataset name -> names of regions that have a value in it.
    #[serde(default)]
    pub datasets: BTreeMap<String, BTreeSet<String>>,
    /// Point table name -> `[x, y]` locations.
    #[serde(default)]
    pub points: BTreeMap<String, Vec<[f64; 2]>>,
    /// Hex EWKB of the world outline.
    #[serde(default)]
    pub outline: Option<String>,
}

/// One stored region.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CatalogRegion {
    /// Region name.
    pub name: String,
    /// Division this region belongs to.
    pub division_id: i64,
    /// Hex EWKB polygon or multipolygon.
    pub geometry: String,
}

impl CatalogRegion {
    /// Store `geometry` as hex EWKB tagged with `srid`.
    pub fn from_geometry(
        name: impl Into<String>,
        division_id: i64,
        geometry: &MultiPolygon<f64>,
        srid: i32,
    ) -> Self {
        Self {
            name: name.into(),
            division_id,
            geometry: encode_hex(&encode_ewkb(geometry, srid)),
        }
    }
}

/// [`MapProvider`] and [`GeometrySource`] over an in-memory [`Catalog`].
#[derive(Clone, Debug)]
pub struct CatalogSource {
    catalog: Catalog,
}

impl CatalogSource {
    /// Wrap a parsed catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Parse a catalog from JSON.
    pub fn from_reader(reader: impl Read) -> MapResult<Self> {
        let catalog: Catalog = serde_json::from_reader(reader)?;
        Ok(Self::new(catalog))
    }

    /// Read a catalog file.
    pub fn from_path(path: &Path) -> MapResult<Self> {
        let f = File::open(path).with_context(|| format!("open catalog '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn check_srid(&self, srid: i32) -> MapResult<()> {
        if srid != self.catalog.srid {
            return Err(MapError::data_source(format!(
                "catalog stores SRID {}, cannot project to SRID {srid}",
                self.catalog.srid
            )));
        }
        Ok(())
    }

    fn prepare_row(
        &self,
        region: &CatalogRegion,
        policy: &SimplificationPolicy,
        bbox: Option<Bounds>,
        members: Option<&BTreeSet<String>>,
    ) -> MapResult<Option<RegionRow>> {
        let bytes = decode_hex(&region.geometry)
            .map_err(|e| MapError::data_source(format!("region '{}': {e}", region.name)))?;
        let (_, geom) = decode_ewkb(&bytes)
            .map_err(|e| MapError::data_source(format!("region '{}': {e}", region.name)))?;

        if let Some(b) = bbox {
            if !geom.intersects(&b.to_geo().to_polygon()) {
                return Ok(None);
            }
        }

        let tolerance = policy.tolerance_for(&region.name);
        let geom = if tolerance > 0.0 {
            geom.simplify(&tolerance)
        } else {
            geom
        };

        Ok(Some(RegionRow {
            name: region.name.clone(),
            geometry: encode_ewkb(&geom, self.catalog.srid),
            has_data: members.is_some_and(|m| m.contains(&region.name)),
        }))
    }
}

impl MapProvider for CatalogSource {
    fn load_map(&self, name: &str) -> MapResult<MapDescriptor> {
        self.catalog
            .maps
            .iter()
            .find(|m| m.name == name)
            .cloned()
            .ok_or_else(|| MapError::data_source(format!("no map named '{name}' in catalog")))
    }
}

impl GeometrySource for CatalogSource {
    fn fetch_regions<'a>(&'a self, query: &RegionQuery<'_>) -> MapResult<RowCursor<'a>> {
        self.check_srid(query.srid)?;

        let division = query.division_id;
        let policy = query.simplification.clone();
        let bbox = query.bbox;
        let only = query.region.map(str::to_owned);
        // Unknown datasets behave like empty ones: every region reports no data.
        let members = query.dataset.and_then(|d| self.catalog.datasets.get(d));

        let rows = self
            .catalog
            .regions
            .iter()
            .filter(move |r| r.division_id == division)
            .filter(move |r| only.as_deref().is_none_or(|n| n == r.name))
            .filter_map(move |r| self.prepare_row(r, &policy, bbox, members).transpose());
        Ok(Box::new(rows))
    }

    fn fetch_points(&self, table: &str, srid: i32) -> MapResult<Vec<Point>> {
        self.check_srid(srid)?;
        let points = self
            .catalog
            .points
            .get(table)
            .ok_or_else(|| MapError::data_source(format!("no point table named '{table}'")))?;
        Ok(points.iter().map(|[x, y]| Point::new(*x, *y)).collect())
    }

    fn fetch_outline(&self, srid: i32) -> MapResult<Option<Vec<u8>>> {
        self.check_srid(srid)?;
        self.catalog.outline.as_deref().map(decode_hex).transpose()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/catalog.rs"]
mod tests;
