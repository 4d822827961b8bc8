//! External geometry collaborators: map descriptors, region rows and overlay points.

pub mod catalog;
pub mod ewkb;
/// Per-region simplification tolerances.
pub mod simplification;

use crate::foundation::core::{Bounds, Point};
use crate::foundation::error::MapResult;
use crate::source::simplification::SimplificationPolicy;

/// Read-only description of a map, fetched once per run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapDescriptor {
    /// Lookup name.
    pub name: String,
    /// Native SRID of the map's geometry.
    pub srid: i32,
    /// Canonical output width; zero means "raw geographic units".
    pub width: u32,
    /// Canonical output height; zero means "raw geographic units".
    pub height: u32,
    /// Governing bounding box for whole-map renders.
    pub bounds: Bounds,
    /// Scopes which regions belong to this map.
    pub division_id: i64,
}

/// Parameters of one region fetch.
#[derive(Clone, Copy, Debug)]
pub struct RegionQuery<'a> {
    /// Division the regions belong to.
    pub division_id: i64,
    /// Target SRID for returned geometry.
    pub srid: i32,
    /// Tolerances applied before geometry is returned.
    pub simplification: &'a SimplificationPolicy,
    /// When set, `has_data` reports membership in this dataset.
    pub dataset: Option<&'a str>,
    /// Intersection filter; full geometries are returned, never clipped.
    pub bbox: Option<Bounds>,
    /// Restrict the fetch to one named region.
    pub region: Option<&'a str>,
}

/// One row as delivered by the geometry source: pre-simplified, pre-projected EWKB.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionRow {
    /// Region name.
    pub name: String,
    /// EWKB bytes.
    pub geometry: Vec<u8>,
    /// Membership in the queried dataset; false when no dataset was given.
    pub has_data: bool,
}

/// Single-pass cursor over fetched rows.
pub type RowCursor<'a> = Box<dyn Iterator<Item = MapResult<RegionRow>> + 'a>;

/// Looks up map descriptors by name.
pub trait MapProvider {
    /// Fetch the descriptor for `name`; unknown names are a data source error.
    fn load_map(&self, name: &str) -> MapResult<MapDescriptor>;
}

/// Source of region and point geometry.
pub trait GeometrySource {
    /// Rows matching `query`, in source order.
    fn fetch_regions<'a>(&'a self, query: &RegionQuery<'_>) -> MapResult<RowCursor<'a>>;

    /// Overlay points from `table`, projected to `srid`.
    fn fetch_points(&self, table: &str, srid: i32) -> MapResult<Vec<Point>>;

    /// Optional world outline (EWKB) projected to `srid`.
    fn fetch_outline(&self, srid: i32) -> MapResult<Option<Vec<u8>>>;
}
