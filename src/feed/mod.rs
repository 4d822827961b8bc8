//! Region feed: fetches rows from the geometry source and turns them into drawable regions.

/// Small-island removal.
pub mod islands;

use std::collections::BTreeSet;

use geo::{BoundingRect, MultiPolygon};

use crate::feed::islands::omit_small_islands;
use crate::foundation::core::Bounds;
use crate::foundation::error::{MapError, MapResult};
use crate::source::ewkb::decode_ewkb;
use crate::source::simplification::SimplificationPolicy;
use crate::source::{GeometrySource, MapDescriptor, RegionQuery, RegionRow};

/// A named area rendered as one filled/stroked shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Unique region name; becomes the SVG id and JSON key.
    pub name: String,
    /// Decoded, island-filtered geometry.
    pub shape: MultiPolygon<f64>,
    /// Whether the configured dataset has a value for this region.
    pub has_data: bool,
}

/// Options scoping which regions are fetched and how they are prepared.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Per-region simplification tolerances passed to the source.
    pub simplification: SimplificationPolicy,
    /// Dataset used to compute `has_data`.
    pub dataset: Option<String>,
    /// Render only this region.
    pub region: Option<String>,
    /// Regions dropped after fetch.
    pub exclude: BTreeSet<String>,
    /// Percentage threshold for [`omit_small_islands`]; `None` keeps every polygon.
    pub small_island_threshold: Option<f64>,
    /// Overrides the map's SRID.
    pub srid: Option<i32>,
}

/// Fetches region rows for one map and decodes them into [`Region`]s.
pub struct RegionFeed<'a> {
    source: &'a dyn GeometrySource,
    map: &'a MapDescriptor,
    config: &'a FeedConfig,
}

impl<'a> RegionFeed<'a> {
    /// Bind a source, map and feed options.
    pub fn new(
        source: &'a dyn GeometrySource,
        map: &'a MapDescriptor,
        config: &'a FeedConfig,
    ) -> Self {
        Self {
            source,
            map,
            config,
        }
    }

    /// The SRID rows are projected to: the override if set, else the map's.
    pub fn srid(&self) -> i32 {
        self.config.srid.unwrap_or(self.map.srid)
    }

    fn query(&self, bbox: Option<Bounds>) -> RegionQuery<'a> {
        RegionQuery {
            division_id: self.map.division_id,
            srid: self.srid(),
            simplification: &self.config.simplification,
            dataset: self.config.dataset.as_deref(),
            bbox,
            region: self.config.region.as_deref(),
        }
    }

    /// Single pass over the regions intersecting `bbox`, in source order.
    pub fn regions(
        &self,
        bbox: Option<Bounds>,
    ) -> MapResult<impl Iterator<Item = MapResult<Region>> + 'a> {
        let rows = self.source.fetch_regions(&self.query(bbox))?;
        let exclude = &self.config.exclude;
        let threshold = self.config.small_island_threshold;
        let tag_data = self.config.dataset.is_some();

        Ok(rows.filter_map(move |row| match row {
            Err(e) => Some(Err(e)),
            Ok(row) if exclude.contains(&row.name) => {
                tracing::debug!(region = %row.name, "excluded region");
                None
            }
            Ok(row) => Some(decode_region(row, threshold, tag_data)),
        }))
    }

    /// Bounds of the selected region, used to narrow the viewport for single-region renders.
    pub fn region_bounds(&self, name: &str) -> MapResult<Bounds> {
        let query = RegionQuery {
            region: Some(name),
            ..self.query(None)
        };
        let row = self
            .source
            .fetch_regions(&query)?
            .next()
            .ok_or_else(|| MapError::data_source(format!("region '{name}' not found")))??;
        let region = decode_region(row, self.config.small_island_threshold, false)?;
        region
            .shape
            .bounding_rect()
            .map(Bounds::from_geo)
            .ok_or_else(|| MapError::data_source(format!("region '{name}' has empty geometry")))
    }
}

fn decode_region(row: RegionRow, threshold: Option<f64>, tag_data: bool) -> MapResult<Region> {
    let (_, shape) = decode_ewkb(&row.geometry)
        .map_err(|e| MapError::data_source(format!("region '{}': {e}", row.name)))?;
    let shape = match threshold {
        Some(pct) => omit_small_islands(&shape, pct),
        None => shape,
    };
    Ok(Region {
        name: row.name,
        shape,
        has_data: tag_data && row.has_data,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/feed/feed.rs"]
mod tests;
