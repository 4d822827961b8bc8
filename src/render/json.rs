//! JSON back-end: `{ region_name: path_d }` at the fully morphed pose.

use std::collections::BTreeMap;

use geo::MultiPolygon;

use crate::feed::Region;
use crate::foundation::core::{Point, Slide};
use crate::foundation::error::{MapError, MapResult};
use crate::render::backend::{MapBackend, Projection};
use crate::render::path::path_d;

/// Collects one path string per region, keyed by name.
pub struct JsonPaths<'a> {
    projection: Projection<'a>,
    decimals: usize,
    paths: BTreeMap<String, String>,
}

impl<'a> JsonPaths<'a> {
    /// Empty collection writing `decimals` places per coordinate.
    pub fn new(projection: Projection<'a>, decimals: usize) -> Self {
        Self {
            projection,
            decimals,
            paths: BTreeMap::new(),
        }
    }

    /// The collected paths.
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.paths
    }

    /// Serialize the collected paths as a JSON object.
    pub fn finish(self) -> MapResult<String> {
        Ok(serde_json::to_string(&self.paths)?)
    }
}

impl MapBackend for JsonPaths<'_> {
    fn draw_outline(&mut self, _outline: &MultiPolygon<f64>) -> MapResult<()> {
        Err(MapError::unsupported("the world outline is not available in JSON output"))
    }

    fn draw_region(&mut self, region: &Region) -> MapResult<()> {
        let d = path_d(&region.shape, &self.projection.at(Slide::MORPHED), self.decimals);
        self.paths.insert(region.name.clone(), d);
        Ok(())
    }

    fn draw_points(&mut self, _points: &[Point]) -> MapResult<()> {
        Err(MapError::unsupported("point overlays are not available in JSON output"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/json.rs"]
mod tests;
