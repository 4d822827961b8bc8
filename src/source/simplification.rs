use std::collections::BTreeMap;

use crate::foundation::error::{MapError, MapResult};

/// Per-region simplification tolerance lookup, resolved once per run.
///
/// The geometry source receives the whole table and applies the tolerance for each region it
/// returns; nothing about query construction leaks into the renderer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimplificationPolicy {
    /// Tolerance for regions without an override; 0 disables simplification.
    pub default: f64,
    /// Region name -> tolerance.
    #[serde(default)]
    pub overrides: BTreeMap<String, f64>,
}

impl Default for SimplificationPolicy {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

impl SimplificationPolicy {
    /// A policy with no overrides.
    pub fn new(default: f64) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// Give every region in `regions` the same alternate tolerance.
    pub fn with_alternate<I, S>(mut self, tolerance: f64, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in regions {
            self.overrides.insert(name.into(), tolerance);
        }
        self
    }

    /// Merge a JSON object of `region name -> tolerance`. Later entries win.
    pub fn with_json(mut self, json: &str) -> MapResult<Self> {
        let parsed: BTreeMap<String, f64> = serde_json::from_str(json)
            .map_err(|e| MapError::configuration(format!("invalid simplification JSON: {e}")))?;
        self.overrides.extend(parsed);
        Ok(self)
    }

    /// The override for `region`, else the default.
    pub fn tolerance_for(&self, region: &str) -> f64 {
        self.overrides.get(region).copied().unwrap_or(self.default)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/simplification.rs"]
mod tests;
