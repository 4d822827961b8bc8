use geo::{Area, MultiPolygon};

/// Drop polygons whose area is below `threshold_pct` percent of the largest polygon's area.
///
/// The largest polygon always survives. If nothing would remain, the input is returned as-is.
pub fn omit_small_islands(shape: &MultiPolygon<f64>, threshold_pct: f64) -> MultiPolygon<f64> {
    let areas: Vec<f64> = shape.0.iter().map(|p| p.unsigned_area()).collect();
    let max_area = areas.iter().copied().fold(0.0f64, f64::max);
    let cutoff = max_area * threshold_pct / 100.0;

    let kept: Vec<_> = shape
        .0
        .iter()
        .zip(&areas)
        .filter(|(_, area)| **area >= cutoff)
        .map(|(p, _)| p.clone())
        .collect();

    if kept.is_empty() {
        return shape.clone();
    }
    MultiPolygon::new(kept)
}

#[cfg(test)]
#[path = "../../tests/unit/feed/islands.rs"]
mod tests;
