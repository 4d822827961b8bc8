//! Displacement grids produced by the diffusion cartogram program.
//!
//! A grid for a map of `W x H` cells holds `(W + 1) * (H + 1)` displaced vertex positions,
//! written as whitespace-separated `x y` pairs in grid units, row by row from the bottom.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Bounds;
use crate::foundation::error::{MapError, MapResult};
use crate::interp::Interpolate;
use crate::source::MapDescriptor;

/// Bilinear cartogram warp over a map's bounding box.
#[derive(Clone, Debug)]
pub struct CartogramGrid {
    bounds: Bounds,
    cols: usize,
    rows: usize,
    /// `(rows + 1) * (cols + 1)` displaced positions, row-major from the bottom row.
    nodes: Vec<(f64, f64)>,
}

impl CartogramGrid {
    /// Parse a grid sized by `map`'s canonical width and height.
    pub fn from_reader(mut reader: impl Read, map: &MapDescriptor) -> MapResult<Self> {
        if map.width == 0 || map.height == 0 {
            return Err(MapError::configuration(format!(
                "map '{}' has no grid dimensions for a cartogram",
                map.name
            )));
        }
        map.bounds.aspect_ratio()?;

        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .context("read cartogram grid")?;

        let cols = map.width as usize;
        let rows = map.height as usize;
        let expected = (cols + 1) * (rows + 1);

        let values = text
            .split_ascii_whitespace()
            .enumerate()
            .map(|(i, tok)| {
                tok.parse::<f64>().map_err(|_| {
                    MapError::data_source(format!("cartogram grid value {i} is not a number: '{tok}'"))
                })
            })
            .collect::<MapResult<Vec<_>>>()?;
        if values.len() != expected * 2 {
            return Err(MapError::data_source(format!(
                "cartogram grid for {cols}x{rows} map needs {expected} points, found {} values",
                values.len()
            )));
        }
        let nodes = values.chunks_exact(2).map(|p| (p[0], p[1])).collect();

        Ok(Self {
            bounds: map.bounds,
            cols,
            rows,
            nodes,
        })
    }

    /// Read a grid file from disk.
    pub fn from_path(path: &Path, map: &MapDescriptor) -> MapResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open cartogram grid '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f), map)
    }

    fn node(&self, col: usize, row: usize) -> (f64, f64) {
        self.nodes[row * (self.cols + 1) + col]
    }

    /// Displaced position of a point given in grid units.
    fn displace(&self, gx: f64, gy: f64) -> (f64, f64) {
        let (col, fx) = cell(gx, self.cols);
        let (row, fy) = cell(gy, self.rows);

        let (x00, y00) = self.node(col, row);
        let (x10, y10) = self.node(col + 1, row);
        let (x01, y01) = self.node(col, row + 1);
        let (x11, y11) = self.node(col + 1, row + 1);

        let lerp = |a: f64, b: f64, t: f64| a + (b - a) * t;
        (
            lerp(lerp(x00, x10, fx), lerp(x01, x11, fx), fy),
            lerp(lerp(y00, y10, fx), lerp(y01, y11, fx), fy),
        )
    }
}

/// Cell index and fractional offset along one axis, clamped to the grid.
fn cell(g: f64, cells: usize) -> (usize, f64) {
    let g = g.clamp(0.0, cells as f64);
    let i = (g.floor() as usize).min(cells - 1);
    (i, g - i as f64)
}

impl Interpolate for CartogramGrid {
    fn interpolate(&self, x: f64, y: f64, slide: f64) -> (f64, f64) {
        let b = &self.bounds;
        let sx = self.cols as f64 / b.width();
        let sy = self.rows as f64 / b.height();

        let (dx, dy) = self.displace((x - b.x_min) * sx, (y - b.y_min) * sy);
        let (tx, ty) = (b.x_min + dx / sx, b.y_min + dy / sy);
        (x + (tx - x) * slide, y + (ty - y) * slide)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interp/grid.rs"]
mod tests;
