//! Frame delivery for raster output.

/// PNG file sequence sink.
pub mod png;
/// Frame sink trait and the in-memory sink.
pub mod sink;
