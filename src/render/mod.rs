//! Drawing back-ends and the shared ring/keyframe machinery they use.

/// Back-end trait, projection and the raster frame type.
pub mod backend;
pub mod json;
pub mod keyframes;
pub mod path;
pub mod points;
pub mod raster;
/// Colours, classes and stylesheets.
pub mod style;
pub mod svg;
