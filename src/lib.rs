//! mapslide renders region boundaries from a spatial data source as raster frames, SVG
//! documents or JSON path maps.
//!
//! Every vertex passes through an optional cartogram interpolation (blended by a slide value
//! between the true shape at 0 and the cartogram at 1) and then through the viewport map. The
//! main entry point is [`MapRenderer`]:
//!
//! - Load a [`MapDescriptor`] from a [`MapProvider`] (for example a [`CatalogSource`])
//! - Build a [`RenderRequest`] and optionally a [`CartogramGrid`]
//! - Render an SVG document, a JSON path map, a single frame, or a frame sequence into a
//!   [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Frame sinks for raster output.
pub mod encode;
/// Region decoding, exclusion and island filtering.
pub mod feed;
/// Cartogram interpolation and coordinate resolution.
pub mod interp;
/// Request validation and render orchestration.
pub mod pipeline;
/// Raster, SVG and JSON back-ends.
pub mod render;
/// Geometry source contracts, the EWKB codec and the JSON catalog source.
pub mod source;
/// Output sizing and the geographic-to-output map.
pub mod viewport;

pub use crate::foundation::core::{Bounds, FrameIndex, Point, Rgb8, Slide};
pub use crate::foundation::error::{MapError, MapResult};

pub use crate::encode::png::{FrameTemplate, PngSequenceSink};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::feed::{FeedConfig, Region, RegionFeed};
pub use crate::interp::grid::CartogramGrid;
pub use crate::interp::{CoordinateResolver, Identity, Interpolate};
pub use crate::pipeline::{MapRenderer, OutputKind, RenderRequest};
pub use crate::render::backend::{FrameRGBA, MapBackend, Pose, Projection};
pub use crate::render::keyframes::AnimationConfig;
pub use crate::render::points::OverlayConfig;
pub use crate::render::raster::decode_background;
pub use crate::render::style::{BackgroundImage, StyleConfig, Stylesheet};
pub use crate::source::catalog::{Catalog, CatalogRegion, CatalogSource};
pub use crate::source::simplification::SimplificationPolicy;
pub use crate::source::{GeometrySource, MapDescriptor, MapProvider, RegionQuery, RegionRow};
pub use crate::viewport::{GridSize, SizeSpec, Viewport, ViewportConfig};
