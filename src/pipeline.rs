//! One render request from validation through to the chosen back-end.

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::feed::{FeedConfig, RegionFeed};
use crate::foundation::core::{FrameIndex, Slide};
use crate::foundation::error::{MapError, MapResult};
use crate::interp::Interpolate;
use crate::render::backend::{FrameRGBA, MapBackend, Pose, Projection};
use crate::render::json::JsonPaths;
use crate::render::keyframes::AnimationConfig;
use crate::render::points::OverlayConfig;
use crate::render::raster::RasterCanvas;
use crate::render::style::StyleConfig;
use crate::render::svg::SvgDocument;
use crate::source::ewkb::decode_ewkb;
use crate::source::{GeometrySource, MapDescriptor};
use crate::viewport::{Viewport, ViewportConfig};

/// Which back-end a request targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// SVG document, static or animated.
    #[default]
    Svg,
    /// `{ region_name: path_d }` object.
    Json,
    /// RGBA frames.
    Raster,
}

/// Everything one render needs besides the data source and the interpolation function.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderRequest {
    /// Map name passed to the [`MapProvider`](crate::source::MapProvider).
    pub map: String,
    /// Target back-end.
    pub output: OutputKind,
    /// Region selection and preparation.
    pub feed: FeedConfig,
    /// Output sizing.
    pub viewport: ViewportConfig,
    /// Pinned slide, SVG animation or raster frame count.
    pub animation: AnimationConfig,
    /// Colours and stylesheet.
    pub style: StyleConfig,
    /// Point overlay drawn over the regions.
    pub overlay: Option<OverlayConfig>,
    /// Decimal places in vector coordinates.
    pub decimal_places: usize,
    /// Emit the `id="bounds"` rectangle in SVG output.
    pub bounds_rect: bool,
    /// Draw the world outline under the regions.
    pub outline: bool,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            map: String::new(),
            output: OutputKind::Svg,
            feed: FeedConfig::default(),
            viewport: ViewportConfig::default(),
            animation: AnimationConfig::default(),
            style: StyleConfig::default(),
            overlay: None,
            decimal_places: 0,
            bounds_rect: true,
            outline: false,
        }
    }
}

impl RenderRequest {
    /// Reject inconsistent option combinations. Touches no data.
    ///
    /// `warped` says whether a cartogram interpolation function will be supplied.
    pub fn validate(&self, warped: bool) -> MapResult<()> {
        if self.map.trim().is_empty() {
            return Err(MapError::configuration("a map name is required"));
        }
        self.viewport.size_spec()?;
        self.animation.fixed_slide()?;
        if let Some(pct) = self.feed.small_island_threshold {
            if !pct.is_finite() || pct < 0.0 {
                return Err(MapError::configuration(format!(
                    "small island threshold must be a non-negative percentage, got {pct}"
                )));
            }
        }

        match self.output {
            OutputKind::Json => {
                if self.animation.animate {
                    return Err(MapError::configuration(
                        "JSON output is always static; animation cannot be requested",
                    ));
                }
                if self.animation.frames.is_some() {
                    return Err(MapError::configuration(
                        "animation frames apply to raster output only",
                    ));
                }
                if self.animation.slide.is_some() {
                    return Err(MapError::configuration(
                        "JSON output is always fully morphed; a slide cannot be given",
                    ));
                }
                if self.overlay.is_some() {
                    return Err(MapError::unsupported(
                        "point overlays are not available in JSON output",
                    ));
                }
                if self.outline {
                    return Err(MapError::unsupported(
                        "the world outline is not available in JSON output",
                    ));
                }
            }
            OutputKind::Svg => {
                if self.animation.frames.is_some() {
                    return Err(MapError::configuration(
                        "animation frames apply to raster output only",
                    ));
                }
                self.animation.vector_pose(warped)?;
            }
            OutputKind::Raster => {
                if self.animation.animate {
                    return Err(MapError::unsupported(
                        "raster output cannot embed animation; request frames instead",
                    ));
                }
                self.animation.raster_slides(warped)?;
            }
        }
        Ok(())
    }
}

/// A validated request bound to its map, data source and resolved viewport.
pub struct MapRenderer<'a> {
    source: &'a dyn GeometrySource,
    interp: Option<&'a dyn Interpolate>,
    request: &'a RenderRequest,
    map: MapDescriptor,
    overlay: OverlayConfig,
    viewport: Viewport,
}

impl<'a> MapRenderer<'a> {
    /// Validates `request`, then resolves the viewport once.
    ///
    /// A single-region request narrows the viewport to that region's bounds.
    pub fn new(
        map: MapDescriptor,
        source: &'a dyn GeometrySource,
        request: &'a RenderRequest,
        interp: Option<&'a dyn Interpolate>,
    ) -> MapResult<Self> {
        request.validate(interp.is_some())?;

        let bounds = match request.feed.region.as_deref() {
            Some(name) => RegionFeed::new(source, &map, &request.feed).region_bounds(name)?,
            None => map.bounds,
        };
        let viewport = Viewport::new(
            bounds,
            request.viewport.size_spec()?,
            (map.width, map.height),
        )?;
        tracing::debug!(
            map = %map.name,
            width = viewport.width,
            height = viewport.height,
            "viewport resolved"
        );

        Ok(Self {
            source,
            interp,
            request,
            overlay: request.overlay.clone().unwrap_or_default(),
            map,
            viewport,
        })
    }

    /// The map being rendered.
    pub fn map(&self) -> &MapDescriptor {
        &self.map
    }

    /// The resolved output space.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn projection(&self) -> Projection<'_> {
        Projection::new(&self.viewport, self.interp)
    }

    fn tagged(&self) -> bool {
        self.request.feed.dataset.is_some()
    }

    fn ensure_output(&self, kind: OutputKind) -> MapResult<()> {
        if self.request.output != kind {
            return Err(MapError::configuration(format!(
                "request was validated for {:?} output, not {kind:?}",
                self.request.output
            )));
        }
        Ok(())
    }

    /// Outline, then regions, then overlay points. Every call re-issues the region fetch.
    fn draw(&self, backend: &mut dyn MapBackend) -> MapResult<()> {
        let feed = RegionFeed::new(self.source, &self.map, &self.request.feed);

        if self.request.outline {
            let bytes = self.source.fetch_outline(feed.srid())?.ok_or_else(|| {
                MapError::data_source("the geometry source has no world outline")
            })?;
            let (_, outline) = decode_ewkb(&bytes)
                .map_err(|e| MapError::data_source(format!("world outline: {e}")))?;
            backend.draw_outline(&outline)?;
        }

        let bbox = match self.request.feed.region {
            Some(_) => None,
            None => Some(self.map.bounds),
        };
        let mut drawn = 0usize;
        for region in feed.regions(bbox)? {
            backend.draw_region(&region?)?;
            drawn += 1;
        }
        tracing::debug!(regions = drawn, "regions drawn");

        if let Some(overlay) = &self.request.overlay {
            let points = self.source.fetch_points(&overlay.table, feed.srid())?;
            tracing::debug!(table = %overlay.table, points = points.len(), "overlay points plotted");
            backend.draw_points(&points)?;
        }
        Ok(())
    }

    /// The SVG document, animated when the request asks for it and a warp is supplied.
    #[tracing::instrument(skip(self), fields(map = %self.map.name))]
    pub fn render_svg(&self) -> MapResult<String> {
        self.ensure_output(OutputKind::Svg)?;
        let pose = self.request.animation.vector_pose(self.interp.is_some())?;
        let mut doc = SvgDocument::new(
            self.projection(),
            pose,
            self.request.decimal_places,
            &self.request.style,
            &self.overlay,
            self.tagged(),
        );
        self.draw(&mut doc)?;
        Ok(doc.finish(
            (self.map.width, self.map.height),
            self.request.bounds_rect,
        ))
    }

    /// Region paths at the fully morphed pose, as a JSON object.
    #[tracing::instrument(skip(self), fields(map = %self.map.name))]
    pub fn render_json(&self) -> MapResult<String> {
        self.ensure_output(OutputKind::Json)?;
        let mut paths = JsonPaths::new(self.projection(), self.request.decimal_places);
        self.draw(&mut paths)?;
        paths.finish()
    }

    /// One raster frame at `slide`.
    #[tracing::instrument(skip(self, slide), fields(map = %self.map.name, slide = slide.value()))]
    pub fn render_frame(&self, slide: Slide) -> MapResult<FrameRGBA> {
        self.ensure_output(OutputKind::Raster)?;
        let mut canvas = RasterCanvas::new(
            self.projection(),
            Pose::Fixed(slide),
            &self.request.style,
            &self.overlay,
            self.tagged(),
        )?;
        self.draw(&mut canvas)?;
        Ok(canvas.finish())
    }

    /// The single raster frame, at the pinned slide or fully morphed.
    pub fn render_still(&self) -> MapResult<FrameRGBA> {
        self.render_frame(self.request.animation.fixed_slide()?)
    }

    /// Renders the configured frame sequence into `sink`, in slide order.
    ///
    /// The first failing frame aborts the sequence; `end` is only called after the last frame.
    #[tracing::instrument(skip(self, sink), fields(map = %self.map.name))]
    pub fn render_frames(&self, sink: &mut dyn FrameSink) -> MapResult<u32> {
        self.ensure_output(OutputKind::Raster)?;
        let slides = self
            .request
            .animation
            .raster_slides(self.interp.is_some())?
            .ok_or_else(|| MapError::configuration("no animation frame count was requested"))?;
        let frames = u32::try_from(slides.len())
            .map_err(|_| MapError::configuration("too many animation frames"))?;

        sink.begin(SinkConfig {
            width: self.viewport.width,
            height: self.viewport.height,
            frames,
        })?;
        for (i, slide) in slides.into_iter().enumerate() {
            let frame = self.render_frame(slide)?;
            sink.push_frame(FrameIndex(i as u64), &frame)?;
            tracing::info!(frame = i, slide = slide.value(), "frame rendered");
        }
        sink.end()?;
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
