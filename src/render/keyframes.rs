//! Slide schedules: SVG keyframe animation and evenly spaced raster frames.

use std::fmt::Display;

use crate::foundation::core::Slide;
use crate::foundation::error::{MapError, MapResult};
use crate::render::backend::Pose;

/// Length of one full original → morphed → original cycle.
pub const MORPH_DURATION: &str = "10s";

/// Animation options for one render.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Emit keyframe-animated vector output.
    pub animate: bool,
    /// Raster frame count; `Some` switches raster output to a frame sequence.
    pub frames: Option<u32>,
    /// Pins the static pose; defaults to fully morphed.
    pub slide: Option<f64>,
}

impl AnimationConfig {
    /// The pinned slide, or fully morphed.
    pub fn fixed_slide(&self) -> MapResult<Slide> {
        self.slide.map_or(Ok(Slide::MORPHED), Slide::new)
    }

    /// Pose for vector output. Animation collapses to a fixed pose without interpolation.
    pub fn vector_pose(&self, warped: bool) -> MapResult<Pose> {
        if self.animate && warped {
            if self.slide.is_some() {
                return Err(MapError::configuration(
                    "an explicit slide cannot be combined with animation",
                ));
            }
            return Ok(Pose::Morph);
        }
        Ok(Pose::Fixed(self.fixed_slide()?))
    }

    /// Slides for a raster frame sequence, or `None` for a single frame.
    pub fn raster_slides(&self, warped: bool) -> MapResult<Option<Vec<Slide>>> {
        let Some(frames) = self.frames else {
            return Ok(None);
        };
        if !warped {
            return Err(MapError::configuration(
                "animation frames need a cartogram interpolation file",
            ));
        }
        if self.slide.is_some() {
            return Err(MapError::configuration(
                "an explicit slide cannot be combined with animation frames",
            ));
        }
        frame_slides(frames).map(Some)
    }
}

/// `i / (n - 1)` for `i` in `0..n`.
pub fn frame_slides(frames: u32) -> MapResult<Vec<Slide>> {
    if frames < 2 {
        return Err(MapError::configuration(format!(
            "animation needs at least 2 frames, got {frames}"
        )));
    }
    let last = f64::from(frames - 1);
    (0..frames).map(|i| Slide::new(f64::from(i) / last)).collect()
}

/// Keyframe list `o;m;m;o;o`.
pub fn keyframe_values(original: impl Display, morphed: impl Display) -> String {
    format!("{original};{morphed};{morphed};{original};{original}")
}

/// A looping `<animate>` element over `attribute`.
pub fn animate_element(attribute: &str, original: impl Display, morphed: impl Display) -> String {
    format!(
        r#"<animate dur="{MORPH_DURATION}" repeatCount="indefinite" attributeName="{attribute}" values="{}"/>"#,
        keyframe_values(original, morphed)
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/keyframes.rs"]
mod tests;
