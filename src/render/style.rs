use std::fmt::Write as _;

use crate::foundation::core::Rgb8;
use crate::render::points::OverlayConfig;

/// Which inline stylesheet a vector document carries.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stylesheet {
    /// Built from [`StyleConfig`] and the overlay style.
    #[default]
    Default,
    /// Literal CSS replacing the default.
    Inline(String),
    /// No inline stylesheet.
    Omitted,
}

/// Decoded background picture for raster output, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundImage {
    /// Width in pixels; must match the output width.
    pub width: u32,
    /// Height in pixels; must match the output height.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, row-major.
    pub rgba8_premul: Vec<u8>,
}

/// Drawing style for both back-ends.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Inline stylesheet choice for SVG output.
    pub stylesheet: Stylesheet,
    /// Extra CSS appended after the inline stylesheet.
    pub external_stylesheet: Option<String>,
    /// Extra classes on every region path.
    pub classes: Vec<String>,
    /// Stroke width in output units.
    pub stroke_width: f64,
    /// Region fill.
    pub fill: Rgb8,
    /// Fill for regions outside the dataset.
    pub fill_no_data: Rgb8,
    /// `None` disables region stroking.
    pub stroke: Option<Rgb8>,
    /// Raster background colour.
    pub background: Rgb8,
    /// Painted over the background colour, under the regions. Raster only.
    #[serde(skip)]
    pub background_image: Option<BackgroundImage>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            stylesheet: Stylesheet::Default,
            external_stylesheet: None,
            classes: Vec::new(),
            stroke_width: 1.0,
            fill: Rgb8::new(0xf7, 0xd3, 0xaa),
            fill_no_data: Rgb8::new(0xff, 0xff, 0xff),
            stroke: Some(Rgb8::new(0xa0, 0x80, 0x70)),
            background: Rgb8::new(0x9e, 0xc7, 0xf3),
            background_image: None,
        }
    }
}

impl StyleConfig {
    /// Contents of the SVG `<style>` block, or `None` when it would be empty.
    pub fn css(&self, overlay: &OverlayConfig) -> Option<String> {
        let mut css = match &self.stylesheet {
            Stylesheet::Default => self.default_css(overlay),
            Stylesheet::Inline(text) => text.clone(),
            Stylesheet::Omitted => String::new(),
        };
        if let Some(external) = self.external_stylesheet.as_deref() {
            if !css.is_empty() && !css.ends_with('\n') {
                css.push('\n');
            }
            css.push_str(external);
        }
        (!css.trim().is_empty()).then_some(css)
    }

    fn default_css(&self, overlay: &OverlayConfig) -> String {
        let stroke = self.stroke.map_or_else(|| "none".to_owned(), Rgb8::to_hex);
        let mut css = String::new();
        let _ = writeln!(
            css,
            "path {{ fill: none; stroke: {stroke}; stroke-width: {}; }}",
            self.stroke_width
        );
        let _ = writeln!(css, "path.no-data {{ fill: {}; }}", self.fill_no_data.to_hex());
        let _ = writeln!(
            css,
            "circle {{ fill: {}; opacity: {}; }}",
            overlay.fill.to_hex(),
            overlay.opacity
        );
        css
    }

    /// `class` attribute value for a region path. `tagged` adds `has-data`/`no-data`.
    pub fn region_classes(&self, tagged: bool, has_data: bool) -> String {
        let mut classes = self.classes.join(" ");
        if tagged {
            if !classes.is_empty() {
                classes.push(' ');
            }
            classes.push_str(if has_data { "has-data" } else { "no-data" });
        }
        classes
    }

    /// Raster fill for a region. The no-data colour applies only to tagged renders.
    pub fn region_fill(&self, tagged: bool, has_data: bool) -> Rgb8 {
        if tagged && !has_data {
            self.fill_no_data
        } else {
            self.fill
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/style.rs"]
mod tests;
