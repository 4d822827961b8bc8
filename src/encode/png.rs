//! Numbered PNG files, one per frame.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MapError, MapResult};
use crate::render::backend::FrameRGBA;

/// Output path with a single `%d` or zero-padded `%0Nd` frame number placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameTemplate {
    prefix: String,
    pad: usize,
    suffix: String,
}

impl FrameTemplate {
    /// Path for frame `idx`, zero-padded to the template's width.
    pub fn path_for(&self, idx: FrameIndex) -> PathBuf {
        let n = idx.0;
        let pad = self.pad;
        PathBuf::from(format!("{}{n:0pad$}{}", self.prefix, self.suffix))
    }
}

fn placeholder(s: &str) -> Option<(usize, usize, usize)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while let Some(off) = s[i..].find('%') {
        let start = i + off;
        let mut j = start + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if bytes.get(j) == Some(&b'd') {
            let digits = &s[start + 1..j];
            if digits.is_empty() {
                return Some((start, j + 1, 0));
            }
            if digits.starts_with('0') {
                let pad = digits.parse().ok()?;
                return Some((start, j + 1, pad));
            }
        }
        i = start + 1;
    }
    None
}

impl FromStr for FrameTemplate {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((start, end, pad)) = placeholder(s) else {
            return Err(MapError::configuration(format!(
                "frame output path '{s}' needs a %d placeholder"
            )));
        };
        if placeholder(&s[end..]).is_some() {
            return Err(MapError::configuration(format!(
                "frame output path '{s}' has more than one frame placeholder"
            )));
        }
        Ok(Self {
            prefix: s[..start].to_owned(),
            pad,
            suffix: s[end..].to_owned(),
        })
    }
}

/// Writes frame `i` to the template path for `i`.
#[derive(Debug)]
pub struct PngSequenceSink {
    template: FrameTemplate,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Create a sink writing through `template`.
    pub fn new(template: FrameTemplate) -> Self {
        Self {
            template,
            written: Vec::new(),
        }
    }

    /// Paths written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> MapResult<()> {
        tracing::debug!(
            width = cfg.width,
            height = cfg.height,
            frames = cfg.frames,
            "writing png sequence"
        );
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> MapResult<()> {
        let path = self.template.path_for(idx);
        let png = frame.encode_png()?;
        std::fs::write(&path, png).with_context(|| format!("write frame {}", path.display()))?;
        tracing::info!(frame = idx.0, path = %path.display(), "frame written");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> MapResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
