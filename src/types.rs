// Core types shared by the slicer, the scroller and the draw loop.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// What the window actually shows: one u32 per pixel, 0x00RRGGBB for minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// Outer padding around the whole sheet, in sheet pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub top: u32,
    #[serde(default)]
    pub right: u32,
    #[serde(default)]
    pub bottom: u32,
    #[serde(default)]
    pub left: u32,
}

/// How a sprite sheet is cut: a rows x columns grid inside the margins,
/// with `gap_h`/`gap_v` pixels between neighbouring cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGrid {
    pub rows: u32,
    pub columns: u32,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub gap_h: u32,
    #[serde(default)]
    pub gap_v: u32,
}

impl FrameGrid {
    /// Plain grid: no margins, no gaps.
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns, margins: Margins::default(), gap_h: 0, gap_v: 0 }
    }

    pub fn with_margins(self, margins: Margins) -> Self {
        Self { margins, ..self }
    }

    pub fn with_gaps(self, gap_h: u32, gap_v: u32) -> Self {
        Self { gap_h, gap_v, ..self }
    }
}

/// One extracted pose. Owns its pixels; never aliases the sheet.
pub type Frame = RgbaImage;

/// Frames in row-major sheet order. May be empty when the grid did not fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Frame>,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame count as the animator wants it; `None` for an empty sequence.
    pub fn count(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.frames.len())
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Size of the first frame (all frames of one slice share it).
    pub fn frame_size(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| f.dimensions())
    }
}
