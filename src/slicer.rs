// Cuts a sprite sheet into animation frames and scales them for display.
// Visual: each entry of the returned sequence is one pose of the runner.

use crate::error::{Error, Result};
use crate::types::{Frame, FrameGrid, FrameSequence};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::{debug, warn};

/// Integer cell size for `grid` on a `sheet_w` x `sheet_h` sheet.
/// Remainder pixels are dropped; either value may come out <= 0.
pub fn cell_size(sheet_w: u32, sheet_h: u32, grid: &FrameGrid) -> (i64, i64) {
    let rows = grid.rows.max(1) as i64;
    let cols = grid.columns.max(1) as i64;
    let m = &grid.margins;

    let usable_w = sheet_w as i64 - m.left as i64 - m.right as i64 - (cols - 1) * grid.gap_h as i64;
    let usable_h = sheet_h as i64 - m.top as i64 - m.bottom as i64 - (rows - 1) * grid.gap_v as i64;

    // div_euclid so a negative usable span never rounds up to 0
    (usable_w.div_euclid(cols), usable_h.div_euclid(rows))
}

/// Slice `source` into frames, row by row.
/// Cells that would poke past the sheet edge are skipped. An empty sequence
/// means the grid produced nothing usable; the caller decides what to do.
pub fn slice(source: &RgbaImage, grid: &FrameGrid) -> FrameSequence {
    let (sw, sh) = source.dimensions();
    let (fw, fh) = cell_size(sw, sh, grid);
    if fw <= 0 || fh <= 0 {
        warn!(fw, fh, ?grid, "frame size is not positive; check margins/gaps/rows/columns");
        return FrameSequence::default();
    }

    let rows = grid.rows.max(1) as i64;
    let cols = grid.columns.max(1) as i64;
    let mut frames = Vec::with_capacity((rows * cols) as usize);

    for r in 0..rows {
        let y = grid.margins.top as i64 + r * (fh + grid.gap_v as i64);
        for c in 0..cols {
            let x = grid.margins.left as i64 + c * (fw + grid.gap_h as i64);
            if x + fw > sw as i64 || y + fh > sh as i64 {
                continue;
            }
            // to_image() copies, so the frame owns its pixels
            let frame = imageops::crop_imm(source, x as u32, y as u32, fw as u32, fh as u32).to_image();
            frames.push(frame);
        }
    }

    if frames.is_empty() {
        warn!(?grid, "no frames generated; check the slicing configuration");
    } else {
        debug!(count = frames.len(), fw, fh, "sliced sheet");
    }
    FrameSequence::new(frames)
}

/// Width that keeps the aspect ratio at `target_height` (rounded, at least 1).
pub fn scaled_width(width: u32, height: u32, target_height: u32) -> u32 {
    if height == 0 {
        return width.max(1);
    }
    let (w, h, th) = (width as u64, height as u64, target_height as u64);
    ((2 * w * th + h) / (2 * h)).max(1) as u32
}

/// Scale a frame to `target_height`, keeping its proportions.
/// Nearest-neighbour so pixel art stays blocky.
pub fn rescale(frame: &Frame, target_height: u32) -> Frame {
    let (w, h) = frame.dimensions();
    let th = target_height.max(1);
    imageops::resize(frame, scaled_width(w, h, th), th, FilterType::Nearest)
}

/// Largest side a scaled frame may have.
pub const MAX_FRAME_SIDE: u32 = 16_384;

/// Scale both sides of a frame by the same integer factor.
/// A factor that would push either side past `MAX_FRAME_SIDE` is rejected.
pub fn rescale_by_factor(frame: &Frame, factor: u32) -> Result<Frame> {
    let (w, h) = frame.dimensions();
    let k = factor.max(1);
    let (nw, nh) = w
        .checked_mul(k)
        .zip(h.checked_mul(k))
        .filter(|&(nw, nh)| nw <= MAX_FRAME_SIDE && nh <= MAX_FRAME_SIDE)
        .ok_or_else(|| {
            Error::InvalidSliceConfiguration(format!(
                "sprite scale {factor} makes a {w}x{h} frame larger than {MAX_FRAME_SIDE}px"
            ))
        })?;
    Ok(imageops::resize(frame, nw, nh, FilterType::Nearest))
}

/// Scale every frame of a sequence to `target_height`.
pub fn rescale_all(frames: &FrameSequence, target_height: u32) -> FrameSequence {
    FrameSequence::new(frames.iter().map(|f| rescale(f, target_height)).collect())
}

/// Scale every frame of a sequence by an integer factor.
pub fn rescale_all_by_factor(frames: &FrameSequence, factor: u32) -> Result<FrameSequence> {
    let scaled = frames.iter().map(|f| rescale_by_factor(f, factor)).collect::<Result<Vec<_>>>()?;
    Ok(FrameSequence::new(scaled))
}
