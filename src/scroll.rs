// Infinite horizontal background scroll.
// Visual: the background slides left forever; with the mirror option the
// seam between repeats becomes a reflection instead of a visible cut.

use crate::error::{Error, Result};
use crate::slicer;
use image::imageops;
use image::RgbaImage;
use tracing::debug;

/// The image repeated edge-to-edge behind the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTile {
    pub image: RgbaImage,
    pub mirrored: bool,
}

impl ScrollTile {
    /// Scale `source` to `target_height` (proportional width) and, when
    /// `mirrored`, append its left-right flip so the tile is twice as wide.
    /// The tile is forced opaque; it is blitted without blending.
    pub fn build(source: &RgbaImage, target_height: u32, mirrored: bool) -> Result<Self> {
        if source.width() == 0 || source.height() == 0 {
            return Err(Error::InvalidSliceConfiguration(format!(
                "background is {}x{}; cannot build a tile",
                source.width(),
                source.height()
            )));
        }

        let scaled = slicer::rescale(source, target_height);
        let mut image = if mirrored {
            let flipped = imageops::flip_horizontal(&scaled);
            let mut tile = RgbaImage::new(scaled.width() * 2, scaled.height());
            imageops::replace(&mut tile, &scaled, 0, 0);
            imageops::replace(&mut tile, &flipped, scaled.width() as i64, 0);
            tile
        } else {
            scaled
        };
        for p in image.pixels_mut() {
            p[3] = 255;
        }

        debug!(width = image.width(), height = image.height(), mirrored, "built background tile");
        Ok(Self { image, mirrored })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }
}

/// Horizontal scroll position. After every `advance`, `-tile_width < offset <= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: i64,
    pub tile_width: i64,
}

impl ScrollState {
    /// Start at offset 0. A zero-width tile would never wrap, so it is rejected.
    pub fn new(tile_width: u32) -> Result<Self> {
        if tile_width == 0 {
            return Err(Error::InvalidSliceConfiguration("tile width is 0".into()));
        }
        Ok(Self { offset: 0, tile_width: tile_width as i64 })
    }

    /// Move left by `speed` pixels and wrap back into range.
    /// Speeds larger than a whole tile wrap as many times as needed.
    #[must_use]
    pub fn advance(self, speed: u32) -> Self {
        let tw = self.tile_width;
        let mut offset = self.offset - speed as i64;
        if tw > 0 && offset <= -tw {
            offset = -((-offset) % tw);
        }
        Self { offset, ..self }
    }
}

/// How many tile copies cover `viewport_width`, with one spare for the
/// negative offset: `ceil(viewport / tile) + 1`.
pub fn repeat_count(viewport_width: u32, tile_width: i64) -> Result<usize> {
    if tile_width <= 0 {
        return Err(Error::InvalidSliceConfiguration(format!(
            "tile width {tile_width} cannot cover the viewport"
        )));
    }
    Ok((viewport_width as u64).div_ceil(tile_width as u64) as usize + 1)
}

/// X positions at which the renderer draws the tile this tick.
pub fn tile_positions(state: &ScrollState, viewport_width: u32) -> Result<impl Iterator<Item = i64> + use<>> {
    let count = repeat_count(viewport_width, state.tile_width)?;
    let (offset, tw) = (state.offset, state.tile_width);
    Ok((0..count as i64).map(move |k| offset + k * tw))
}
