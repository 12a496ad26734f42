// Live-tuning runner state.
// Visual: every key press rebuilds what you see (frames, clock, maybe the
// background tile) from one immutable RunnerConfig, in one place.

use crate::animator::{self, AnimationClock};
use crate::config::{PlayConfig, RunnerConfig, TuneLimits};
use crate::error::{Error, Result};
use crate::scroll::{ScrollState, ScrollTile};
use crate::slicer;
use crate::types::{Frame, FrameGrid, FrameSequence};
use image::RgbaImage;
use std::time::Instant;
use tracing::{info, warn};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RowsDown,
    RowsUp,
    ColumnsDown,
    ColumnsUp,
    FrameRateDown,
    FrameRateUp,
    HeightDown,
    HeightUp,
    ToggleMirror,
    TogglePause,
    Quit,
}

fn step(value: u32, up: bool, min: u32, max: u32) -> u32 {
    let v = if up { value.saturating_add(1) } else { value.saturating_sub(1) };
    v.clamp(min, max.max(min))
}

/// The record that results from applying `action` to `config`, clamped to `limits`.
pub fn next_config(config: RunnerConfig, action: Action, limits: &TuneLimits) -> RunnerConfig {
    let mut grid = config.grid;
    match action {
        Action::RowsDown | Action::RowsUp => {
            grid.rows = step(grid.rows, action == Action::RowsUp, 1, limits.max_rows);
            RunnerConfig { grid, ..config }
        }
        Action::ColumnsDown | Action::ColumnsUp => {
            grid.columns = step(grid.columns, action == Action::ColumnsUp, 1, limits.max_columns);
            RunnerConfig { grid, ..config }
        }
        Action::FrameRateDown | Action::FrameRateUp => RunnerConfig {
            frame_rate: step(
                config.frame_rate,
                action == Action::FrameRateUp,
                limits.min_frame_rate,
                limits.max_frame_rate,
            ),
            ..config
        },
        Action::HeightDown | Action::HeightUp => RunnerConfig {
            target_height: step(
                config.target_height,
                action == Action::HeightUp,
                limits.min_target_height,
                limits.max_target_height,
            ),
            ..config
        },
        Action::ToggleMirror => RunnerConfig { mirrored: !config.mirrored, ..config },
        Action::TogglePause => RunnerConfig { scroll_paused: !config.scroll_paused, ..config },
        Action::Quit => config,
    }
}

/// Slice `sheet` with `grid`, treating an empty result as an error.
fn slice_non_empty(sheet: &RgbaImage, grid: &FrameGrid) -> Result<FrameSequence> {
    let raw = slicer::slice(sheet, grid);
    if raw.is_empty() {
        return Err(Error::InvalidSliceConfiguration(format!(
            "{}x{} grid on a {}x{} sheet produced no frames",
            grid.rows,
            grid.columns,
            sheet.width(),
            sheet.height()
        )));
    }
    Ok(raw)
}

/// Slice, scale and restart the clock for `config`.
/// An empty slice is an `InvalidSliceConfiguration`; the caller decides
/// whether that is fatal.
pub fn apply_configuration(
    sheet: &RgbaImage,
    config: &RunnerConfig,
    now: Instant,
) -> Result<(FrameSequence, AnimationClock)> {
    let raw = slice_non_empty(sheet, &config.grid)?;
    let frames = slicer::rescale_all(&raw, config.target_height);
    info!(
        rows = config.grid.rows,
        cols = config.grid.columns,
        count = frames.len(),
        size = ?frames.frame_size(),
        "rebuilt runner frames"
    );
    Ok((frames, AnimationClock::new(now, config.frame_rate)))
}

/// Frames for the clean runner: fixed grid, integer sprite scale.
/// There is no live retuning there, so every error here is fatal to the caller.
pub fn build_play_frames(sheet: &RgbaImage, play: &PlayConfig) -> Result<FrameSequence> {
    let raw = slice_non_empty(sheet, &play.grid)?;
    let frames = slicer::rescale_all_by_factor(&raw, play.sprite_scale)?;
    info!(count = frames.len(), size = ?frames.frame_size(), "runner frames ready");
    Ok(frames)
}

/// Top edge of a sprite standing on the ground line.
pub fn runner_y(canvas_height: u32, frame_height: u32, ground_margin: u32) -> i32 {
    canvas_height as i32 - frame_height as i32 - ground_margin as i32
}

/// Everything the live runner holds between ticks.
pub struct TuneState {
    sheet: RgbaImage,
    background: RgbaImage,
    tile_height: u32,
    limits: TuneLimits,
    pub config: RunnerConfig,
    pub frames: FrameSequence,
    pub clock: AnimationClock,
    pub tile: ScrollTile,
    pub scroll: ScrollState,
    /// Last rejected configuration, shown in the HUD until the next good one.
    pub warning: Option<String>,
}

impl TuneState {
    /// Build the first frames and tile. Failing here is fatal: there is no
    /// previous good state to fall back on.
    pub fn new(
        sheet: RgbaImage,
        background: RgbaImage,
        tile_height: u32,
        limits: TuneLimits,
        config: RunnerConfig,
        now: Instant,
    ) -> Result<Self> {
        let (frames, clock) = apply_configuration(&sheet, &config, now)?;
        let tile = ScrollTile::build(&background, tile_height, config.mirrored)?;
        let scroll = ScrollState::new(tile.width())?;
        Ok(Self { sheet, background, tile_height, limits, config, frames, clock, tile, scroll, warning: None })
    }

    /// React to one key press. Bad slice settings keep the previous frames
    /// and set `warning` instead of failing.
    pub fn handle(&mut self, action: Action, now: Instant) {
        let candidate = next_config(self.config, action, &self.limits);
        if candidate == self.config {
            return;
        }

        if candidate.mirrored != self.config.mirrored {
            match ScrollTile::build(&self.background, self.tile_height, candidate.mirrored)
                .and_then(|tile| ScrollState::new(tile.width()).map(|scroll| (tile, scroll)))
            {
                Ok((tile, scroll)) => {
                    self.tile = tile;
                    self.scroll = scroll;
                }
                Err(e) => {
                    warn!("{e}");
                    self.warning = Some(e.to_string());
                    return;
                }
            }
        }

        self.config = candidate;
        match apply_configuration(&self.sheet, &self.config, now) {
            Ok((frames, clock)) => {
                self.frames = frames;
                self.clock = clock;
                self.warning = None;
            }
            Err(e) => {
                warn!("{e}; keeping previous frames");
                self.warning = Some(e.to_string());
                // old poses, new playback speed
                self.clock = AnimationClock::new(now, self.config.frame_rate);
            }
        }
    }

    /// One tick of background motion (nothing while paused).
    pub fn tick(&mut self, speed: u32) {
        if !self.config.scroll_paused {
            self.scroll = self.scroll.advance(speed);
        }
    }

    /// Frame to draw at `now`.
    pub fn current_frame(&self, now: Instant) -> Option<&Frame> {
        let count = self.frames.count()?;
        self.frames.get(animator::current_index(&self.clock, now, count))
    }

    /// Three short HUD lines (rows/cols, timing, background mode).
    pub fn hud_lines(&self) -> [String; 3] {
        let g = &self.config.grid;
        [
            format!("R:{} C:{} N:{}", g.rows, g.columns, self.frames.len()),
            format!("FPS:{} H:{}", self.config.frame_rate, self.config.target_height),
            format!(
                "BG:{} SCROLL:{}",
                if self.config.mirrored { "MIRROR" } else { "NORMAL" },
                if self.config.scroll_paused { "PAUSE" } else { "ON" }
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Margins;
    use image::Rgba;
    use std::time::Duration;

    fn sheet(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, _| Rgba([x as u8, 0, 0, 255]))
    }

    fn base() -> RunnerConfig {
        RunnerConfig {
            grid: FrameGrid::new(1, 6),
            frame_rate: 10,
            target_height: 24,
            mirrored: true,
            scroll_paused: false,
        }
    }

    fn state(sheet_w: u32, now: Instant) -> TuneState {
        TuneState::new(sheet(sheet_w, 40), sheet(100, 144), 144, TuneLimits::default(), base(), now).unwrap()
    }

    #[test]
    fn test_next_config_clamps_to_limits() {
        let limits = TuneLimits::default();
        let mut c = base();
        for _ in 0..30 {
            c = next_config(c, Action::ColumnsUp, &limits);
        }
        assert_eq!(c.grid.columns, 24);
        for _ in 0..30 {
            c = next_config(c, Action::RowsDown, &limits);
        }
        assert_eq!(c.grid.rows, 1);
        for _ in 0..40 {
            c = next_config(c, Action::FrameRateDown, &limits);
        }
        assert_eq!(c.frame_rate, 2);
        for _ in 0..40 {
            c = next_config(c, Action::HeightUp, &limits);
        }
        assert_eq!(c.target_height, 40);
    }

    #[test]
    fn test_next_config_toggles() {
        let limits = TuneLimits::default();
        let c = next_config(base(), Action::ToggleMirror, &limits);
        assert!(!c.mirrored);
        let c = next_config(c, Action::TogglePause, &limits);
        assert!(c.scroll_paused);
        assert_eq!(next_config(c, Action::Quit, &limits), c);
    }

    #[test]
    fn test_apply_configuration_end_to_end() {
        let now = Instant::now();
        let (frames, clock) = apply_configuration(&sheet(240, 40), &base(), now).unwrap();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames.frame_size(), Some((24, 24)));
        let idx = animator::current_index(&clock, now + Duration::from_millis(250), frames.count().unwrap());
        assert_eq!(idx, 2);
    }

    #[test]
    fn test_apply_configuration_rejects_empty_slice() {
        let config = RunnerConfig { grid: FrameGrid::new(1, 9), ..base() };
        let err = apply_configuration(&sheet(8, 8), &config, Instant::now()).unwrap_err();
        assert!(matches!(err, Error::InvalidSliceConfiguration(_)));
    }

    #[test]
    fn test_key_press_reslices_and_resets_clock() {
        let start = Instant::now();
        let mut s = state(240, start);
        let later = start + Duration::from_millis(350);
        assert_eq!(s.current_frame(later), s.frames.get(3));

        s.handle(Action::ColumnsDown, later);
        assert_eq!(s.frames.len(), 5);
        assert_eq!(s.clock.start, later);
        assert_eq!(s.current_frame(later), s.frames.get(0));
    }

    #[test]
    fn test_invalid_columns_keep_previous_frames() {
        let start = Instant::now();
        let mut s = TuneState::new(
            sheet(6, 6),
            sheet(10, 10),
            10,
            TuneLimits::default(),
            base(),
            start,
        )
        .unwrap();
        let before = s.frames.clone();

        s.handle(Action::ColumnsUp, start);
        assert_eq!(s.config.grid.columns, 7);
        assert_eq!(s.frames, before);
        assert!(s.warning.is_some());

        s.handle(Action::ColumnsDown, start);
        assert!(s.warning.is_none());
    }

    #[test]
    fn test_frame_rate_applies_while_grid_is_invalid() {
        let start = Instant::now();
        let mut s = TuneState::new(sheet(6, 6), sheet(10, 10), 10, TuneLimits::default(), base(), start).unwrap();
        let before = s.frames.clone();
        s.handle(Action::ColumnsUp, start);
        assert!(s.warning.is_some());

        let later = start + Duration::from_millis(40);
        for _ in 0..10 {
            s.handle(Action::FrameRateUp, later);
        }
        assert_eq!(s.config.frame_rate, 20);
        assert_eq!(s.clock.frame_rate, 20);
        assert_eq!(s.clock.start, later);
        assert_eq!(s.frames, before);
        assert_eq!(s.hud_lines()[1], "FPS:20 H:24");
    }

    #[test]
    fn test_play_frames_scaled_by_factor() {
        let play = PlayConfig::default();
        let frames = build_play_frames(&sheet(240, 40), &play).unwrap();
        assert_eq!(frames.len(), 6);
        assert!(frames.iter().all(|f| f.dimensions() == (120, 120)));
        // frame 1 starts at sheet x = 40
        assert_eq!(frames.get(1).unwrap().get_pixel(0, 0)[0], 40);
    }

    #[test]
    fn test_play_frames_fail_on_oversized_margins() {
        let play = PlayConfig {
            grid: FrameGrid::new(1, 6).with_margins(Margins { left: 200, right: 100, ..Margins::default() }),
            ..PlayConfig::default()
        };
        let err = build_play_frames(&sheet(240, 40), &play).unwrap_err();
        assert!(matches!(err, Error::InvalidSliceConfiguration(_)));
    }

    #[test]
    fn test_play_frames_fail_on_huge_sprite_scale() {
        let play = PlayConfig { sprite_scale: 200_000_000, ..PlayConfig::default() };
        assert!(matches!(
            build_play_frames(&sheet(240, 40), &play),
            Err(Error::InvalidSliceConfiguration(_))
        ));
    }

    #[test]
    fn test_mirror_toggle_rebuilds_tile_and_resets_offset() {
        let mut s = state(240, Instant::now());
        assert_eq!(s.tile.width(), 200);
        s.tick(3);
        assert_eq!(s.scroll.offset, -3);

        s.handle(Action::ToggleMirror, Instant::now());
        assert_eq!(s.tile.width(), 100);
        assert_eq!(s.scroll, ScrollState { offset: 0, tile_width: 100 });
    }

    #[test]
    fn test_pause_stops_scroll() {
        let mut s = state(240, Instant::now());
        s.handle(Action::TogglePause, Instant::now());
        s.tick(5);
        assert_eq!(s.scroll.offset, 0);
        assert_eq!(s.hud_lines()[2], "BG:MIRROR SCROLL:PAUSE");
    }

    #[test]
    fn test_runner_y_stands_on_ground() {
        assert_eq!(runner_y(144, 24, 12), 108);
        assert_eq!(runner_y(576, 120, 60), 396);
    }
}
