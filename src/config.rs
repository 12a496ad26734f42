use crate::error::{Error, Result};
use crate::types::FrameGrid;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pixel-runner.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub tune: TuneConfig,
    #[serde(default)]
    pub play: PlayConfig,
}

impl AppConfig {
    /// Load configuration from `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn sheet_path(&self) -> PathBuf {
        crate::assets::resolve(&self.general.asset_dir, &self.assets.sheet)
    }

    pub fn background_path(&self) -> PathBuf {
        crate::assets::resolve(&self.general.asset_dir, &self.assets.background)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory the asset names are resolved against
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_level: default_log_level(), asset_dir: default_asset_dir() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_background")]
    pub background: PathBuf,
    #[serde(default = "default_sheet")]
    pub sheet: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { background: default_background(), sheet: default_sheet() }
    }
}

/// Live-tuning runner: low-res canvas, keys re-slice the sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuneConfig {
    #[serde(default = "default_tune_width")]
    pub logical_width: u32,
    #[serde(default = "default_tune_height")]
    pub logical_height: u32,
    /// Integer window upscale (1, 2, 4, 8, 16 or 32)
    #[serde(default = "default_window_scale")]
    pub window_scale: u32,
    /// Background pixels per tick
    #[serde(default = "default_one")]
    pub background_speed: u32,
    #[serde(default = "default_true")]
    pub mirrored: bool,
    #[serde(default = "default_true")]
    pub scroll: bool,
    /// Runner height in logical pixels
    #[serde(default = "default_target_height")]
    pub target_height: u32,
    /// Animation frames per second
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default = "default_tune_runner_x")]
    pub runner_x: i32,
    #[serde(default = "default_tune_ground_margin")]
    pub ground_margin: u32,
    #[serde(default = "default_one")]
    pub rows: u32,
    #[serde(default = "default_columns")]
    pub columns: u32,
    #[serde(default)]
    pub limits: TuneLimits,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            logical_width: default_tune_width(),
            logical_height: default_tune_height(),
            window_scale: default_window_scale(),
            background_speed: default_one(),
            mirrored: default_true(),
            scroll: default_true(),
            target_height: default_target_height(),
            frame_rate: default_frame_rate(),
            runner_x: default_tune_runner_x(),
            ground_margin: default_tune_ground_margin(),
            rows: default_one(),
            columns: default_columns(),
            limits: TuneLimits::default(),
        }
    }
}

impl TuneConfig {
    /// The record the live runner starts from.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            grid: FrameGrid::new(self.rows, self.columns),
            frame_rate: self.frame_rate,
            target_height: self.target_height,
            mirrored: self.mirrored,
            scroll_paused: !self.scroll,
        }
    }
}

/// Bounds for the live-tuning keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuneLimits {
    #[serde(default = "default_max_rows")]
    pub max_rows: u32,
    #[serde(default = "default_max_columns")]
    pub max_columns: u32,
    #[serde(default = "default_min_fps")]
    pub min_frame_rate: u32,
    #[serde(default = "default_max_fps")]
    pub max_frame_rate: u32,
    #[serde(default = "default_min_height")]
    pub min_target_height: u32,
    #[serde(default = "default_max_height")]
    pub max_target_height: u32,
}

impl Default for TuneLimits {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            max_columns: default_max_columns(),
            min_frame_rate: default_min_fps(),
            max_frame_rate: default_max_fps(),
            min_target_height: default_min_height(),
            max_target_height: default_max_height(),
        }
    }
}

/// Clean runner: fixed grid with margins/gaps, integer sprite scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayConfig {
    #[serde(default = "default_play_width")]
    pub width: u32,
    #[serde(default = "default_play_height")]
    pub height: u32,
    #[serde(default = "default_play_speed")]
    pub background_speed: u32,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default = "default_sprite_scale")]
    pub sprite_scale: u32,
    #[serde(default = "default_play_runner_x")]
    pub runner_x: i32,
    #[serde(default = "default_play_ground_margin")]
    pub ground_margin: u32,
    #[serde(default = "default_play_grid")]
    pub grid: FrameGrid,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            width: default_play_width(),
            height: default_play_height(),
            background_speed: default_play_speed(),
            frame_rate: default_frame_rate(),
            sprite_scale: default_sprite_scale(),
            runner_x: default_play_runner_x(),
            ground_margin: default_play_ground_margin(),
            grid: default_play_grid(),
        }
    }
}

/// Everything the live runner derives its frames and tile from.
/// Never mutated in place: every key press builds a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    pub grid: FrameGrid,
    pub frame_rate: u32,
    pub target_height: u32,
    pub mirrored: bool,
    pub scroll_paused: bool,
}

// Default value functions
fn default_log_level() -> String { "info".to_string() }
fn default_asset_dir() -> PathBuf { PathBuf::from(".") }
fn default_background() -> PathBuf { PathBuf::from("fondo.png") }
fn default_sheet() -> PathBuf { PathBuf::from("runner_sheet.png") }
fn default_true() -> bool { true }
fn default_one() -> u32 { 1 }
fn default_columns() -> u32 { 6 }
fn default_frame_rate() -> u32 { 10 }

fn default_tune_width() -> u32 { 160 }
fn default_tune_height() -> u32 { 144 }
fn default_window_scale() -> u32 { 4 }
fn default_target_height() -> u32 { 24 }
fn default_tune_runner_x() -> i32 { 40 }
fn default_tune_ground_margin() -> u32 { 12 }

fn default_max_rows() -> u32 { 12 }
fn default_max_columns() -> u32 { 24 }
fn default_min_fps() -> u32 { 2 }
fn default_max_fps() -> u32 { 30 }
fn default_min_height() -> u32 { 10 }
fn default_max_height() -> u32 { 40 }

fn default_play_width() -> u32 { 1024 }
fn default_play_height() -> u32 { 576 }
fn default_play_speed() -> u32 { 2 }
fn default_sprite_scale() -> u32 { 3 }
fn default_play_runner_x() -> i32 { 120 }
fn default_play_ground_margin() -> u32 { 60 }
fn default_play_grid() -> FrameGrid { FrameGrid::new(1, 6) }
