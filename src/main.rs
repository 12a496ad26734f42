// What you SEE:
// • `tune` (default): 160x144 canvas upscaled x4. The background scrolls left,
//   the runner animates on the ground line, and a HUD shows the slicing setup.
//   W/S rows, A/D columns, Q/E animation fps, -/+ runner height,
//   F mirror background, Space pause scroll, ESC quits.
// • `play`: the clean runner. Fixed grid (margins/gaps from the config file),
//   sprite scaled by an integer factor, no HUD. ESC quits.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pixel_runner::animator::{self, AnimationClock};
use pixel_runner::app::{build_play_frames, runner_y, Action, TuneState};
use pixel_runner::assets;
use pixel_runner::config::{AppConfig, DEFAULT_CONFIG_FILE};
use pixel_runner::draw::{blit_alpha, blit_opaque, draw_text_5x7, fill, hline, rgb, Drawer};
use pixel_runner::scroll::{self, ScrollState, ScrollTile};
use pixel_runner::types::FrameBuffer;
use pixel_runner::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TARGET_TICKS: usize = 60;
const CLEAR_COLOR: u32 = rgb(16, 24, 32);
const GROUND_COLOR: u32 = rgb(80, 96, 112);
const HUD_COLORS: [u32; 3] = [rgb(120, 200, 160), rgb(200, 180, 80), rgb(150, 160, 220)];
const WARN_COLOR: u32 = rgb(230, 80, 80);

#[derive(Parser)]
#[command(name = "pixel-runner")]
#[command(version, about = "Sprite-sheet runner with a scrolling background")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (TOML); defaults are used when it does not exist
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory the sheet/background names are resolved against
    #[arg(long, global = true)]
    asset_dir: Option<PathBuf>,

    /// Sprite sheet file
    #[arg(long, global = true)]
    sheet: Option<PathBuf>,

    /// Background image file
    #[arg(long, global = true)]
    background: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Live-tune the sheet slicing with the keyboard
    Tune,
    /// Run the fixed, clean configuration
    Play,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = AppConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(dir) = cli.asset_dir {
        config.general.asset_dir = dir;
    }
    if let Some(sheet) = cli.sheet {
        config.assets.sheet = sheet;
    }
    if let Some(background) = cli.background {
        config.assets.background = background;
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command.unwrap_or(Commands::Tune) {
        Commands::Tune => run_tune(&config),
        Commands::Play => run_play(&config),
    }
}

/// Once-per-second frame counter, reported through tracing.
struct FpsMeter {
    since: Instant,
    frames: u32,
}

impl FpsMeter {
    fn new() -> Self {
        Self { since: Instant::now(), frames: 0 }
    }

    fn tick(&mut self, now: Instant) {
        self.frames += 1;
        let secs = now.duration_since(self.since);
        if secs >= Duration::from_secs(1) {
            debug!("FPS: {:.1}", self.frames as f32 / secs.as_secs_f32());
            self.frames = 0;
            self.since = now;
        }
    }
}

fn run_tune(config: &AppConfig) -> Result<()> {
    let tune = &config.tune;

    /* --- Assets: a missing file ends the program here --- */
    let background = assets::load_image(&config.background_path())?;
    let sheet = assets::load_image(&config.sheet_path())?;

    let mut state = TuneState::new(
        sheet,
        background,
        tune.logical_height,
        tune.limits,
        tune.runner_config(),
        Instant::now(),
    )
    .context("no frames could be cut from the sprite sheet")?;

    let (w, h) = (tune.logical_width as usize, tune.logical_height as usize);
    let mut drawer = Drawer::new("Runner 8-bit", w, h, tune.window_scale, TARGET_TICKS)?;
    let mut screen = FrameBuffer::new(w, h);
    let ground_y = runner_y(tune.logical_height, 0, tune.ground_margin);
    let mut fps = FpsMeter::new();
    info!("tune mode: W/S rows, A/D cols, Q/E fps, -/+ height, F mirror, Space pause");

    /* ------------------------------ Main loop ------------------------------ */
    'running: while drawer.is_open() {
        let now = Instant::now();

        /* 1) Inputs: each press rebuilds frames + clock from a new config */
        for action in drawer.actions() {
            if action == Action::Quit {
                break 'running;
            }
            state.handle(action, now);
        }

        /* 2) Update */
        state.tick(tune.background_speed);

        /* 3) Draw at logical resolution; the window upscales */
        fill(&mut screen, CLEAR_COLOR);
        for x in scroll::tile_positions(&state.scroll, tune.logical_width)? {
            blit_opaque(&mut screen, &state.tile.image, x, 0);
        }
        hline(&mut screen, 0, w as i32 - 1, ground_y, GROUND_COLOR);

        if let Some(frame) = state.current_frame(now) {
            let y = runner_y(tune.logical_height, frame.height(), tune.ground_margin);
            blit_alpha(&mut screen, frame, tune.runner_x as i64, y as i64);
        }

        for (i, (line, color)) in state.hud_lines().iter().zip(HUD_COLORS).enumerate() {
            draw_text_5x7(&mut screen, 4, 4 + 10 * i as i32, line, color);
        }
        if state.warning.is_some() {
            draw_text_5x7(&mut screen, 4, 34, "BAD GRID - OLD FRAMES", WARN_COLOR);
        }

        drawer.present(&screen)?;
        fps.tick(now);
    }

    Ok(())
}

fn run_play(config: &AppConfig) -> Result<()> {
    let play = &config.play;

    let background = assets::load_image(&config.background_path())?;
    let sheet = assets::load_image(&config.sheet_path())?;

    // No live retuning here, so an unusable grid is fatal.
    let frames = build_play_frames(&sheet, play)?;
    let count = frames.count().ok_or_else(|| {
        Error::InvalidSliceConfiguration("runner frame sequence is empty".into())
    })?;
    let frame_h = frames.frame_size().map_or(0, |(_, fh)| fh);

    let tile = ScrollTile::build(&background, play.height, false)?;
    let mut scroll_state = ScrollState::new(tile.width())?;

    let (w, h) = (play.width as usize, play.height as usize);
    let mut drawer = Drawer::new("Runner", w, h, 1, TARGET_TICKS)?;
    let mut screen = FrameBuffer::new(w, h);
    let runner_top = runner_y(play.height, frame_h, play.ground_margin);
    let clock = AnimationClock::new(Instant::now(), play.frame_rate);
    let mut fps = FpsMeter::new();

    while drawer.is_open() && !drawer.actions().contains(&Action::Quit) {
        let now = Instant::now();
        scroll_state = scroll_state.advance(play.background_speed);

        fill(&mut screen, 0);
        for x in scroll::tile_positions(&scroll_state, play.width)? {
            blit_opaque(&mut screen, &tile.image, x, 0);
        }
        let idx = animator::current_index(&clock, now, count);
        if let Some(frame) = frames.get(idx) {
            blit_alpha(&mut screen, frame, play.runner_x as i64, runner_top as i64);
        }

        drawer.present(&screen)?;
        fps.tick(now);
    }

    Ok(())
}
