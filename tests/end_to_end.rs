//! From files on disk to the frame shown on screen, without opening a window.

use image::{Rgba, RgbaImage};
use pixel_runner::animator;
use pixel_runner::app::{Action, TuneState};
use pixel_runner::assets;
use pixel_runner::config::AppConfig;
use pixel_runner::draw::{blit_alpha, blit_opaque, fill};
use pixel_runner::scroll;
use pixel_runner::types::FrameBuffer;
use pixel_runner::Error;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn write_assets(dir: &std::path::Path) {
    // six 40x40 poses, each a different shade of red
    RgbaImage::from_fn(240, 40, |x, _| Rgba([(x / 40 * 40) as u8, 0, 0, 255]))
        .save(dir.join("runner_sheet.png"))
        .unwrap();
    RgbaImage::from_fn(100, 144, |x, _| Rgba([0, x as u8, 0, 255]))
        .save(dir.join("fondo.png"))
        .unwrap();
}

#[test]
fn test_tune_runner_from_disk() {
    let dir = tempdir().unwrap();
    write_assets(dir.path());
    let config_file = dir.path().join("pixel-runner.toml");
    std::fs::write(&config_file, format!("[general]\nasset_dir = {:?}\n", dir.path())).unwrap();

    let config = AppConfig::load(&config_file).unwrap();
    let sheet = assets::load_image(&config.sheet_path()).unwrap();
    let background = assets::load_image(&config.background_path()).unwrap();

    let start = Instant::now();
    let tune = &config.tune;
    let mut state = TuneState::new(
        sheet,
        background,
        tune.logical_height,
        tune.limits,
        tune.runner_config(),
        start,
    )
    .unwrap();

    assert_eq!(state.frames.len(), 6);
    assert_eq!(state.frames.frame_size(), Some((24, 24)));
    assert_eq!(state.tile.width(), 200);

    let at = start + Duration::from_millis(250);
    let idx = animator::current_index(&state.clock, at, state.frames.count().unwrap());
    assert_eq!(idx, 2);
    assert_eq!(state.current_frame(at).unwrap().get_pixel(0, 0)[0], 80);

    // one tick of scroll, then draw the scene the way the window loop does
    state.tick(tune.background_speed);
    let mut screen = FrameBuffer::new(tune.logical_width as usize, tune.logical_height as usize);
    fill(&mut screen, 0);
    for x in scroll::tile_positions(&state.scroll, tune.logical_width).unwrap() {
        blit_opaque(&mut screen, &state.tile.image, x, 0);
    }
    // offset -1: screen column 0 shows tile column 1
    assert_eq!((screen.pixels[0] >> 8) & 0xFF, 1);
    // and the last column is still covered
    assert_ne!(screen.pixels[159], 0);

    let frame = state.current_frame(at).unwrap();
    blit_alpha(&mut screen, frame, tune.runner_x as i64, 108);
    assert_eq!(screen.pixels[108 * 160 + 40] >> 16, 80);

    state.handle(Action::HeightUp, at);
    assert_eq!(state.frames.frame_size(), Some((25, 25)));
    assert_eq!(state.current_frame(at).unwrap().get_pixel(0, 0)[0], 0);
}

#[test]
fn test_missing_sheet_is_reported() {
    let dir = tempdir().unwrap();
    let config = AppConfig::from_toml(&format!("[general]\nasset_dir = {:?}\n", dir.path())).unwrap();
    let err = assets::load_image(&config.sheet_path()).unwrap_err();
    assert!(matches!(err, Error::MissingAsset { .. }));
    assert!(err.to_string().contains("runner_sheet.png"));
}
