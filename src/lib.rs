//! Sprite-sheet runner prototype.
//!
//! Slices a sheet into animation frames, plays them back by wall-clock time,
//! and scrolls an (optionally mirrored) background tile behind them. The
//! window loop lives in `main.rs`; everything here is plain data in, data out.

pub mod animator;
pub mod app;
pub mod assets;
pub mod config;
pub mod draw;
pub mod error;
pub mod scroll;
pub mod slicer;
pub mod types;

pub use error::{Error, Result};
