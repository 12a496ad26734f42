// Every variant states *where* things went wrong.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An image the runner needs at startup is not on disk.
    #[error("Missing asset: '{}' was not found", path.display())]
    MissingAsset { path: PathBuf },

    /// Grid/scale settings that produce no usable frames (or a zero-width tile).
    #[error("Invalid slice configuration: {0}")]
    InvalidSliceConfiguration(String),

    #[error("Image decode error ({path}): {source}")]
    ImageDecode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
