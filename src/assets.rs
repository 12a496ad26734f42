// Loads the sprite sheet and background from disk.
// Both runners call this once at startup; a missing file ends the program.

use crate::error::{Error, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Join an asset name onto the asset directory (absolute names are kept as-is).
pub fn resolve(asset_dir: &Path, name: &Path) -> PathBuf {
    if name.is_absolute() { name.to_path_buf() } else { asset_dir.join(name) }
}

/// Decode an image file into RGBA pixels.
/// Sheets without transparency (JPG) come back fully opaque.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    if !path.is_file() {
        return Err(Error::MissingAsset { path: path.to_path_buf() });
    }

    let decoded = image::open(path).map_err(|source| Error::ImageDecode {
        path: path.display().to_string(),
        source,
    })?;
    debug!(color = ?decoded.color(), "decoded {}", path.display());

    let rgba = decoded.to_rgba8();
    info!(width = rgba.width(), height = rgba.height(), "loaded {}", path.display());
    Ok(rgba)
}
