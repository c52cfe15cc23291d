use std::path::Path;

use bevy::log::warn;
use image::RgbaImage;
use image::imageops;
use image::imageops::FilterType;

/// Reads and decodes an icon. Failures are logged and become `None`, which the
/// label draws as an empty icon region.
pub fn load_icon(path: &Path) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(icon) => Some(icon.to_rgba8()),
        Err(error) => {
            warn!("icon {} could not be loaded: {error}", path.display());
            None
        },
    }
}

/// Shrinks `icon` so its longer edge is at most `max_edge`, keeping the aspect ratio.
/// Icons already within the cap are returned unscaled.
pub fn fit_icon(icon: &RgbaImage, max_edge: u32) -> RgbaImage {
    let (width, height) = icon.dimensions();
    let longest = width.max(height);
    if longest <= max_edge || longest == 0 {
        return icon.clone();
    }
    let scaled = |edge: u32| (u64::from(edge) * u64::from(max_edge) / u64::from(longest)).max(1);
    let width = u32::try_from(scaled(width)).unwrap_or(max_edge);
    let height = u32::try_from(scaled(height)).unwrap_or(max_edge);
    imageops::resize(icon, width, height, FilterType::Triangle)
}
