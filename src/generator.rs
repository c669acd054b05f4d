use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::debug;

use crate::config::GeneratorConfig;
use crate::error::{IconError, Result};
use crate::font::GlyphFont;
use crate::icon::{self, render_icon};
use crate::models::IconSpec;

pub fn icon_path(out_dir: &Path, size: u32) -> PathBuf {
    out_dir.join(format!("icon{}.png", size))
}

/// Render one icon and write it to `<out_dir>/icon<size>.png`, replacing any
/// existing file.
pub fn generate(size: u32, out_dir: &Path, spec: &IconSpec, font: &GlyphFont) -> Result<PathBuf> {
    if size == 0 {
        return Err(IconError::InvalidSize(size));
    }
    debug!(
        "rendering {}x{} (border {}, radius {}, font {}px)",
        size,
        size,
        icon::border_width(size),
        icon::corner_radius(size),
        icon::font_px(size, spec.glyph_scale)
    );
    let img = render_icon(size, spec, font);

    fs::create_dir_all(out_dir).map_err(|source| IconError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = icon_path(out_dir, size);
    img.save_with_format(&path, ImageFormat::Png)
        .map_err(|source| IconError::Encode { path: path.clone(), source })?;
    println!("    Created {}", path.display());
    Ok(path)
}

/// Generate every configured size in order. Stops at the first failure;
/// files already written are left in place.
pub fn generate_all(cfg: &GeneratorConfig) -> Result<Vec<PathBuf>> {
    let font = GlyphFont::load(&cfg.font_path);
    cfg.sizes
        .iter()
        .map(|&size| generate(size, &cfg.out_dir, &cfg.spec, &font))
        .collect()
}
