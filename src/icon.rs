use image::{Rgba, RgbaImage};

use crate::font::GlyphFont;
use crate::models::IconSpec;

/// Border stroke width: one twelfth of the icon, at least one pixel.
pub fn border_width(size: u32) -> u32 {
    (size / 12).max(1)
}

pub fn corner_radius(size: u32) -> u32 {
    size / 5
}

/// Em size of the glyph font in pixels.
pub fn font_px(size: u32, glyph_scale: f32) -> u32 {
    ((size as f32 * glyph_scale) as u32).max(1)
}

// Render a bordered square with the glyph centred on it
pub fn render_icon(size: u32, spec: &IconSpec, font: &GlyphFont) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(size, size, Rgba(spec.background));
    draw_border(&mut img, Rgba(spec.accent));
    draw_glyph(&mut img, spec, font);
    img
}

fn draw_border(img: &mut RgbaImage, accent: Rgba<u8>) {
    let size = img.width();
    let b = border_width(size) as f32;
    let r = corner_radius(size) as f32;
    // outer edge of the box [b, size - b - 1], pixel edges rather than centres
    let (lo, hi) = (b, size as f32 - b);
    let inner_r = (r - b).max(0.0);

    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let in_outer = in_rounded_rect(px, py, lo, hi, r);
            let in_inner = in_rounded_rect(px, py, lo + b, hi - b, inner_r);
            if in_outer && !in_inner {
                img.put_pixel(x, y, accent);
            }
        }
    }
}

/// Point-in-rounded-square test for a square spanning `lo..hi` on both axes.
fn in_rounded_rect(px: f32, py: f32, lo: f32, hi: f32, radius: f32) -> bool {
    if hi <= lo || px < lo || px > hi || py < lo || py > hi {
        return false;
    }
    let radius = radius.min((hi - lo) * 0.5);
    // nearest point on the rectangle shrunk by the radius
    let cx = px.clamp(lo + radius, hi - radius);
    let cy = py.clamp(lo + radius, hi - radius);
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy <= radius * radius
}

fn draw_glyph(img: &mut RgbaImage, spec: &IconSpec, font: &GlyphFont) {
    let size = img.width() as i32;
    let px = font_px(img.width(), spec.glyph_scale);
    let bbox = font.text_bbox(&spec.glyph, px);
    if bbox.is_empty() {
        return;
    }
    let x = (size - bbox.width()).div_euclid(2) - bbox.left;
    let y = (size - bbox.height()).div_euclid(2) - bbox.top;
    font.draw_text(img, (x, y), &spec.glyph, px, Rgba(spec.text_color));
}
