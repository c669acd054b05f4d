use std::fs;
use std::path::Path;

use ab_glyph::{point, Font, FontVec, GlyphId, OutlinedGlyph, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::pixelops::weighted_sum;
use imageproc::rect::Rect;
use log::debug;

use crate::builtin_font;

/// Bold font shipped with DejaVu on most Linux distributions.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

/// Ink bounds of a piece of text, right and bottom exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    fn include(&mut self, other: TextBounds) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        self.left = self.left.min(other.left);
        self.top = self.top.min(other.top);
        self.right = self.right.max(other.right);
        self.bottom = self.bottom.max(other.bottom);
    }
}

/// Font used for the icon glyph. Sizes are em sizes in pixels.
pub enum GlyphFont {
    TrueType(FontVec),
    Builtin,
}

impl GlyphFont {
    /// Load a TrueType/OpenType font, falling back to the built-in bitmap font
    /// when the file is missing or can't be parsed.
    pub fn load(path: &Path) -> GlyphFont {
        match fs::read(path) {
            Ok(bytes) => match GlyphFont::from_bytes(bytes) {
                Some(font) => {
                    debug!("using font {}", path.display());
                    font
                }
                None => {
                    debug!("{} is not a usable font, using built-in font", path.display());
                    GlyphFont::Builtin
                }
            },
            Err(e) => {
                debug!("cannot read font {}: {}, using built-in font", path.display(), e);
                GlyphFont::Builtin
            }
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Option<GlyphFont> {
        FontVec::try_from_vec(bytes).ok().map(GlyphFont::TrueType)
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, GlyphFont::Builtin)
    }

    /// Bounds of `text` drawn with its top-left at the origin.
    pub fn text_bbox(&self, text: &str, px: u32) -> TextBounds {
        let mut bounds = TextBounds::default();
        match self {
            GlyphFont::TrueType(font) => {
                for g in layout(font, px, text) {
                    let b = g.px_bounds();
                    bounds.include(TextBounds {
                        left: b.min.x as i32,
                        top: b.min.y as i32,
                        right: b.max.x as i32,
                        bottom: b.max.y as i32,
                    });
                }
            }
            GlyphFont::Builtin => {
                let s = builtin_font::scale_for_px(px) as i32;
                builtin_font::for_each_cell(text, |x, y| {
                    let (x, y) = (x as i32 * s, y as i32 * s);
                    bounds.include(TextBounds { left: x, top: y, right: x + s, bottom: y + s });
                });
            }
        }
        bounds
    }

    /// Draw `text` with its layout origin at `origin`. Anything outside the
    /// canvas is clipped.
    pub fn draw_text(&self, img: &mut RgbaImage, origin: (i32, i32), text: &str, px: u32, color: Rgba<u8>) {
        let (ox, oy) = origin;
        match self {
            GlyphFont::TrueType(font) => {
                let (w, h) = (img.width() as i32, img.height() as i32);
                for g in layout(font, px, text) {
                    let b = g.px_bounds();
                    let (gx, gy) = (b.min.x as i32 + ox, b.min.y as i32 + oy);
                    g.draw(|x, y, coverage| {
                        let (x, y) = (gx + x as i32, gy + y as i32);
                        if x < 0 || y < 0 || x >= w || y >= h {
                            return;
                        }
                        let dst = img.get_pixel_mut(x as u32, y as u32);
                        *dst = blend(*dst, color, coverage);
                    });
                }
            }
            GlyphFont::Builtin => {
                let s = builtin_font::scale_for_px(px);
                builtin_font::for_each_cell(text, |x, y| {
                    let rect = Rect::at(ox + (x * s) as i32, oy + (y * s) as i32).of_size(s, s);
                    draw_filled_rect_mut(img, rect, color);
                });
            }
        }
    }
}

/// Lay the text out on one line with the ascender at y = 0.
fn layout(font: &FontVec, px: u32, text: &str) -> Vec<OutlinedGlyph> {
    let scale = em_scale(font, px as f32);
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0f32;
    let mut last: Option<GlyphId> = None;
    let mut glyphs = Vec::new();
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = last {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(id);
        last = Some(id);
        if let Some(outlined) = font.outline_glyph(glyph) {
            glyphs.push(outlined);
        }
    }
    glyphs
}

// ab_glyph scales by ascent - descent; convert from an em size.
fn em_scale(font: &FontVec, px: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(px * font.height_unscaled() / upem),
        _ => PxScale::from(px),
    }
}

fn blend(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let a = coverage.clamp(0.0, 1.0) * (src[3] as f32 / 255.0);
    weighted_sum(src, dst, a, 1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_font_falls_back() {
        let font = GlyphFont::load(&PathBuf::from("/nonexistent/font/DejaVuSans-Bold.ttf"));
        assert!(font.is_builtin());
    }

    #[test]
    fn test_garbage_font_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        fs::write(&path, b"definitely not a font").unwrap();
        assert!(GlyphFont::load(&path).is_builtin());
    }

    #[test]
    fn test_builtin_bbox() {
        let font = GlyphFont::Builtin;
        // "NP" at scale 1: N spans columns 0..5, P spans 6..11, both 7 rows
        let b = font.text_bbox("NP", 6);
        assert_eq!(b, TextBounds { left: 0, top: 0, right: 11, bottom: 7 });

        let b = font.text_bbox("N", 26);
        assert_eq!(b, TextBounds { left: 0, top: 0, right: 15, bottom: 21 });

        assert!(font.text_bbox("", 20).is_empty());
        assert!(font.text_bbox("  ", 20).is_empty());
    }

    #[test]
    fn test_builtin_bbox_skips_leading_blank_columns() {
        // 'I' has no ink in its first column
        let b = GlyphFont::Builtin.text_bbox("I", 6);
        assert_eq!(b.left, 1);
        assert_eq!(b.width(), 3);
    }

    #[test]
    fn test_builtin_draw_clips() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let red = Rgba([255, 0, 0, 255]);
        GlyphFont::Builtin.draw_text(&mut img, (-2, -2), "NP", 6, red);
        GlyphFont::Builtin.draw_text(&mut img, (2, 2), "NP", 6, red);
        assert!(img.pixels().any(|p| *p == red));
    }

    #[test]
    fn test_blend() {
        let bg = Rgba([0, 0, 0, 255]);
        let fg = Rgba([255, 0, 0, 255]);
        assert_eq!(blend(bg, fg, 1.0), fg);
        assert_eq!(blend(bg, fg, 0.0), bg);
        let half = blend(bg, fg, 0.5);
        assert!(half[0] == 127 || half[0] == 128, "got {:?}", half);
        assert_eq!((half[1], half[2], half[3]), (0, 0, 255));
    }

    #[test]
    fn test_system_font_bbox_when_available() {
        let path = Path::new(DEFAULT_FONT_PATH);
        if !path.exists() {
            return;
        }
        let font = GlyphFont::load(path);
        assert!(!font.is_builtin());
        let b = font.text_bbox("NP", 51);
        assert!(b.width() > 0 && b.height() > 0);
        assert!(b.top > 0, "cap height starts below the ascender");
        assert!(b.height() <= 51);
    }
}
