use crate::error::{IconError, Result};

/// RGBA colour, 8 bits per channel.
pub type Color = [u8; 4];

/// Font size as a fraction of the icon size for two-letter glyphs.
pub const TWO_LETTER_SCALE: f32 = 0.40;
/// Font size as a fraction of the icon size for single-letter glyphs.
pub const ONE_LETTER_SCALE: f32 = 0.55;

/// Everything needed to paint one icon apart from its size.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSpec {
    pub background: Color,
    pub text_color: Color,
    pub accent: Color,
    pub glyph: String,
    pub glyph_scale: f32,
}

impl IconSpec {
    /// Font scale that fits a glyph of this many characters.
    pub fn scale_for_glyph(glyph: &str) -> f32 {
        if glyph.chars().count() <= 1 {
            ONE_LETTER_SCALE
        } else {
            TWO_LETTER_SCALE
        }
    }
}

impl Default for IconSpec {
    fn default() -> Self {
        Theme::default().spec()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Red "NP" on black.
    #[default]
    Red,
    /// Green "N" on black.
    Green,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Red, Theme::Green];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Red => "red",
            Theme::Green => "green",
        }
    }

    pub fn from_name(name: &str) -> Result<Theme> {
        let wanted = name.trim();
        Theme::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                IconError::Config(format!(
                    "unknown theme '{}' (expected one of: red, green)",
                    wanted
                ))
            })
    }

    pub fn spec(self) -> IconSpec {
        match self {
            Theme::Red => IconSpec {
                background: [0, 0, 0, 255],
                text_color: [255, 0, 0, 255],
                accent: [139, 0, 0, 255],
                glyph: "NP".to_string(),
                glyph_scale: TWO_LETTER_SCALE,
            },
            Theme::Green => IconSpec {
                background: [0, 0, 0, 255],
                text_color: [0, 255, 0, 255],
                accent: [0, 100, 0, 255],
                glyph: "N".to_string(),
                glyph_scale: ONE_LETTER_SCALE,
            },
        }
    }
}

/// Parse `#RRGGBB`, `#RRGGBBAA` or `r,g,b[,a]`.
pub fn parse_color(s: &str) -> Result<Color> {
    let s = s.trim();
    let bad = || IconError::Config(format!("invalid colour '{}'", s));

    if let Some(hex) = s.strip_prefix('#') {
        // from_str_radix alone would accept a leading '+'
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let mut out = [0u8, 0, 0, 255];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).map_err(|_| bad())?;
            out[i] = u8::from_str_radix(pair, 16).map_err(|_| bad())?;
        }
        return Ok(out);
    }

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(bad());
    }
    let mut out = [0u8, 0, 0, 255];
    for (i, p) in parts.iter().enumerate() {
        if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        out[i] = p.parse::<u8>().map_err(|_| bad())?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup() {
        assert_eq!(Theme::from_name("red").unwrap(), Theme::Red);
        assert_eq!(Theme::from_name(" Green ").unwrap(), Theme::Green);
        assert!(Theme::from_name("blue").is_err());
    }

    #[test]
    fn test_theme_palettes() {
        let red = Theme::Red.spec();
        assert_eq!(red.glyph, "NP");
        assert_eq!(red.text_color, [255, 0, 0, 255]);
        assert_eq!(red.accent, [139, 0, 0, 255]);
        assert_eq!(red.glyph_scale, TWO_LETTER_SCALE);

        let green = Theme::Green.spec();
        assert_eq!(green.glyph, "N");
        assert_eq!(green.glyph_scale, ONE_LETTER_SCALE);
        assert_eq!(IconSpec::default(), red);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#8B0000").unwrap(), [139, 0, 0, 255]);
        assert_eq!(parse_color("#ff000080").unwrap(), [255, 0, 0, 128]);
        assert_eq!(parse_color("0, 100, 0").unwrap(), [0, 100, 0, 255]);
        assert_eq!(parse_color("1,2,3,4").unwrap(), [1, 2, 3, 4]);
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("300,0,0").is_err());
        assert!(parse_color("red").is_err());
    }

    #[test]
    fn test_parse_color_rejects_signs() {
        assert!(parse_color("#+1+2+3").is_err());
        assert!(parse_color("#+1+2+3+4").is_err());
        assert!(parse_color("+1,2,3").is_err());
        assert!(parse_color("1,,3").is_err());
    }

    #[test]
    fn test_scale_for_glyph() {
        assert_eq!(IconSpec::scale_for_glyph("N"), ONE_LETTER_SCALE);
        assert_eq!(IconSpec::scale_for_glyph("NP"), TWO_LETTER_SCALE);
    }
}
