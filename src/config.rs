use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::{IconError, Result};
use crate::font::DEFAULT_FONT_PATH;
use crate::models::{parse_color, IconSpec, Theme};

pub const DEFAULT_OUT_DIR: &str = "extension/icons";
pub const DEFAULT_SIZES: [u32; 3] = [16, 48, 128];
/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "generate-icons.conf";
pub const CONFIG_ENV: &str = "GENERATE_ICONS_CONFIG";
pub const THEME_ENV: &str = "GENERATE_ICONS_THEME";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub out_dir: PathBuf,
    pub sizes: Vec<u32>,
    pub spec: IconSpec,
    pub font_path: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            sizes: DEFAULT_SIZES.to_vec(),
            spec: Theme::default().spec(),
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
        }
    }
}

impl GeneratorConfig {
    /// Apply the command line: the first positional argument, if any, is the
    /// output directory.
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator<Item = OsString>,
    {
        if let Some(dir) = args.into_iter().next() {
            self.out_dir = PathBuf::from(dir);
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.spec = theme.spec();
    }

    fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(IconError::Config("no icon sizes configured".into()));
        }
        if let Some(bad) = self.sizes.iter().find(|&&s| s == 0) {
            return Err(IconError::Config(format!("icon size must be positive, got {}", bad)));
        }
        if !self.spec.glyph_scale.is_finite() || self.spec.glyph_scale <= 0.0 {
            return Err(IconError::Config(format!(
                "glyph_scale must be a positive number, got {}",
                self.spec.glyph_scale
            )));
        }
        Ok(())
    }
}

/// Settings as they appear in a config file; unset fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    out_dir: Option<String>,
    sizes: Option<Vec<u32>>,
    theme: Option<String>,
    glyph: Option<String>,
    glyph_scale: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    accent: Option<String>,
    font_path: Option<String>,
}

impl ConfigFile {
    /// Apply on top of `cfg`. The base palette comes from `theme_override`
    /// when given, else from the file's own `theme`; per-key settings are
    /// layered over it.
    fn apply(self, cfg: &mut GeneratorConfig, theme_override: Option<Theme>) -> Result<()> {
        if let Some(v) = self.out_dir {
            cfg.out_dir = PathBuf::from(v);
        }
        if let Some(v) = self.sizes {
            cfg.sizes = v;
        }
        match (theme_override, self.theme) {
            (Some(theme), _) => cfg.set_theme(theme),
            (None, Some(name)) => cfg.set_theme(Theme::from_name(&name)?),
            (None, None) => {}
        }
        if let Some(v) = self.glyph {
            cfg.spec.glyph_scale = IconSpec::scale_for_glyph(&v);
            cfg.spec.glyph = v;
        }
        if let Some(v) = self.glyph_scale {
            cfg.spec.glyph_scale = v;
        }
        if let Some(v) = self.background {
            cfg.spec.background = parse_color(&v)?;
        }
        if let Some(v) = self.text_color {
            cfg.spec.text_color = parse_color(&v)?;
        }
        if let Some(v) = self.accent {
            cfg.spec.accent = parse_color(&v)?;
        }
        if let Some(v) = self.font_path {
            cfg.font_path = PathBuf::from(v);
        }
        Ok(())
    }
}

fn parse_key_values(content: &str) -> Result<ConfigFile> {
    let mut file = ConfigFile::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            let v = v.trim();
            match k.trim() {
                "out_dir" => file.out_dir = Some(v.to_string()),
                "sizes" => file.sizes = Some(parse_sizes(v)?),
                "theme" => file.theme = Some(v.to_string()),
                "glyph" => file.glyph = Some(v.to_string()),
                "glyph_scale" => {
                    let scale = v.parse::<f32>().map_err(|_| {
                        IconError::Config(format!("invalid glyph_scale '{}'", v))
                    })?;
                    file.glyph_scale = Some(scale);
                }
                "background" => file.background = Some(v.to_string()),
                "text_color" => file.text_color = Some(v.to_string()),
                "accent" => file.accent = Some(v.to_string()),
                "font_path" => file.font_path = Some(v.to_string()),
                other => debug!("ignoring unknown config key '{}'", other),
            }
        }
    }
    Ok(file)
}

fn parse_sizes(v: &str) -> Result<Vec<u32>> {
    v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| IconError::Config(format!("invalid size '{}'", s)))
        })
        .collect()
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path).map_err(|source| IconError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str::<ConfigFile>(&content).map_err(|source| IconError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    } else {
        parse_key_values(&content)
    }
}

fn build_config(file: ConfigFile, theme_override: Option<Theme>) -> Result<GeneratorConfig> {
    let mut cfg = GeneratorConfig::default();
    file.apply(&mut cfg, theme_override)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read a config file on top of the defaults. `.json` files are parsed as
/// JSON, everything else as `key=value` lines.
pub fn read_config(path: &Path) -> Result<GeneratorConfig> {
    build_config(read_config_file(path)?, None)
}

/// Resolve the configuration from the environment: an explicit config file,
/// else `generate-icons.conf` when present, else defaults. The theme
/// variable replaces the file's `theme` but not its per-key overrides.
pub fn load_config() -> Result<GeneratorConfig> {
    load_config_with(|key| std::env::var(key).ok())
}

pub fn load_config_with(env: impl Fn(&str) -> Option<String>) -> Result<GeneratorConfig> {
    let theme_override = match env(THEME_ENV).filter(|t| !t.trim().is_empty()) {
        Some(name) => Some(Theme::from_name(&name)?),
        None => None,
    };
    let file = match env(CONFIG_ENV).filter(|p| !p.trim().is_empty()) {
        Some(path) => read_config_file(Path::new(path.trim()))?,
        None => {
            let local = Path::new(DEFAULT_CONFIG_FILE);
            if local.is_file() {
                read_config_file(local)?
            } else {
                ConfigFile::default()
            }
        }
    };
    let cfg = build_config(file, theme_override)?;
    debug!("config: {:?}", cfg);
    Ok(cfg)
}
