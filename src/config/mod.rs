//! Configuration module for ansimirc
//!
//! Handles loading of conversion defaults from TOML files. Command line flags
//! override whatever is loaded here.

use crate::canvas::DEFAULT_WIDTH;
use crate::format::{Charset, DecodeOptions, EncodeOptions};
use crate::render::{RenderOptions, BASE_FONT_SIZE};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Columns used when neither the command line nor SAUCE gives a width
    pub width: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font file to render with; tried before any discovery
    pub path: Option<PathBuf>,
    /// Family name looked up in the system font database
    pub family: Option<String>,
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            family: None,
            size: BASE_FONT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub scale: f32,
    /// Scale of the thumbnail written next to the main image
    pub thumb_scale: f32,
    pub reduce_palette: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            thumb_scale: 0.25,
            reduce_palette: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MircConfig {
    /// Reduce decoded colors to the 16-color palette
    pub force_16: bool,
    /// Encode with all 99 colors
    pub extended_colors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnsiConfig {
    pub charset: Charset,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub mirc: MircConfig,
    #[serde(default)]
    pub ansi: AnsiConfig,
}

impl Config {
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("org", "ansimirc", "ansimirc")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config at `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring config file: {}", e);
            Self::default()
        })
    }

    pub fn decode_options(&self, byte_limit: Option<u64>) -> DecodeOptions {
        DecodeOptions {
            byte_limit,
            charset: self.ansi.charset,
            force_16: self.mirc.force_16,
        }
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            charset: self.ansi.charset,
            extended_colors: self.mirc.extended_colors,
        }
    }

    /// Options for the main image, or the thumbnail when `thumbnail` is set
    pub fn render_options(&self, thumbnail: bool) -> RenderOptions {
        RenderOptions {
            font_size: self.font.size,
            scale: if thumbnail {
                self.render.thumb_scale
            } else {
                self.render.scale
            },
            reduce_palette: self.render.reduce_palette,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.canvas.width, 80);
        assert!(config.font.path.is_none());
        assert_eq!(config.font.size, 16.0);
        assert_eq!(config.render.scale, 1.0);
        assert_eq!(config.ansi.charset, Charset::Cp437);
        assert!(!config.mirc.force_16);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.font.family = Some("DejaVu Sans Mono".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.font.family, config.font.family);
        assert_eq!(parsed.render.thumb_scale, config.render.thumb_scale);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [canvas]
            width = 160

            [font]
            path = "/usr/share/fonts/ibm-vga.ttf"

            [render]
            scale = 2.0

            [mirc]
            extended_colors = true

            [ansi]
            charset = "utf8"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.canvas.width, 160);
        assert_eq!(
            config.font.path,
            Some(PathBuf::from("/usr/share/fonts/ibm-vga.ttf"))
        );
        // Unset fields in a present section keep their defaults
        assert_eq!(config.font.size, 16.0);
        assert_eq!(config.render.scale, 2.0);
        assert_eq!(config.render.thumb_scale, 0.25);
        assert!(config.mirc.extended_colors);
        assert!(!config.mirc.force_16);
        assert_eq!(config.ansi.charset, Charset::Utf8);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[mirc]\nforce_16 = true").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert!(config.mirc.force_16);
        assert_eq!(config.canvas.width, 80);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.canvas.width, 80);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[canvas]\nwidth = \"wide\"").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_options_follow_config() {
        let mut config = Config::default();
        config.ansi.charset = Charset::Utf8;
        config.mirc.force_16 = true;
        config.render.scale = 3.0;

        let decode = config.decode_options(Some(10));
        assert_eq!(decode.byte_limit, Some(10));
        assert_eq!(decode.charset, Charset::Utf8);
        assert!(decode.force_16);

        assert_eq!(config.encode_options().charset, Charset::Utf8);
        assert_eq!(config.render_options(false).scale, 3.0);
        assert_eq!(config.render_options(true).scale, 0.25);
    }
}
