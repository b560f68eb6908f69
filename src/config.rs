//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. Configuration is sparse:
//! stock defaults are overridden by whatever keys the user's file specifies.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Photo Gallery"
//!
//! [cloudinary]
//! cloud_name = ""           # Cloudinary cloud name (required)
//! folder = ""               # Asset folder to list, matches sub-paths (required)
//!
//! [placeholders]
//! width = 16                # Width in pixels of the blur-up rendition
//!
//! [display]
//! grid_width = 720          # Rendition width for the index grid
//! detail_width = 2560       # Rendition width for detail pages
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"
//! link = "#333333"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! link = "#cccccc"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [cloudinary]
//! cloud_name = "my-account"
//! folder = "events/2026"
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Credentials
//!
//! API credentials never live in `config.toml`. They are read from the
//! `CLOUDINARY_API_KEY` and `CLOUDINARY_API_SECRET` environment variables,
//! so the config file is safe to commit alongside the content.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide presentation settings.
    pub site: SiteSection,
    /// Asset host location: cloud name and folder to list.
    pub cloudinary: CloudinaryConfig,
    /// Blur-up placeholder settings.
    pub placeholders: PlaceholderConfig,
    /// Rendition widths used by the generated pages.
    pub display: DisplayConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cloudinary.cloud_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cloudinary.cloud_name must be set".into(),
            ));
        }
        if self.cloudinary.folder.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cloudinary.folder must be set".into(),
            ));
        }
        if self.placeholders.width == 0 || self.placeholders.width > 64 {
            return Err(ConfigError::Validation(
                "placeholders.width must be 1-64".into(),
            ));
        }
        if self.display.grid_width == 0 || self.display.detail_width == 0 {
            return Err(ConfigError::Validation(
                "display widths must be non-zero".into(),
            ));
        }
        if self.display.grid_width > self.display.detail_width {
            return Err(ConfigError::Validation(
                "display.grid_width must not exceed display.detail_width".into(),
            ));
        }
        Ok(())
    }
}

/// Load and validate config from a file. A missing file yields the stock
/// defaults (which then fail validation until cloud_name/folder are set).
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Site presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Page title for the index and detail pages.
    pub title: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Photo Gallery".to_string(),
        }
    }
}

/// Asset host location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloudinaryConfig {
    /// Cloudinary cloud name, the `<cloud>` in delivery URLs.
    pub cloud_name: String,
    /// Folder whose assets make up the gallery. Sub-folders are included.
    pub folder: String,
}

/// Blur-up placeholder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    /// Width in pixels of the rendition fetched for the blur-up preview.
    /// Kept tiny so the data URI stays small enough to inline.
    pub width: u32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self { width: 16 }
    }
}

/// Rendition widths used when generating pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Width of grid images on the index page.
    pub grid_width: u32,
    /// Width of the full image on detail pages.
    pub detail_width: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            grid_width: 720,
            detail_width: 2560,
        }
    }
}

/// Light and dark color schemes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme {
                background: "#ffffff".into(),
                text: "#111111".into(),
                text_muted: "#666666".into(),
                link: "#333333".into(),
            },
            dark: ColorScheme {
                background: "#0a0a0a".into(),
                text: "#eeeeee".into(),
                text_muted: "#999999".into(),
                link: "#cccccc".into(),
            },
        }
    }
}

/// A single color scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    pub text_muted: String,
    pub link: String,
}

/// Generate CSS custom properties from the color config.
///
/// Light mode values are the defaults; dark mode overrides apply under
/// `prefers-color-scheme: dark`.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n  --color-background: {};\n  --color-text: {};\n  --color-text-muted: {};\n  --color-link: {};\n}}\n\n@media (prefers-color-scheme: dark) {{\n  :root {{\n    --color-background: {};\n    --color-text: {};\n    --color-text-muted: {};\n    --color-link: {};\n  }}\n}}",
        colors.light.background,
        colors.light.text,
        colors.light.text_muted,
        colors.light.link,
        colors.dark.background,
        colors.dark.text,
        colors.dark.text_muted,
        colors.dark.link,
    )
}

/// Cloudinary API credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Read credentials from `CLOUDINARY_API_KEY` / `CLOUDINARY_API_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("CLOUDINARY_API_KEY")
            .map_err(|_| ConfigError::MissingEnv("CLOUDINARY_API_KEY"))?;
        let api_secret = std::env::var("CLOUDINARY_API_SECRET")
            .map_err(|_| ConfigError::MissingEnv("CLOUDINARY_API_SECRET"))?;
        Ok(Self {
            api_key,
            api_secret,
        })
    }
}

/// A documented stock config.toml with all options and their defaults.
pub fn stock_config_toml() -> String {
    r##"# cloud-gal configuration
# All options are optional unless noted. Defaults shown.

[site]
title = "Photo Gallery"

[cloudinary]
# Required: the cloud name from your Cloudinary console.
cloud_name = ""
# Required: the folder whose assets make up the gallery (sub-folders included).
folder = ""

[placeholders]
# Width in pixels of the tiny rendition fetched for blur-up previews.
width = 16

[display]
# Rendition width for images in the index grid.
grid_width = 720
# Rendition width for the full image on detail pages.
detail_width = 2560

[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"
link = "#333333"

[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
text_muted = "#999999"
link = "#cccccc"

# API credentials are read from the environment, never from this file:
#   CLOUDINARY_API_KEY
#   CLOUDINARY_API_SECRET
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn valid_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.cloudinary.cloud_name = "demo".into();
        config.cloudinary.folder = "gallery".into();
        config
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn defaults_match_documented_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site.title, "Photo Gallery");
        assert_eq!(config.placeholders.width, 16);
        assert_eq!(config.display.grid_width, 720);
        assert_eq!(config.display.detail_width, 2560);
        assert_eq!(config.colors.light.background, "#ffffff");
        assert_eq!(config.colors.dark.background, "#0a0a0a");
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert_eq!(config.placeholders.width, 16);
        assert!(config.cloudinary.cloud_name.is_empty());
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config: SiteConfig = toml::from_str(
            r#"
            [cloudinary]
            cloud_name = "my-account"
            folder = "events/2026"

            [placeholders]
            width = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.cloudinary.cloud_name, "my-account");
        assert_eq!(config.cloudinary.folder, "events/2026");
        assert_eq!(config.placeholders.width, 8);
        // Untouched sections keep defaults
        assert_eq!(config.display.grid_width, 720);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("unknown_key = true");
        assert!(result.is_err());

        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
            [placeholders]
            widht = 8
            "#,
        );
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_cloud_name() {
        let mut config = valid_config();
        config.cloudinary.cloud_name = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_missing_folder() {
        let mut config = valid_config();
        config.cloudinary.folder = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_placeholder_width_out_of_range() {
        let mut config = valid_config();
        config.placeholders.width = 0;
        assert!(config.validate().is_err());

        config.placeholders.width = 65;
        assert!(config.validate().is_err());

        config.placeholders.width = 64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_grid_wider_than_detail() {
        let mut config = valid_config();
        config.display.grid_width = 4000;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [cloudinary]
            cloud_name = "demo"
            folder = "gallery"
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.cloudinary.cloud_name, "demo");
    }

    #[test]
    fn load_config_missing_file_fails_validation() {
        let tmp = TempDir::new().unwrap();
        // Stock defaults have no cloud_name, so validation rejects them.
        let result = load_config(&tmp.path().join("config.toml"));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "not [valid toml").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(&stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.placeholders.width, defaults.placeholders.width);
        assert_eq!(config.display.grid_width, defaults.display.grid_width);
        assert_eq!(config.site.title, defaults.site.title);
    }

    // =========================================================================
    // Color CSS
    // =========================================================================

    #[test]
    fn color_css_contains_both_schemes() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains("--color-background: #ffffff"));
        assert!(css.contains("--color-background: #0a0a0a"));
        assert!(css.contains("prefers-color-scheme: dark"));
    }
}
