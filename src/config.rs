//! Theme configuration module.
//!
//! Handles loading, validating, and merging `theme.toml`. Stock defaults are
//! the base layer; a `theme.toml` in the theme directory overrides any subset
//! of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [svg]
//! lazy_attribute = "data-lazy"           # Attribute holding the deferred sprite URL
//! lazy_disabled_marker = "action=elementor"  # Request-URI marker that forces eager sprites
//!
//! [svg.sprites]
//! icons = "/assets/sprites/icons.svg"    # sprite name → sprite sheet URL
//!
//! [svg.inline.ui]
//! close = "<svg viewBox=\"0 0 24 24\">...</svg>"  # group → name → markup
//!
//! [excerpt]
//! words = 55                             # Word limit for cleaned excerpts
//! more = "..."                           # Appended when an excerpt is cut
//!
//! [templates]
//! root = "."                             # Theme root that holds src/<project>/
//! extension = "php"                      # Template file extension
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::html::Excerpt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "theme.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Theme configuration loaded from `theme.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Inline SVG library, sprite sheets and lazy-loading settings.
    pub svg: SvgConfig,
    /// Plain-text excerpt settings used by `html::clean`.
    pub excerpt: ExcerptConfig,
    /// Template lookup settings.
    pub templates: TemplatesConfig,
}

impl ThemeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.svg.lazy_attribute.trim().is_empty() {
            return Err(ConfigError::Validation(
                "svg.lazy_attribute must not be empty".into(),
            ));
        }
        if self.excerpt.words == 0 {
            return Err(ConfigError::Validation(
                "excerpt.words must be at least 1".into(),
            ));
        }
        if self.templates.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "templates.extension must not start with a dot".into(),
            ));
        }
        Ok(())
    }
}

/// SVG settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SvgConfig {
    /// Attribute that carries the sprite URL when a sprite is lazy-loaded.
    pub lazy_attribute: String,
    /// Request-URI substring that disables lazy sprites (page-builder
    /// previews can't run the lazy loader).
    pub lazy_disabled_marker: String,
    /// Sprite sheet URLs by sprite name.
    pub sprites: BTreeMap<String, String>,
    /// Inline SVG markup by group, then by name.
    pub inline: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            lazy_attribute: "data-lazy".to_string(),
            lazy_disabled_marker: "action=elementor".to_string(),
            sprites: BTreeMap::new(),
            inline: BTreeMap::new(),
        }
    }
}

/// Excerpt settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExcerptConfig {
    /// Maximum words kept in an excerpt.
    pub words: usize,
    /// Marker appended to cut excerpts.
    pub more: String,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        let excerpt = Excerpt::default();
        Self {
            words: excerpt.words,
            more: excerpt.more,
        }
    }
}

impl From<&ExcerptConfig> for Excerpt {
    fn from(config: &ExcerptConfig) -> Self {
        Excerpt {
            words: config.words,
            more: config.more.clone(),
        }
    }
}

/// Template lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    /// Theme root directory; templates live under `src/<project>/Static/templates/`.
    pub root: PathBuf,
    /// Template file extension, without the dot.
    pub extension: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: "php".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ThemeConfig::default())?)
}

/// Lay a theme's `theme.toml` over the stock defaults.
///
/// Sections merge key by key, so `[svg.sprites]` in the theme adds sheets
/// without wiping `lazy_attribute`. Any other value replaces the default
/// outright. A theme has a single config file, so this runs once per load.
pub fn merge_toml(mut base: toml::Value, overlay: toml::Value) -> toml::Value {
    overlay_into(&mut base, overlay);
    base
}

fn overlay_into(target: &mut toml::Value, overlay: toml::Value) {
    match (target, overlay) {
        (toml::Value::Table(section), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                match section.get_mut(&key) {
                    Some(existing) => overlay_into(existing, value),
                    None => {
                        section.insert(key, value);
                    }
                }
            }
        }
        (target, overlay) => *target = overlay,
    }
}

/// Parse the theme's `theme.toml`, if it has one.
///
/// Only the theme root is consulted; templates and assets below it share
/// the same settings.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    match fs::read_to_string(dir.join(CONFIG_FILE)) {
        Ok(content) => Ok(Some(toml::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Build a validated [`ThemeConfig`] from the stock defaults and the
/// theme's overrides.
pub fn resolve_config(
    defaults: toml::Value,
    theme: Option<toml::Value>,
) -> Result<ThemeConfig, ConfigError> {
    let value = match theme {
        Some(theme) => merge_toml(defaults, theme),
        None => defaults,
    };
    let config = ThemeConfig::deserialize(value)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `theme.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<ThemeConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    if overlay.is_some() {
        tracing::debug!(dir = %dir.display(), "applying {CONFIG_FILE} overrides");
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `theme.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# themekit configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# SVG
# ---------------------------------------------------------------------------
[svg]
# Attribute that receives the sprite URL when a sprite is rendered lazily.
lazy_attribute = "data-lazy"

# Request-URI substring that forces eager sprites (page-builder previews).
lazy_disabled_marker = "action=elementor"

# Sprite sheets by name.
[svg.sprites]
# icons = "/assets/sprites/icons.svg"

# Inline SVG markup, grouped. Rendered with `render_inline(name, group)`.
[svg.inline]
# [svg.inline.ui]
# close = '<svg viewBox="0 0 24 24"><path d="M6 6l12 12M18 6L6 18"/></svg>'

# ---------------------------------------------------------------------------
# Excerpts
# ---------------------------------------------------------------------------
[excerpt]
# Maximum number of words kept when cleaning text into an excerpt.
words = 55

# Appended when an excerpt is cut.
more = "..."

# ---------------------------------------------------------------------------
# Templates
# ---------------------------------------------------------------------------
[templates]
# Theme root. Templates resolve to <root>/src/<project>/Static/templates/.
root = "."

# Template file extension, without the dot.
extension = "php"
"##
}
