//! Run configuration.
//!
//! Every option is optional. Values come from three layers, later layers
//! overriding earlier ones:
//!
//! 1. Stock defaults (bundled resources, linked style mode).
//! 2. An optional TOML file passed with `--config`.
//! 3. Command-line flags.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Page template with {{ root }}, {{ items }}, {{ icons }}, {{ style }}
//! template = "theme/page.html"
//!
//! # Stylesheet template with {{ icons }}
//! style = "theme/style.css"
//!
//! # Directory of <tag>.svg / <tag>.png icons
//! icons_dir = "theme/icons"
//!
//! # JSON map of category -> [extensions]
//! ext_map = "theme/ext_map.json"
//!
//! # "linked": one shared index-style.css at the tree root (default)
//! # "inline": every page embeds its own <style> block
//! style_mode = "linked"
//! ```
//!
//! Relative paths in a config file resolve against the file's directory.
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// How pages get their stylesheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleMode {
    /// Pages link to one shared stylesheet at the tree root.
    #[default]
    Linked,
    /// Pages embed their own stylesheet.
    Inline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Page template; `None` uses the bundled one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    /// Stylesheet template; `None` uses the bundled one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<PathBuf>,
    /// Icon directory; `None` uses the bundled icons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons_dir: Option<PathBuf>,
    /// Extension → category JSON; `None` uses the bundled map.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_map: Option<PathBuf>,
    pub style_mode: StyleMode,
}

impl IndexConfig {
    /// Check that every configured path points at the right kind of entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let files = [
            ("template", &self.template),
            ("style", &self.style),
            ("ext_map", &self.ext_map),
        ];
        for (key, path) in files {
            if let Some(path) = path
                && !path.is_file()
            {
                return Err(ConfigError::Validation(format!(
                    "{key} must be an existing file: {}",
                    path.display()
                )));
            }
        }
        if let Some(dir) = &self.icons_dir
            && !dir.is_dir()
        {
            return Err(ConfigError::Validation(format!(
                "icons_dir must be an existing directory: {}",
                dir.display()
            )));
        }
        Ok(())
    }

    /// Resolve relative paths against `base`.
    pub fn rebase(mut self, base: &Path) -> Self {
        for path in [
            &mut self.template,
            &mut self.style,
            &mut self.icons_dir,
            &mut self.ext_map,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    /// Apply command-line overrides on top of this config.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.template.is_some() {
            self.template = overrides.template;
        }
        if overrides.style.is_some() {
            self.style = overrides.style;
        }
        if overrides.icons_dir.is_some() {
            self.icons_dir = overrides.icons_dir;
        }
        if overrides.ext_map.is_some() {
            self.ext_map = overrides.ext_map;
        }
        if let Some(mode) = overrides.style_mode {
            self.style_mode = mode;
        }
        self
    }
}

/// Command-line layer. `None` leaves the lower layer untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub template: Option<PathBuf>,
    pub style: Option<PathBuf>,
    pub icons_dir: Option<PathBuf>,
    pub ext_map: Option<PathBuf>,
    pub style_mode: Option<StyleMode>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(IndexConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file on top of stock defaults.
///
/// `None` yields the defaults. Paths inside the file are rebased onto the
/// file's directory. The result is not validated; call
/// [`IndexConfig::validate`] once command-line overrides are applied.
pub fn load_config(path: Option<&Path>) -> Result<IndexConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let Some(path) = path else {
        return Ok(base.try_into()?);
    };

    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    let config: IndexConfig = merge_toml(base, overlay).try_into()?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.rebase(dir))
}

/// Returns a fully commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# autoindex configuration
# =======================
# All settings are optional. Values shown commented out are the defaults.
# Relative paths are resolved against the directory holding this file.
# Unknown keys cause an error.

# Page template. Placeholders:
#   {{ root }}   directory path shown as a URL path ("/", "/docs", ...)
#   {{ items }}  rendered listing rows, directories first
#   {{ icons }}  CSS rules for the icons this page uses
#   {{ style }}  <link> to the shared stylesheet, or an inline <style> block
# template = "page.html"

# Stylesheet template. Placeholder: {{ icons }}
# style = "style.css"

# Directory of icons named after type tags (dir.svg, file.svg, image.png, ...).
# Only .svg and .png files are loaded.
# icons_dir = "icons"

# JSON object mapping a category to its file extensions:
#   { "image": ["png", "jpg"], "text": ["txt", "md"] }
# ext_map = "ext_map.json"

# "linked": pages reference one shared index-style.css at the tree root.
# "inline": every page embeds its own stylesheet.
style_mode = "linked"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_uses_bundled_resources() {
        let config = IndexConfig::default();
        assert_eq!(config.template, None);
        assert_eq!(config.icons_dir, None);
        assert_eq!(config.style_mode, StyleMode::Linked);
    }

    #[test]
    fn load_config_without_file_is_default() {
        assert_eq!(load_config(None).unwrap(), IndexConfig::default());
    }

    #[test]
    fn load_config_reads_file_and_rebases_paths() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("autoindex.toml");
        fs::write(
            &path,
            r#"
template = "theme/page.html"
icons_dir = "/usr/share/autoindex/icons"
style_mode = "inline"
"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.template, Some(tmp.path().join("theme/page.html")));
        assert_eq!(
            config.icons_dir,
            Some(PathBuf::from("/usr/share/autoindex/icons"))
        );
        assert_eq!(config.style, None);
        assert_eq!(config.style_mode, StyleMode::Inline);
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("autoindex.toml");
        fs::write(&path, "templates = \"x.html\"\n").unwrap();
        assert!(matches!(
            load_config(Some(path.as_path())),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_style_mode_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("autoindex.toml");
        fs::write(&path, "style_mode = \"external\"\n").unwrap();
        assert!(matches!(
            load_config(Some(path.as_path())),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("autoindex.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(
            load_config(Some(path.as_path())),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_config(Some(tmp.path().join("absent.toml").as_path())),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn overrides_replace_only_what_they_set() {
        let config = IndexConfig {
            template: Some(PathBuf::from("a.html")),
            style: Some(PathBuf::from("a.css")),
            ..IndexConfig::default()
        };
        let merged = config.with_overrides(Overrides {
            style: Some(PathBuf::from("b.css")),
            style_mode: Some(StyleMode::Inline),
            ..Overrides::default()
        });
        assert_eq!(merged.template, Some(PathBuf::from("a.html")));
        assert_eq!(merged.style, Some(PathBuf::from("b.css")));
        assert_eq!(merged.style_mode, StyleMode::Inline);
    }

    #[test]
    fn validate_rejects_missing_paths() {
        let tmp = TempDir::new().unwrap();
        let config = IndexConfig {
            icons_dir: Some(tmp.path().join("icons")),
            ..IndexConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));

        let config = IndexConfig {
            template: Some(tmp.path().to_path_buf()),
            ..IndexConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(IndexConfig::default().validate().is_ok());
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("style_mode = \"linked\"\n").unwrap();
        let overlay: toml::Value = toml::from_str("template = \"p.html\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        let table = merged.as_table().unwrap();
        assert_eq!(table["style_mode"].as_str(), Some("linked"));
        assert_eq!(table["template"].as_str(), Some("p.html"));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("style_mode = \"linked\"\n").unwrap();
        let overlay: toml::Value = toml::from_str("style_mode = \"inline\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["style_mode"].as_str(), Some("inline"));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: IndexConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, IndexConfig::default());
    }
}
