//! The resource bundle: everything a run reads besides the tree itself.
//!
//! A [`ResourceBundle`] holds the page template, the stylesheet template, the
//! icon cache and the extension → category map. It is built once, before the
//! walk starts, and passed by reference to every stage. Nothing mutates it
//! afterwards.
//!
//! Each resource is either bundled into the binary (the default) or loaded
//! from a user path named in [`IndexConfig`]. Any failure here is fatal and
//! happens before a single page is written.

use crate::classify::CategoryMap;
use crate::config::IndexConfig;
use crate::icons::{self, IconAsset, IconSet};
use crate::template::{Template, TemplateError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid category map {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid template {path}: {source}")]
    Template {
        path: String,
        #[source]
        source: TemplateError,
    },
}

/// Variables a page template may reference.
pub const PAGE_VARIABLES: &[&str] = &["root", "items", "icons", "style"];

/// Variables a stylesheet template may reference.
pub const STYLE_VARIABLES: &[&str] = &["icons"];

const BUNDLED_PAGE_TEMPLATE: &str = include_str!("../static/template.html");
const BUNDLED_STYLE_TEMPLATE: &str = include_str!("../static/style.css");
const BUNDLED_EXT_MAP: &str = include_str!("../static/ext_map.json");

const BUNDLED_ICONS: &[(&str, &[u8])] = &[
    ("archive", include_bytes!("../static/icons/archive.svg")),
    ("audio", include_bytes!("../static/icons/audio.svg")),
    ("code", include_bytes!("../static/icons/code.svg")),
    ("dir", include_bytes!("../static/icons/dir.svg")),
    ("document", include_bytes!("../static/icons/document.svg")),
    ("file", include_bytes!("../static/icons/file.svg")),
    ("image", include_bytes!("../static/icons/image.svg")),
    ("pdf", include_bytes!("../static/icons/pdf.svg")),
    ("text", include_bytes!("../static/icons/text.svg")),
    ("video", include_bytes!("../static/icons/video.svg")),
];

/// Label used in errors for resources compiled into the binary.
const BUNDLED: &str = "<bundled>";

#[derive(Debug, Clone)]
pub struct ResourceBundle {
    pub page_template: Template,
    pub style_template: Template,
    pub icons: IconSet,
    pub categories: CategoryMap,
}

impl ResourceBundle {
    /// Load every resource named in `config`, falling back to bundled ones.
    pub fn load(config: &IndexConfig) -> Result<Self, ResourceError> {
        let page_template = match &config.template {
            Some(path) => parse_template(&read_text(path)?, PAGE_VARIABLES, &display(path))?,
            None => parse_template(BUNDLED_PAGE_TEMPLATE, PAGE_VARIABLES, BUNDLED)?,
        };

        // Stylesheets are trimmed so the inline `<style>` block and the shared
        // file carry no leading or trailing blank lines.
        let style_template = match &config.style {
            Some(path) => {
                parse_template(read_text(path)?.trim(), STYLE_VARIABLES, &display(path))?
            }
            None => parse_template(BUNDLED_STYLE_TEMPLATE.trim(), STYLE_VARIABLES, BUNDLED)?,
        };

        let icons = match &config.icons_dir {
            Some(dir) => load_icons_dir(dir)?,
            None => bundled_icons(),
        };

        let categories = match &config.ext_map {
            Some(path) => parse_categories(&read_text(path)?, &display(path))?,
            None => parse_categories(BUNDLED_EXT_MAP, BUNDLED)?,
        };

        debug!(
            icons = icons.len(),
            extensions = categories.len(),
            "resources loaded"
        );

        Ok(Self {
            page_template,
            style_template,
            icons,
            categories,
        })
    }

    /// The bundle compiled into the binary.
    pub fn bundled() -> Result<Self, ResourceError> {
        Self::load(&IndexConfig::default())
    }
}

/// Icons compiled into the binary.
pub fn bundled_icons() -> IconSet {
    BUNDLED_ICONS
        .iter()
        .map(|(tag, bytes)| IconAsset::new(*tag, "image/svg+xml", bytes))
        .collect()
}

/// Load every `.svg`/`.png` file in `dir` as an icon named after its stem.
///
/// Subdirectories and files with other extensions are skipped.
pub fn load_icons_dir(dir: &Path) -> Result<IconSet, ResourceError> {
    let io_err = |source| ResourceError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut set = IconSet::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            continue;
        }
        let Some(mime) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(icons::mime_for_extension)
        else {
            continue;
        };
        let Some(tag) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };
        let bytes = fs::read(&path).map_err(|source| ResourceError::Io {
            path: path.clone(),
            source,
        })?;
        set.insert(IconAsset::new(tag, mime, &bytes));
    }
    Ok(set)
}

fn read_text(path: &Path) -> Result<String, ResourceError> {
    fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_template(source: &str, variables: &[&str], label: &str) -> Result<Template, ResourceError> {
    Template::parse(source, variables).map_err(|source| ResourceError::Template {
        path: label.to_string(),
        source,
    })
}

fn parse_categories(json: &str, label: &str) -> Result<CategoryMap, ResourceError> {
    CategoryMap::from_json(json).map_err(|source| ResourceError::Json {
        path: label.to_string(),
        source,
    })
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bundled_resources_load() {
        let bundle = ResourceBundle::bundled().unwrap();
        assert!(bundle.page_template.uses("items"));
        assert!(bundle.page_template.uses("root"));
        assert!(bundle.page_template.uses("style"));
        assert!(bundle.style_template.uses("icons"));
        assert_eq!(bundle.categories.category("png"), Some("image"));
        assert_eq!(bundle.categories.category("md"), Some("text"));
    }

    #[test]
    fn bundled_icons_cover_dir_and_file() {
        let icons = bundled_icons();
        assert!(icons.get("dir").is_some());
        assert!(icons.get("file").is_some());
        assert_eq!(icons.get("dir").unwrap().mime_type, "image/svg+xml");
    }

    #[test]
    fn every_bundled_category_has_an_icon() {
        let bundle = ResourceBundle::bundled().unwrap();
        let raw: std::collections::BTreeMap<String, Vec<String>> =
            serde_json::from_str(BUNDLED_EXT_MAP).unwrap();
        for category in raw.keys() {
            assert!(
                bundle.icons.get(category).is_some(),
                "no bundled icon for category {category}"
            );
        }
    }

    #[test]
    fn icons_dir_loads_svg_and_png_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("dir.svg"), "<svg/>").unwrap();
        fs::write(tmp.path().join("image.png"), [0x89, 0x50]).unwrap();
        fs::write(tmp.path().join("notes.txt"), "not an icon").unwrap();
        fs::write(tmp.path().join("README"), "no extension").unwrap();
        fs::create_dir(tmp.path().join("nested.svg")).unwrap();

        let icons = load_icons_dir(tmp.path()).unwrap();
        let tags: Vec<&str> = icons.tags().collect();
        assert_eq!(tags, vec!["dir", "image"]);
        assert_eq!(icons.get("image").unwrap().mime_type, "image/png");
    }

    #[test]
    fn missing_icons_dir_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let result = load_icons_dir(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ResourceError::Io { .. })));
    }

    #[test]
    fn custom_template_and_style_are_used() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("page.html");
        let style = tmp.path().join("style.css");
        fs::write(&template, "<p>{{ root }}</p>{{ items }}").unwrap();
        fs::write(&style, "\n\n.x {}\n{{ icons }}\n\n").unwrap();

        let config = IndexConfig {
            template: Some(template),
            style: Some(style),
            ..IndexConfig::default()
        };
        let bundle = ResourceBundle::load(&config).unwrap();
        assert!(!bundle.page_template.uses("style"));
        let rendered = bundle
            .style_template
            .render(&[("icons", "/* icons */".to_string())].into_iter().collect());
        assert_eq!(rendered, ".x {}\n/* icons */");
    }

    #[test]
    fn template_with_unknown_variable_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("page.html");
        fs::write(&template, "{{ title }}").unwrap();

        let config = IndexConfig {
            template: Some(template),
            ..IndexConfig::default()
        };
        let result = ResourceBundle::load(&config);
        assert!(matches!(result, Err(ResourceError::Template { .. })));
    }

    #[test]
    fn missing_template_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = IndexConfig {
            template: Some(tmp.path().join("missing.html")),
            ..IndexConfig::default()
        };
        assert!(matches!(
            ResourceBundle::load(&config),
            Err(ResourceError::Io { .. })
        ));
    }

    #[test]
    fn custom_ext_map_replaces_bundled() {
        let tmp = TempDir::new().unwrap();
        let map = tmp.path().join("ext.json");
        fs::write(&map, r#"{"notebook": ["ipynb"]}"#).unwrap();

        let config = IndexConfig {
            ext_map: Some(map),
            ..IndexConfig::default()
        };
        let bundle = ResourceBundle::load(&config).unwrap();
        assert_eq!(bundle.categories.category("ipynb"), Some("notebook"));
        assert_eq!(bundle.categories.category("png"), None);
    }

    #[test]
    fn malformed_ext_map_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let map = tmp.path().join("ext.json");
        fs::write(&map, "[1, 2, 3]").unwrap();

        let config = IndexConfig {
            ext_map: Some(map),
            ..IndexConfig::default()
        };
        assert!(matches!(
            ResourceBundle::load(&config),
            Err(ResourceError::Json { .. })
        ));
    }
}
