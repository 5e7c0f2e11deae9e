//! Icon assets and icon-set resolution.
//!
//! Icons are loaded once per run into an [`IconSet`], keyed by type tag (the
//! icon file's stem). Pages and the shared stylesheet only embed the icons for
//! the tags they actually use: [`IconSet::resolve`] narrows the cache to a tag
//! set, silently dropping tags that have no asset.
//!
//! Each asset is embedded as a base64 `data:` URI, so generated listings need
//! no icon files next to them.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::{BTreeMap, BTreeSet};

/// Supported icon file extensions and their MIME types.
pub const ICON_MIME_TYPES: &[(&str, &str)] = &[("svg", "image/svg+xml"), ("png", "image/png")];

/// MIME type for an icon file extension, if supported.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    ICON_MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// One icon, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    pub tag: String,
    pub mime_type: String,
    pub encoded: String,
}

impl IconAsset {
    pub fn new(tag: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            tag: tag.into(),
            mime_type: mime_type.into(),
            encoded: STANDARD.encode(bytes),
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.encoded)
    }
}

/// The run-wide icon cache.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    assets: BTreeMap<String, IconAsset>,
}

impl IconSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset; a later asset with the same tag replaces the earlier one.
    pub fn insert(&mut self, asset: IconAsset) {
        self.assets.insert(asset.tag.clone(), asset);
    }

    pub fn get(&self, tag: &str) -> Option<&IconAsset> {
        self.assets.get(tag)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    /// The subset of assets whose tag is in `tags`, ordered by tag.
    pub fn resolve<'a, I, S>(&'a self, tags: I) -> ResolvedIcons<'a>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: BTreeSet<String> = tags.into_iter().map(|t| t.as_ref().to_string()).collect();
        let assets = self
            .assets
            .iter()
            .filter(|(tag, _)| wanted.contains(tag.as_str()))
            .map(|(_, asset)| asset)
            .collect();
        ResolvedIcons { assets }
    }
}

impl FromIterator<IconAsset> for IconSet {
    fn from_iter<I: IntoIterator<Item = IconAsset>>(iter: I) -> Self {
        let mut set = IconSet::new();
        for asset in iter {
            set.insert(asset);
        }
        set
    }
}

/// Icons selected for one page or for the shared stylesheet.
#[derive(Debug, Clone, Default)]
pub struct ResolvedIcons<'a> {
    assets: Vec<&'a IconAsset>,
}

impl<'a> ResolvedIcons<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a IconAsset> + '_ {
        self.assets.iter().copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.assets.iter().any(|a| a.tag == tag)
    }

    pub fn tags(&self) -> Vec<&'a str> {
        self.assets.iter().map(|a| a.tag.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// One CSS rule per icon, binding `.icon-<tag>` to its data URI.
    ///
    /// Tags without a rule keep the plain `.icon` placeholder box.
    pub fn css_rules(&self) -> String {
        self.assets
            .iter()
            .map(|a| {
                format!(
                    ".icon-{} {{ background-color: transparent; background-image: url(\"{}\"); }}",
                    a.tag,
                    a.data_uri()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon_set() -> IconSet {
        [
            IconAsset::new("dir", "image/svg+xml", b"<svg/>"),
            IconAsset::new("file", "image/svg+xml", b"<svg></svg>"),
            IconAsset::new("image", "image/png", &[0x89, 0x50, 0x4e, 0x47]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn data_uri_is_base64_encoded() {
        let asset = IconAsset::new("dir", "image/svg+xml", b"<svg/>");
        assert_eq!(asset.data_uri(), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn resolve_keeps_only_requested_tags() {
        let icons = icon_set();
        let resolved = icons.resolve(["image", "dir"]);
        assert_eq!(resolved.tags(), vec!["dir", "image"]);
    }

    #[test]
    fn resolve_drops_tags_without_assets() {
        let icons = icon_set();
        let resolved = icons.resolve(["video", "file"]);
        assert_eq!(resolved.tags(), vec!["file"]);
        assert!(!resolved.contains("video"));
    }

    #[test]
    fn resolve_empty_tag_set_is_empty() {
        let icons = icon_set();
        assert!(icons.resolve(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn css_rules_one_per_icon_in_tag_order() {
        let icons = icon_set();
        let css = icons.resolve(["file", "dir"]).css_rules();
        let lines: Vec<&str> = css.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(".icon-dir { background-color: transparent; "));
        assert!(lines[0].contains("url(\"data:image/svg+xml;base64,"));
        assert!(lines[1].starts_with(".icon-file "));
    }

    #[test]
    fn mime_types_for_supported_extensions() {
        assert_eq!(mime_for_extension("svg"), Some("image/svg+xml"));
        assert_eq!(mime_for_extension("png"), Some("image/png"));
        assert_eq!(mime_for_extension("gif"), None);
    }
}
