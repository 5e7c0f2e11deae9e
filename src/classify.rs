//! Entry classification.
//!
//! Every listed entry gets exactly one type tag. Directories are always
//! [`DIR_TAG`]; files are looked up by lower-cased extension in a
//! [`CategoryMap`] and fall back to [`FILE_TAG`] when the extension is missing
//! or unmapped.
//!
//! Tags drive two things downstream: the icon class of each listing row and
//! the subset of icon assets embedded in a stylesheet. The run-wide set of
//! tags is kept in a [`TagUniverse`] that the walker threads through every
//! rendered directory.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Tag for every directory.
pub const DIR_TAG: &str = "dir";

/// Tag for files without a mapped extension.
pub const FILE_TAG: &str = "file";

/// Extension → category lookup.
///
/// Stored on disk as `{ "<category>": ["ext", ...] }` and inverted on load.
/// Extensions are kept lower-case, without the leading dot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    by_ext: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct RawCategoryMap(BTreeMap<String, Vec<String>>);

impl CategoryMap {
    /// Parse the category JSON and invert it into an extension lookup.
    ///
    /// When an extension is listed under several categories the last category
    /// in key order wins.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawCategoryMap = serde_json::from_str(json)?;
        Ok(raw.0.into_iter().collect())
    }

    pub fn category(&self, ext: &str) -> Option<&str> {
        self.by_ext.get(ext).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_ext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_ext.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut by_ext = BTreeMap::new();
        for (category, exts) in iter {
            for ext in exts {
                let ext = ext.trim_start_matches('.').to_lowercase();
                by_ext.insert(ext, category.clone());
            }
        }
        Self { by_ext }
    }
}

/// Map an entry to its type tag.
pub fn classify(name: &str, is_dir: bool, categories: &CategoryMap) -> String {
    if is_dir {
        return DIR_TAG.to_string();
    }
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .and_then(|ext| categories.category(&ext).map(str::to_string))
        .unwrap_or_else(|| FILE_TAG.to_string())
}

/// All type tags seen on rendered pages during one run.
///
/// Grows monotonically. Only the walker records into it, and only for
/// directories that actually get a page, so a tag is present iff some
/// written page lists an item with that tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUniverse {
    tags: BTreeSet<String>,
}

impl TagUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; returns `true` the first time a tag is seen.
    pub fn record(&mut self, tag: &str) -> bool {
        if self.tags.contains(tag) {
            return false;
        }
        self.tags.insert(tag.to_string())
    }

    pub fn extend<'a>(&mut self, tags: impl IntoIterator<Item = &'a str>) {
        for tag in tags {
            self.record(tag);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> CategoryMap {
        CategoryMap::from_json(r#"{"image": ["png", "JPG"], "text": ["txt", "md"]}"#).unwrap()
    }

    #[test]
    fn directories_are_always_dir() {
        let map = categories();
        assert_eq!(classify("photos.png", true, &map), "dir");
        assert_eq!(classify("plain", true, &map), "dir");
    }

    #[test]
    fn files_classified_by_extension() {
        let map = categories();
        assert_eq!(classify("a.png", false, &map), "image");
        assert_eq!(classify("notes.md", false, &map), "text");
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        let map = categories();
        assert_eq!(classify("HOLIDAY.PNG", false, &map), "image");
        assert_eq!(classify("scan.jpg", false, &map), "image");
    }

    #[test]
    fn only_last_extension_counts() {
        let map = categories();
        assert_eq!(classify("archive.txt.gz", false, &map), "file");
        assert_eq!(classify("archive.gz.txt", false, &map), "text");
    }

    #[test]
    fn unmapped_and_missing_extensions_fall_back_to_file() {
        let map = categories();
        assert_eq!(classify("Makefile", false, &map), "file");
        assert_eq!(classify("data.bin", false, &map), "file");
        assert_eq!(classify(".bashrc", false, &map), "file");
        assert_eq!(classify("trailing.", false, &map), "file");
    }

    #[test]
    fn category_map_strips_leading_dots() {
        let map = CategoryMap::from_json(r#"{"code": [".rs"]}"#).unwrap();
        assert_eq!(map.category("rs"), Some("code"));
    }

    #[test]
    fn category_map_rejects_malformed_json() {
        assert!(CategoryMap::from_json(r#"{"image": "png"}"#).is_err());
    }

    #[test]
    fn tag_universe_grows_without_duplicates() {
        let mut universe = TagUniverse::new();
        assert!(universe.record("dir"));
        assert!(!universe.record("dir"));
        universe.extend(["file", "dir", "image"]);
        assert_eq!(universe.len(), 3);
        let tags: Vec<&str> = universe.tags().iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["dir", "file", "image"]);
    }
}
