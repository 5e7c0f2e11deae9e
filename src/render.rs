//! Page and stylesheet rendering.
//!
//! A page is the page template filled with four values:
//!
//! | Variable | Content |
//! |----------|---------|
//! | `root` | the directory as an absolute URL path (`/`, `/docs/api`), HTML-escaped |
//! | `items` | one table row per listed entry, built with maud |
//! | `icons` | CSS rules for the icons this page's tags resolve to |
//! | `style` | a `<link>` to the shared stylesheet, or an inline `<style>` block |
//!
//! Rendered pages go through [`minify`] before they are written; the shared
//! stylesheet is written as rendered.

use crate::config::StyleMode;
use crate::filter::{PAGE_FILE_NAME, STYLE_FILE_NAME};
use crate::icons::ResolvedIcons;
use crate::resources::ResourceBundle;
use maud::{Markup, PreEscaped, html};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Display name; lossy where the entry name is not valid UTF-8.
    pub name: String,
    /// The entry name as it is on disk.
    pub file_name: OsString,
    pub tag: String,
    pub is_dir: bool,
    /// Overrides the link target. Always `None` for now.
    pub link_target: Option<String>,
}

impl Item {
    pub fn new(file_name: impl AsRef<OsStr>, tag: impl Into<String>, is_dir: bool) -> Self {
        let file_name = file_name.as_ref().to_os_string();
        Self {
            name: file_name.to_string_lossy().to_string(),
            file_name,
            tag: tag.into(),
            is_dir,
            link_target: None,
        }
    }

    /// Relative link for this row; directories get a trailing slash.
    pub fn href(&self) -> String {
        if let Some(target) = &self.link_target {
            return target.clone();
        }
        let mut href = encode_href(&self.file_name);
        if self.is_dir {
            href.push('/');
        }
        href
    }
}

/// Everything the renderer needs to know about one directory.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    /// Display path, see [`display_root`].
    pub root: String,
    /// Directories first, then files, each group sorted by name.
    pub items: &'a [Item],
    /// Distance from the tree root; the root itself is 0.
    pub depth: usize,
    pub style_mode: StyleMode,
}

/// Render a page to its final, minified text.
pub fn render_page(page: &Page<'_>, bundle: &ResourceBundle) -> String {
    let icons = bundle.icons.resolve(page.items.iter().map(|i| i.tag.as_str()));
    let style = match page.style_mode {
        StyleMode::Linked => linked_style(page.depth),
        StyleMode::Inline => inline_style(&render_stylesheet(&icons, bundle)),
    };

    let values: BTreeMap<&str, String> = [
        ("root", html! { (page.root) }.into_string()),
        ("items", render_items(page.items).into_string()),
        ("icons", icons.css_rules()),
        ("style", style.into_string()),
    ]
    .into_iter()
    .collect();

    minify(&bundle.page_template.render(&values))
}

/// Render the stylesheet template for a set of icons.
pub fn render_stylesheet(icons: &ResolvedIcons<'_>, bundle: &ResourceBundle) -> String {
    let values: BTreeMap<&str, String> = [("icons", icons.css_rules())].into_iter().collect();
    bundle.style_template.render(&values)
}

/// Listing rows.
pub fn render_items(items: &[Item]) -> Markup {
    html! {
        @for item in items {
            tr.item data-type=(item.tag) {
                td {
                    a href=(item.href()) {
                        span class={ "icon icon-" (item.tag) } {}
                        (item.name)
                    }
                }
            }
        }
    }
}

/// `<link>` to the shared stylesheet, climbing `depth` levels to the root.
pub fn linked_style(depth: usize) -> Markup {
    let href = format!("{}{}", "../".repeat(depth), STYLE_FILE_NAME);
    html! {
        link rel="stylesheet" href=(href);
    }
}

pub fn inline_style(css: &str) -> Markup {
    html! {
        style { "\n" (PreEscaped(css)) "\n" }
    }
}

/// The path of `dir` below `tree_root` as an absolute URL path.
///
/// The tree root itself is `/`.
pub fn display_root(tree_root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(tree_root).unwrap_or(dir);
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}

/// Strip every line, drop the blank ones, end with a single newline.
pub fn minify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        out.push_str(line);
        out.push('\n');
    }
    if out.is_empty() {
        out.push('\n');
    }
    out
}

/// Write `contents` to `<dir>/index.html`, replacing any previous page.
pub fn write_page(dir: &Path, contents: &str) -> Result<PathBuf, RenderError> {
    write_file(&dir.join(PAGE_FILE_NAME), contents)
}

pub fn write_file(path: &Path, contents: &str) -> Result<PathBuf, RenderError> {
    fs::write(path, contents).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

/// Percent-encode the characters that would otherwise end a relative URL
/// path early, and any bytes that are not valid UTF-8.
fn encode_href(name: &OsStr) -> String {
    let mut out = String::new();
    for chunk in name_bytes(name).utf8_chunks() {
        for c in chunk.valid().chars() {
            match c {
                '%' => out.push_str("%25"),
                '#' => out.push_str("%23"),
                '?' => out.push_str("%3F"),
                _ => out.push(c),
            }
        }
        for byte in chunk.invalid() {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(unix)]
fn name_bytes(name: &OsStr) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(name.as_bytes())
}

#[cfg(not(unix))]
fn name_bytes(name: &OsStr) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(name.to_string_lossy().into_owned().into_bytes())
}
