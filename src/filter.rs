//! Visibility rules for directory listings.
//!
//! An entry is listed only when it passes two gates:
//!
//! 1. **Exclusion**: its name is not in [`IGNORE_NAMES`] and its extension is
//!    not in [`IGNORE_EXTENSIONS`]. Directories and files share this gate, and
//!    excluded directories are not descended into either.
//! 2. **Readability**: its permission bits grant read access to "other"
//!    (`o+r`). A directory failing this gate is still descended into; it is
//!    only left out of its parent's listing.
//!
//! Separately, a directory holding a [`NOINDEX_MARKER`] entry gets no page of
//! its own. The marker is looked up by exact name before either gate runs, so
//! the marker's own permissions do not matter.

use std::fs::Metadata;
use std::path::Path;

/// File name of the generated listing page.
pub const PAGE_FILE_NAME: &str = "index.html";

/// File name of the shared stylesheet written at the tree root in linked mode.
pub const STYLE_FILE_NAME: &str = "index-style.css";

/// Presence of this entry suppresses the page for its directory.
pub const NOINDEX_MARKER: &str = ".noindex";

/// Exact names that never appear in a listing.
pub const IGNORE_NAMES: &[&str] = &[
    ".git",
    ".gitignore",
    "__pycache__",
    PAGE_FILE_NAME,
    "Thumbs.db",
    "Desktop.ini",
    ".DS_Store",
    STYLE_FILE_NAME,
    NOINDEX_MARKER,
];

/// Extensions (with dot, case-sensitive) that never appear in a listing.
pub const IGNORE_EXTENSIONS: &[&str] = &[".pyc", ".swp", ".swo"];

/// The exclusion gate: `true` when the name or extension is ignored.
pub fn is_excluded(name: &str) -> bool {
    if IGNORE_NAMES.contains(&name) {
        return true;
    }
    match Path::new(name).extension() {
        Some(ext) => {
            let dotted = format!(".{}", ext.to_string_lossy());
            IGNORE_EXTENSIONS.contains(&dotted.as_str())
        }
        None => false,
    }
}

pub fn is_marker(name: &str) -> bool {
    name == NOINDEX_MARKER
}

/// The readability gate: `true` when "other" has read permission.
#[cfg(unix)]
pub fn is_world_readable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o004 != 0
}

/// Platforms without POSIX permission bits treat everything as readable.
#[cfg(not(unix))]
pub fn is_world_readable(_metadata: &Metadata) -> bool {
    true
}
