//! Shared stylesheet, written once after the walk.
//!
//! In linked mode every page points at `index-style.css` in the tree root.
//! That file embeds the icons for every tag any written page used, and
//! nothing else. Inline mode has no shared file.

use crate::classify::TagUniverse;
use crate::config::StyleMode;
use crate::filter::STYLE_FILE_NAME;
use crate::render::{self, RenderError};
use crate::resources::ResourceBundle;
use crate::walk::WriteMode;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write the shared stylesheet for `tags` into `root`.
///
/// Returns the stylesheet path, or `None` in inline mode. In a dry run the
/// stylesheet is rendered and its would-be path returned, but nothing is
/// written.
pub fn finalize(
    root: &Path,
    tags: &TagUniverse,
    bundle: &ResourceBundle,
    style_mode: StyleMode,
    write_mode: WriteMode,
) -> Result<Option<PathBuf>, RenderError> {
    if style_mode != StyleMode::Linked {
        return Ok(None);
    }

    let icons = bundle.icons.resolve(tags.tags());
    let css = render::render_stylesheet(&icons, bundle);
    let path = root.join(STYLE_FILE_NAME);

    if write_mode == WriteMode::Write {
        render::write_file(&path, &css)?;
    }
    info!(
        path = %path.display(),
        icons = icons.len(),
        "shared stylesheet {}",
        if write_mode == WriteMode::Write { "written" } else { "rendered" }
    );
    Ok(Some(path))
}
