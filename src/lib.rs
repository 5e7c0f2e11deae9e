//! # autoindex
//!
//! Writes a static `index.html` listing into every directory of a tree, so
//! the tree can be browsed like a website from any static file server, or
//! straight from disk, without a live directory-listing server.
//!
//! # Pipeline
//!
//! ```text
//! 1. Load       config + templates + icons + ext map  →  ResourceBundle
//! 2. Walk       tree, depth-first                     →  index.html per directory
//! 3. Finalize   run-wide tag set                      →  index-style.css (linked mode)
//! ```
//!
//! Every run is a full re-walk and rewrite. Nothing generated by an earlier
//! run is read back: the generated file names are on the ignore list.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`classify`] | Type tag for each entry, run-wide [`classify::TagUniverse`] |
//! | [`filter`] | Ignore lists, world-readable gate, `.noindex` marker |
//! | [`icons`] | Icon cache and per-page icon subsets |
//! | [`template`] | `{{ name }}` text templates for user-supplied pages and styles |
//! | [`resources`] | The immutable [`resources::ResourceBundle`] for one run |
//! | [`render`] | Page and stylesheet rendering, minification, writing |
//! | [`walk`] | The recursive walk |
//! | [`finalize`] | The shared stylesheet |
//! | [`config`] | TOML config file and command-line overrides |
//! | [`output`] | CLI summary formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Pages and Recursion Are Independent
//!
//! A `.noindex` marker or an unreadable directory changes what is *listed*,
//! never what is *visited*. The walker decides "render here?" and "visit
//! which children?" from the same scan but in separate steps, so a private
//! directory can still contain public, indexed subdirectories.
//!
//! ## Icons Embedded as Data URIs
//!
//! Icons are base64 `data:` URIs inside CSS, so a generated tree carries no
//! icon files. Each page (inline mode) or the shared stylesheet (linked mode)
//! embeds only the icons for tags that actually appear.
//!
//! ## Strict on Odd Entries
//!
//! A world-readable entry that is neither a file nor a directory (a FIFO, a
//! socket, a device) aborts the run. Pages already written stay in place.

pub mod classify;
pub mod config;
pub mod filter;
pub mod finalize;
pub mod icons;
pub mod logging;
pub mod output;
pub mod render;
pub mod resources;
pub mod template;
pub mod walk;

use crate::classify::TagUniverse;
use crate::config::{ConfigError, IndexConfig};
use crate::render::RenderError;
use crate::resources::{ResourceBundle, ResourceError};
use crate::walk::{WalkError, Walker, WriteMode};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Result of one run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Directories that got a page, relative to the tree root.
    pub pages: Vec<PathBuf>,
    /// Directories without a page because of `.noindex`.
    pub suppressed: Vec<PathBuf>,
    /// Every type tag on a written page.
    pub tags: TagUniverse,
    /// The shared stylesheet, in linked mode.
    pub stylesheet: Option<PathBuf>,
    pub write_mode: WriteMode,
}

/// Load resources for `config`, walk `root`, then write the shared
/// stylesheet.
pub fn generate(
    root: &Path,
    config: &IndexConfig,
    write_mode: WriteMode,
) -> Result<RunSummary, IndexError> {
    if !root.is_dir() {
        return Err(IndexError::NotADirectory(root.to_path_buf()));
    }
    config.validate()?;
    let bundle = ResourceBundle::load(config)?;
    generate_with(root, &bundle, config, write_mode)
}

/// Like [`generate`], with an already loaded bundle.
pub fn generate_with(
    root: &Path,
    bundle: &ResourceBundle,
    config: &IndexConfig,
    write_mode: WriteMode,
) -> Result<RunSummary, IndexError> {
    let mut walker = Walker::new(root, bundle, config.style_mode);
    walker.write_mode = write_mode;
    let outcome = walker.walk()?;

    let stylesheet = finalize::finalize(
        root,
        &outcome.tags,
        bundle,
        config.style_mode,
        write_mode,
    )?;

    info!(
        pages = outcome.pages.len(),
        suppressed = outcome.suppressed.len(),
        tags = outcome.tags.len(),
        "run complete"
    );

    Ok(RunSummary {
        pages: outcome.pages,
        suppressed: outcome.suppressed,
        tags: outcome.tags,
        stylesheet,
        write_mode,
    })
}
