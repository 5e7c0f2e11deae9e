//! Recursive directory walk.
//!
//! The walk is depth-first and pre-order: a directory's page is written
//! before any of its subdirectories are visited. Each directory is handled in
//! two separate steps that never influence each other:
//!
//! 1. **Page decision**: render a page from the visible entries unless the
//!    directory holds a `.noindex` marker.
//! 2. **Recursion**: visit every subdirectory that is not excluded by name,
//!    whether or not it is world-readable and whether or not a page was
//!    written here.
//!
//! ```text
//! root/                   page: a.txt
//! ├── a.txt
//! ├── .git/               never listed, never visited
//! ├── secret/  (0o750)    not listed in root's page, but visited
//! │   └── b.txt           secret/index.html lists b.txt
//! └── docs/               .noindex: no docs/index.html
//!     ├── .noindex
//!     └── api/            docs/api/index.html is still written
//! ```
//!
//! Tags are recorded into the run's [`TagUniverse`] only for directories
//! that get a page.
//!
//! Entry names are kept as [`OsString`]s, so names that are not valid UTF-8
//! are listed and visited like any other.
//!
//! Symlinks are followed, and each directory is visited once, by its
//! canonical path. A link back to an ancestor, or a second link to a
//! directory already indexed, is listed but not visited again, so it can
//! never overwrite the real directory's page.

use crate::classify::{TagUniverse, classify};
use crate::config::StyleMode;
use crate::filter;
use crate::render::{self, Item, Page, RenderError};
use crate::resources::ResourceBundle;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported entry (neither file nor directory): {0}")]
    UnsupportedEntry(PathBuf),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Whether pages are written or only rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    #[default]
    Write,
    /// Render everything, write nothing.
    DryRun,
}

/// One directory's children, partitioned for the two walk steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirScan {
    /// Subdirectories to visit: every directory not excluded by name.
    pub subdirs: Vec<OsString>,
    /// Directories passing both visibility gates, sorted.
    pub visible_dirs: Vec<OsString>,
    /// Files passing both visibility gates, sorted.
    pub visible_files: Vec<OsString>,
    pub has_marker: bool,
}

impl DirScan {
    pub fn should_render(&self) -> bool {
        !self.has_marker
    }

    /// Listing rows, directories first.
    pub fn items(&self, bundle: &ResourceBundle) -> Vec<Item> {
        let item = |name: &OsString, is_dir: bool| {
            let tag = classify(&name.to_string_lossy(), is_dir, &bundle.categories);
            Item::new(name, tag, is_dir)
        };
        let dirs = self.visible_dirs.iter().map(|name| item(name, true));
        let files = self.visible_files.iter().map(|name| item(name, false));
        dirs.chain(files).collect()
    }
}

/// Read the immediate children of `dir` once and partition them.
///
/// Entry metadata follows symlinks. A readable, non-excluded entry that is
/// neither a regular file nor a directory aborts the scan.
pub fn scan_directory(dir: &Path) -> Result<DirScan, WalkError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| WalkError::Io { path, source }
    };

    let mut scan = DirScan::default();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let entry = entry.map_err(io_err(dir))?;
        let name = entry.file_name();
        let display = name.to_string_lossy().into_owned();

        if filter::is_marker(&display) {
            scan.has_marker = true;
        }
        if filter::is_excluded(&display) {
            continue;
        }

        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(io_err(&path))?;
        if metadata.is_dir() {
            scan.subdirs.push(name.clone());
        }
        if !filter::is_world_readable(&metadata) {
            continue;
        }
        if metadata.is_dir() {
            scan.visible_dirs.push(name);
        } else if metadata.is_file() {
            scan.visible_files.push(name);
        } else {
            return Err(WalkError::UnsupportedEntry(path));
        }
    }

    scan.subdirs.sort();
    scan.visible_dirs.sort();
    scan.visible_files.sort();
    Ok(scan)
}

/// What a walk produced.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Directories that got a page, relative to the tree root, in visit order.
    pub pages: Vec<PathBuf>,
    /// Directories skipped because of a `.noindex` marker.
    pub suppressed: Vec<PathBuf>,
    pub tags: TagUniverse,
}

/// Walk settings shared by every directory of one run.
#[derive(Debug, Clone, Copy)]
pub struct Walker<'a> {
    pub root: &'a Path,
    pub bundle: &'a ResourceBundle,
    pub style_mode: StyleMode,
    pub write_mode: WriteMode,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Path, bundle: &'a ResourceBundle, style_mode: StyleMode) -> Self {
        Self {
            root,
            bundle,
            style_mode,
            write_mode: WriteMode::Write,
        }
    }

    pub fn dry_run(mut self) -> Self {
        self.write_mode = WriteMode::DryRun;
        self
    }

    /// Walk the whole tree from the root.
    pub fn walk(&self) -> Result<WalkOutcome, WalkError> {
        let mut outcome = WalkOutcome::default();
        let mut seen = HashSet::new();
        self.visit(self.root, 0, &mut outcome, &mut seen)?;
        Ok(outcome)
    }

    fn visit(
        &self,
        dir: &Path,
        depth: usize,
        outcome: &mut WalkOutcome,
        seen: &mut HashSet<PathBuf>,
    ) -> Result<(), WalkError> {
        let canonical = fs::canonicalize(dir).map_err(|source| WalkError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        if !seen.insert(canonical) {
            warn!(dir = %dir.display(), "already indexed through another path; not visiting");
            return Ok(());
        }

        let scan = scan_directory(dir)?;
        let rel = dir.strip_prefix(self.root).unwrap_or(dir).to_path_buf();

        if scan.should_render() {
            self.render(dir, depth, &scan, outcome)?;
            outcome.pages.push(rel);
        } else {
            debug!(dir = %dir.display(), "skipping page: .noindex present");
            outcome.suppressed.push(rel);
        }

        for name in &scan.subdirs {
            self.visit(&dir.join(name), depth + 1, outcome, seen)?;
        }
        Ok(())
    }

    fn render(
        &self,
        dir: &Path,
        depth: usize,
        scan: &DirScan,
        outcome: &mut WalkOutcome,
    ) -> Result<(), WalkError> {
        let items = scan.items(self.bundle);
        for item in &items {
            if outcome.tags.record(&item.tag) && self.bundle.icons.get(&item.tag).is_none() {
                warn!(tag = %item.tag, "no icon for type tag; using the generic icon box");
            }
        }

        let page = Page {
            root: render::display_root(self.root, dir),
            items: &items,
            depth,
            style_mode: self.style_mode,
        };
        let html = render::render_page(&page, self.bundle);

        match self.write_mode {
            WriteMode::Write => {
                let path = render::write_page(dir, &html)?;
                debug!(page = %path.display(), items = items.len(), "page written");
            }
            WriteMode::DryRun => {
                debug!(dir = %dir.display(), items = items.len(), "page rendered (dry run)");
            }
        }
        Ok(())
    }
}
