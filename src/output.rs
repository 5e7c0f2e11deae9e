//! CLI output formatting.
//!
//! Every page is shown by the URL path it lists, indented by depth, with the
//! file it lands in as context:
//!
//! ```text
//! Pages
//! 001 / → index.html
//!     002 /docs → docs/index.html
//!         003 /docs/api → docs/api/index.html
//!
//! Suppressed (.noindex)
//!     /drafts
//!
//! Stylesheet
//!     index-style.css (dir, file, image)
//!
//! Generated 3 pages, 1 suppressed, 3 type tags
//! ```
//!
//! `format_*` functions are pure and return lines; `print_*` wrappers write
//! them to stdout.

use crate::RunSummary;
use crate::filter::PAGE_FILE_NAME;
use crate::walk::WriteMode;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// URL path of a directory relative to the tree root.
fn url_path(rel: &Path) -> String {
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    format!("/{}", parts.join("/"))
}

fn page_file(rel: &Path) -> String {
    rel.join(PAGE_FILE_NAME).to_string_lossy().to_string()
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Format the summary of a run.
pub fn format_summary(summary: &RunSummary, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Pages".to_string());
    for (i, rel) in summary.pages.iter().enumerate() {
        let depth = rel.components().count();
        lines.push(format!(
            "{}{} {} → {}",
            indent(depth),
            format_index(i + 1),
            url_path(rel),
            page_file(rel)
        ));
    }

    if !summary.suppressed.is_empty() {
        lines.push(String::new());
        lines.push("Suppressed (.noindex)".to_string());
        for rel in &summary.suppressed {
            lines.push(format!("    {}", url_path(rel)));
        }
    }

    if let Some(stylesheet) = &summary.stylesheet {
        let name = stylesheet
            .strip_prefix(root)
            .unwrap_or(stylesheet)
            .to_string_lossy()
            .to_string();
        let tags: Vec<&str> = summary.tags.tags().iter().map(String::as_str).collect();
        lines.push(String::new());
        lines.push("Stylesheet".to_string());
        lines.push(format!("    {} ({})", name, tags.join(", ")));
    }

    let verb = match summary.write_mode {
        WriteMode::Write => "Generated",
        WriteMode::DryRun => "Would generate",
    };
    lines.push(String::new());
    lines.push(format!(
        "{} {}, {} suppressed, {}",
        verb,
        plural(summary.pages.len(), "page", "pages"),
        summary.suppressed.len(),
        plural(summary.tags.len(), "type tag", "type tags"),
    ));

    lines
}

/// Print the run summary to stdout.
pub fn print_summary(summary: &RunSummary, root: &Path) {
    for line in format_summary(summary, root) {
        println!("{}", line);
    }
}
