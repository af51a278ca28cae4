//! Shared test utilities for the simple-picture test suite.
//!
//! Provides a throwaway site directory with placeholder source images, plus
//! small extractors for poking at generated `<picture>` markup.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteFixture::new(&["posts/dawn.jpg"]);
//! let html = compose_static(&backend, &config, &request, &site.document("posts/x.md"))?;
//!
//! assert_eq!(count_tags(html.as_str(), "<source "), 3);
//! assert!(img_line(html.as_str()).contains("dawn-800"));
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// A temp directory standing in for a site's content root.
///
/// Source files only need to exist; the mock backend never reads them.
pub struct SiteFixture {
    tmp: TempDir,
}

impl SiteFixture {
    /// Create the site with an empty placeholder for every relative path.
    pub fn new(files: &[&str]) -> Self {
        let tmp = TempDir::new().unwrap();
        for file in files {
            let path = tmp.path().join(file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, b"").unwrap();
        }
        Self { tmp }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Absolute path of a file inside the site.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.tmp.path().join(rel)
    }

    /// Path of a referencing document. The document itself is never created.
    pub fn document(&self, rel: &str) -> PathBuf {
        self.path(rel)
    }
}

// =========================================================================
// Markup extractors
// =========================================================================

/// Number of occurrences of `tag_prefix`, e.g. `"<source "`.
pub fn count_tags(html: &str, tag_prefix: &str) -> usize {
    html.matches(tag_prefix).count()
}

/// The `<img ...>` line. Panics if there isn't exactly one.
pub fn img_line(html: &str) -> &str {
    let lines: Vec<&str> = html.lines().filter(|l| l.starts_with("<img ")).collect();
    match lines.as_slice() {
        [line] => line,
        other => panic!("expected one <img> line, found {}:\n{html}", other.len()),
    }
}

/// Assert every dark `<source>` precedes every light one.
pub fn assert_dark_before_light(html: &str) {
    let sources: Vec<&str> = html.lines().filter(|l| l.starts_with("<source ")).collect();
    let last_dark = sources.iter().rposition(|l| l.contains("media="));
    let first_light = sources.iter().position(|l| !l.contains("media="));
    if let (Some(dark), Some(light)) = (last_dark, first_light) {
        assert!(
            dark < light,
            "dark sources must precede light sources:\n{html}"
        );
    }
}
