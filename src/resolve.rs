//! Source reference resolution.
//!
//! A shortcode's `src` is either a fully-qualified URL, passed to the backend
//! untouched, or a path relative to the document that references it:
//!
//! ```text
//! resolve("https://example.com/a.png", "/site/posts/x.md") → https://example.com/a.png
//! resolve("./a.png",                   "/site/posts/x.md") → /site/posts/a.png
//! resolve("../img/b.png",              "/site/posts/x.md") → /site/img/b.png
//! ```
//!
//! Nothing here touches the filesystem beyond reading the current directory
//! for relative documents. Whether the file exists is checked by the
//! composers.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// A resolved image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceReference {
    /// Absolute URL with a host, never rewritten.
    Remote(Url),
    /// Absolute, lexically normalized filesystem path.
    Local(PathBuf),
}

impl SourceReference {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub fn as_local(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path),
            Self::Remote(_) => None,
        }
    }

    /// File name without extension, e.g. `dawn` for `/site/posts/dawn.jpg`
    /// or `https://cdn.example.com/img/dawn.jpg?v=2`.
    pub fn file_stem(&self) -> String {
        let stem = match self {
            Self::Local(path) => path.file_stem().and_then(|s| s.to_str()),
            Self::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .and_then(|name| Path::new(name).file_stem())
                .and_then(|s| s.to_str()),
        };
        stem.filter(|s| !s.is_empty()).unwrap_or("image").to_string()
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url.as_str()),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Whether `src` is an absolute URL with scheme and host.
///
/// Windows drive paths such as `C:\photos\a.png` parse as URLs with a
/// one-letter scheme and no host, so the host requirement keeps them local.
pub fn is_full_url(src: &str) -> bool {
    Url::parse(src).is_ok_and(|url| url.has_host())
}

/// Resolve `src` against the document that references it.
///
/// The document's own file name is stripped before joining, so `src` is
/// relative to the directory containing `referencing_document`.
pub fn resolve(src: &str, referencing_document: &Path) -> io::Result<SourceReference> {
    if let Ok(url) = Url::parse(src)
        && url.has_host()
    {
        return Ok(SourceReference::Remote(url));
    }

    let base = referencing_document.parent().unwrap_or(Path::new(""));
    let joined = base.join(src);
    let absolute = if joined.is_absolute() {
        joined
    } else {
        std::env::current_dir()?.join(joined)
    };

    Ok(SourceReference::Local(normalize(&absolute)))
}

/// Lexically collapse `.` and `..` components. `..` at the root stays at the
/// root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
