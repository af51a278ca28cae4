//! `<source>` assembly and fallback selection.
//!
//! Browsers walk `<source>` elements in document order and take the first
//! one whose `type` they support and whose `media` matches. So for every
//! format the dark-mode source (qualified by `prefers-color-scheme: dark`)
//! has to come before the unconditional light source, or the light one would
//! always win:
//!
//! ```text
//! <source type="image/avif" srcset="dark-400.avif 400w, dark-800.avif 800w" sizes="100vw" media="(prefers-color-scheme: dark)">
//! <source type="image/webp" srcset="..." sizes="100vw" media="(prefers-color-scheme: dark)">
//! <source type="image/avif" srcset="light-400.avif 400w, light-800.avif 800w" sizes="100vw">
//! <source type="image/webp" srcset="..." sizes="100vw">
//! ```

use crate::attributes::{Attributes, start_tag};
use crate::compose::ComposeError;
use crate::imaging::BackendError;
use crate::types::{Derivative, EncodedSet, OutputFormat};

/// Media condition attached to every dark-mode `<source>`.
pub const DARK_MEDIA: &str = "(prefers-color-scheme: dark)";

/// Build the newline-joined `<source>` block: every dark group first, then
/// every light group, each in its set's own format order.
pub fn build_sources(light: &EncodedSet, dark: &EncodedSet, sizes: &str) -> String {
    dark.iter()
        .filter_map(|(_, group)| source_tag(group, sizes, Some(DARK_MEDIA)))
        .chain(
            light
                .iter()
                .filter_map(|(_, group)| source_tag(group, sizes, None)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

fn source_tag(group: &[Derivative], sizes: &str, media: Option<&str>) -> Option<String> {
    let first = group.first()?;
    let srcset = group
        .iter()
        .map(|d| d.srcset_entry.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let attrs = Attributes::new()
        .set("type", &first.format_mime_type)
        .set("srcset", srcset)
        .set("sizes", sizes)
        .set_opt("media", media);

    Some(start_tag("source", &attrs))
}

/// The widest derivative of `format`, which drives the fallback `<img>`.
///
/// A missing format means the backend was never asked for it, which is a
/// configuration error. An empty group means the backend broke its contract.
pub fn largest(set: &EncodedSet, format: OutputFormat) -> Result<&Derivative, ComposeError> {
    let group = set.get(format).ok_or_else(|| {
        ComposeError::Configuration(format!(
            "fallback format {format} was not among the encoded formats {:?}",
            set.formats()
        ))
    })?;
    group
        .last()
        .ok_or(ComposeError::Encoding(BackendError::EmptyFormat(format)))
}
