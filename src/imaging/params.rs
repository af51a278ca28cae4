//! Parameter types for backend operations.
//!
//! These structs describe *what* the backend should produce, not *how*. They
//! are the interface between the composers (which decide which formats and
//! widths a `<picture>` needs) and the [`backend`](super::backend) (which
//! does the pixel work). Keeping them plain data lets tests swap in a mock
//! backend without touching composer logic.

use crate::types::OutputFormat;
use std::path::PathBuf;

/// Full specification for one encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Target widths in pixels. Derivatives come back ascending.
    pub widths: Vec<u32>,
    /// Formats in preference order, most efficient first.
    pub formats: Vec<OutputFormat>,
    /// Directory the encoded files are written to.
    pub output_location: PathBuf,
    /// Public URL prefix of `output_location`, e.g. `/img`.
    pub url_path: String,
    /// Keep every frame instead of collapsing to the first one.
    pub animated: bool,
}

impl EncodeOptions {
    pub fn new(
        widths: &[u32],
        formats: &[OutputFormat],
        output_location: impl Into<PathBuf>,
        url_path: impl Into<String>,
    ) -> Self {
        Self {
            widths: widths.to_vec(),
            formats: formats.to_vec(),
            output_location: output_location.into(),
            url_path: url_path.into(),
            animated: false,
        }
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }
}
