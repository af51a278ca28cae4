//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between markup synthesis and the
//! actual image work. It defines the two operations every backend must
//! support: `encode` (resize + transcode into the requested formats and
//! widths) and `probe` (read the original's intrinsic dimensions).
//!
//! Transcoding, caching of derivatives and reading files are the backend's
//! business; this crate only describes what it wants and reads back the
//! resulting [`EncodedSet`].

use super::params::EncodeOptions;
use crate::resolve::SourceReference;
use crate::types::{EncodedSet, OutputFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Encoder returned no derivatives for {0}")]
    EmptyFormat(OutputFormat),
}

/// Result of a probe operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image backends.
///
/// `Sync` so composers can run the light and dark encodes on two rayon
/// workers against the same backend.
pub trait ImageBackend: Sync {
    /// Produce one derivative per (width, format) pair.
    ///
    /// The returned set lists formats in `options.formats` order, each group
    /// ascending by width.
    fn encode(
        &self,
        input: &SourceReference,
        options: &EncodeOptions,
    ) -> Result<EncodedSet, BackendError>;

    /// Intrinsic dimensions of the original, before any resizing.
    fn probe(&self, input: &SourceReference) -> Result<Dimensions, BackendError>;
}

impl<B: ImageBackend + ?Sized> ImageBackend for &B {
    fn encode(
        &self,
        input: &SourceReference,
        options: &EncodeOptions,
    ) -> Result<EncodedSet, BackendError> {
        (**self).encode(input, options)
    }

    fn probe(&self, input: &SourceReference) -> Result<Dimensions, BackendError> {
        (**self).probe(input)
    }
}
