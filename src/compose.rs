//! `<picture>` composition.
//!
//! Two composers share the leaf utilities:
//!
//! - [`compose_static`]: a still image in every preferred format, with an
//!   optional dark-mode alternate. The fallback `<img>` uses the largest
//!   light derivative of the fallback format.
//! - [`compose_animated`]: a looping image in one animation-capable format.
//!   The `<img>` carries the original's probed dimensions, because the
//!   backend only reports the resized ones.
//!
//! Both fail as a whole: an error anywhere means no markup, never a
//! half-built `<picture>`.
//!
//! ## Output
//!
//! ```text
//! <picture>
//! <source type="image/avif" srcset="/img/dawn-400.avif 400w, /img/dawn-800.avif 800w" sizes="100vw">
//! <source type="image/webp" srcset="/img/dawn-400.webp 400w, /img/dawn-800.webp 800w" sizes="100vw">
//! <source type="image/jpeg" srcset="/img/dawn-400.jpeg 400w, /img/dawn-800.jpeg 800w" sizes="100vw">
//! <img src="/img/dawn-800.avif" width="800" height="600" alt="Dawn" loading="lazy" decoding="async">
//! </picture>
//! ```
//!
//! One element per line, no indentation. The same inputs and a deterministic
//! backend always give byte-identical output.

use crate::attributes::{Attributes, start_tag};
use crate::config::PictureConfig;
use crate::imaging::{BackendError, EncodeOptions, ImageBackend};
use crate::resolve::{SourceReference, resolve};
use crate::sources::{build_sources, largest};
use crate::types::{EncodedSet, OutputFormat};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Widths used when a request does not name any.
pub const DEFAULT_WIDTHS: [u32; 2] = [400, 800];
/// `sizes` hint used when a request does not give one.
pub const DEFAULT_SIZES: &str = "100vw";

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Source image not found: {}", .0.display())]
    Resolution(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding failed: {0}")]
    Encoding(#[from] BackendError),
    #[error("Invalid picture request: {0}")]
    Configuration(String),
}

/// A still image, optionally with a dark-mode variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub source: String,
    pub alt: String,
    pub dark_source: Option<String>,
    pub sizes: String,
    pub widths: Vec<u32>,
}

impl ImageRequest {
    pub fn new(source: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alt: alt.into(),
            dark_source: None,
            sizes: DEFAULT_SIZES.to_string(),
            widths: DEFAULT_WIDTHS.to_vec(),
        }
    }

    pub fn dark_source(mut self, dark_source: impl Into<String>) -> Self {
        self.dark_source = Some(dark_source.into());
        self
    }

    pub fn sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = sizes.into();
        self
    }

    pub fn widths(mut self, widths: &[u32]) -> Self {
        self.widths = widths.to_vec();
        self
    }
}

/// A looping image rendered in a single format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedImageRequest {
    pub source: String,
    pub alt: String,
    pub sizes: String,
    pub widths: Vec<u32>,
    pub class_name: Option<String>,
}

impl AnimatedImageRequest {
    pub fn new(source: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alt: alt.into(),
            sizes: DEFAULT_SIZES.to_string(),
            widths: DEFAULT_WIDTHS.to_vec(),
            class_name: None,
        }
    }

    pub fn sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = sizes.into();
        self
    }

    pub fn widths(mut self, widths: &[u32]) -> Self {
        self.widths = widths.to_vec();
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

/// Either kind of request, for batch composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureRequest {
    Still(ImageRequest),
    Animated(AnimatedImageRequest),
}

/// Finished `<picture>` markup, ready to inline verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureMarkup(String);

impl PictureMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PictureMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PictureMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Splices into maud templates as-is; the markup is already escaped.
impl maud::Render for PictureMarkup {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&self.0);
    }
}

/// Compose a `<picture>` for a still image.
#[tracing::instrument(skip_all, fields(src = %request.source))]
pub fn compose_static<B: ImageBackend + ?Sized>(
    backend: &B,
    config: &PictureConfig,
    request: &ImageRequest,
    referencing_document: &Path,
) -> Result<PictureMarkup, ComposeError> {
    validate_widths(&request.widths)?;
    let fallback = fallback_format(config)?;

    let light_ref = resolve_existing(&request.source, referencing_document)?;
    let dark_ref = request
        .dark_source
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| resolve_existing(s, referencing_document))
        .transpose()?;
    tracing::debug!(light = %light_ref, dark = ?dark_ref.as_ref().map(|r| r.to_string()), "resolved sources");

    let options = EncodeOptions::new(
        &request.widths,
        &config.formats.preferred,
        config.output_location(),
        config.url_path(),
    );

    let (light, dark) = rayon::join(
        || backend.encode(&light_ref, &options),
        || match &dark_ref {
            Some(dark_ref) => backend.encode(dark_ref, &options),
            None => Ok(EncodedSet::new()),
        },
    );
    let light = light?;
    let dark = dark?;
    tracing::debug!(
        light_formats = light.len(),
        dark_formats = dark.len(),
        "encoded"
    );

    let sources = build_sources(&light, &dark, &request.sizes);
    let representative = largest(&light, fallback)?;
    let img = img_attributes(
        config,
        &representative.url,
        representative.width,
        representative.height,
        &request.alt,
    );

    Ok(assemble(&Attributes::new(), &sources, &img))
}

/// Compose a `<picture>` for an animated image.
#[tracing::instrument(skip_all, fields(src = %request.source))]
pub fn compose_animated<B: ImageBackend + ?Sized>(
    backend: &B,
    config: &PictureConfig,
    request: &AnimatedImageRequest,
    referencing_document: &Path,
) -> Result<PictureMarkup, ComposeError> {
    validate_widths(&request.widths)?;
    let format = config.animated.format;

    let input = resolve_existing(&request.source, referencing_document)?;
    let intrinsic = backend.probe(&input)?;
    tracing::debug!(
        width = intrinsic.width,
        height = intrinsic.height,
        "probed intrinsic size"
    );

    let options = EncodeOptions::new(
        &request.widths,
        &[format],
        config.output_location(),
        config.url_path(),
    )
    .animated(true);
    let set = backend.encode(&input, &options)?;

    let sources = build_sources(&set, &EncodedSet::new(), &request.sizes);
    let representative = largest(&set, format)?;
    let img = img_attributes(
        config,
        &representative.url,
        intrinsic.width,
        intrinsic.height,
        &request.alt,
    );
    let picture = Attributes::new().set_opt("class", request.class_name.as_deref());

    Ok(assemble(&picture, &sources, &img))
}

/// Compose many pictures in parallel. Results keep the order of `requests`;
/// a failing request does not affect the others.
#[tracing::instrument(skip_all, fields(count = requests.len()))]
pub fn compose_all<B: ImageBackend + ?Sized>(
    backend: &B,
    config: &PictureConfig,
    requests: &[PictureRequest],
    referencing_document: &Path,
) -> Vec<Result<PictureMarkup, ComposeError>> {
    requests
        .par_iter()
        .map(|request| match request {
            PictureRequest::Still(r) => compose_static(backend, config, r, referencing_document),
            PictureRequest::Animated(r) => {
                compose_animated(backend, config, r, referencing_document)
            }
        })
        .collect()
}

fn validate_widths(widths: &[u32]) -> Result<(), ComposeError> {
    if widths.is_empty() {
        return Err(ComposeError::Configuration(
            "at least one width is required".into(),
        ));
    }
    if widths.contains(&0) {
        return Err(ComposeError::Configuration(format!(
            "widths must be positive, got {widths:?}"
        )));
    }
    Ok(())
}

fn fallback_format(config: &PictureConfig) -> Result<OutputFormat, ComposeError> {
    let fallback = config
        .fallback_format()
        .ok_or_else(|| ComposeError::Configuration("no preferred formats configured".into()))?;
    if !config.formats.preferred.contains(&fallback) {
        return Err(ComposeError::Configuration(format!(
            "fallback format {fallback} is not requested from the encoder"
        )));
    }
    Ok(fallback)
}

/// Resolve `src` and make sure a local file is actually there. Directories
/// (an empty `src` or `.` lands on the document's own directory) don't count.
fn resolve_existing(src: &str, referencing_document: &Path) -> Result<SourceReference, ComposeError> {
    let reference = resolve(src, referencing_document)?;
    if let Some(path) = reference.as_local()
        && !path.is_file()
    {
        return Err(ComposeError::Resolution(path.to_path_buf()));
    }
    Ok(reference)
}

fn img_attributes(
    config: &PictureConfig,
    src: &str,
    width: u32,
    height: u32,
    alt: &str,
) -> Attributes {
    Attributes::new()
        .set("src", src)
        .set("width", width)
        .set("height", height)
        .set("alt", alt)
        .set_opt("loading", config.img.loading())
        .set_opt("decoding", config.img.decoding())
}

fn assemble(picture: &Attributes, sources: &str, img: &Attributes) -> PictureMarkup {
    let mut lines = vec![start_tag("picture", picture)];
    if !sources.is_empty() {
        lines.push(sources.to_string());
    }
    lines.push(start_tag("img", img));
    lines.push("</picture>".to_string());
    PictureMarkup(lines.join("\n"))
}
