//! # Simple Picture
//!
//! Responsive `<picture>` markup for static sites. Given a source image, an
//! optional dark-mode variant, target widths and a `sizes` hint, it emits a
//! `<picture>` with one `<source>` per encoded format, dark sources first,
//! and a fallback `<img>` carrying intrinsic dimensions.
//!
//! The pixels are someone else's job. Resizing, transcoding and caching go
//! through the [`imaging::ImageBackend`] trait; this crate decides what to ask
//! for and how to describe the answer in HTML.
//!
//! # Pipeline
//!
//! ```text
//! src + page path ──resolve──▶ SourceReference ──backend.encode──▶ EncodedSet
//!                                                                      │
//!                            <picture> ◀──compose── sources + largest ◀┘
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | Turns a shortcode `src` into a URL or an absolute path next to the page |
//! | [`attributes`] | Ordered, escaped attribute serialization with omitted `None` values |
//! | [`sources`] | `<source>` block assembly (dark before light) and fallback derivative choice |
//! | [`compose`] | Static and animated composers, batch composition, `ComposeError` |
//! | [`shortcode`] | Page-bound `image` / `animated_image` calls with configured defaults |
//! | [`config`] | `picture.toml` loading, merging over stock defaults, validation |
//! | [`imaging`] | Backend trait, encode options and derivative size planning |
//! | [`types`] | `OutputFormat`, `Derivative` and the insertion-ordered `EncodedSet` |
//!
//! # Design Decisions
//!
//! ## Dark Sources First
//!
//! Browsers pick the first matching `<source>`. A dark source carries
//! `media="(prefers-color-scheme: dark)"`; the light one carries nothing and
//! always matches. Emitting light first would make the dark variant
//! unreachable, so every dark group is written before every light group.
//!
//! ## Intrinsic Size For Animations
//!
//! The static fallback `<img>` takes width and height from the largest
//! derivative. Animated images take them from a probe of the original, so the
//! reserved layout box has the true aspect ratio even when the backend only
//! produced smaller frames.
//!
//! ## All Or Nothing
//!
//! A missing local file, a rejected width or a backend failure aborts the
//! whole picture. Callers never get a `<picture>` with holes in it.

pub mod attributes;
pub mod compose;
pub mod config;
pub mod imaging;
pub mod resolve;
pub mod shortcode;
pub mod sources;
pub mod types;

pub use compose::{
    AnimatedImageRequest, ComposeError, ImageRequest, PictureMarkup, PictureRequest, compose_all,
    compose_animated, compose_static,
};
pub use config::PictureConfig;
pub use imaging::{BackendError, Dimensions, EncodeOptions, ImageBackend};
pub use resolve::SourceReference;
pub use shortcode::Shortcodes;
pub use types::{Derivative, EncodedSet, OutputFormat};

#[cfg(test)]
pub(crate) mod test_helpers;
