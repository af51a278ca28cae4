//! Page-bound shortcode surface.
//!
//! A page template calls `image` / `animated_image` with whatever arguments
//! the author wrote. Missing arguments fall back to `[defaults]` in
//! `picture.toml`, and relative sources resolve next to the page file:
//!
//! ```text
//! {% image "./dawn.jpg", "Dawn over the pier" %}
//! {% image "./day.png", "Skyline", "./night.png", "50vw", [320, 640] %}
//! {% animated_image "./loop.gif", "Waves", null, null, "hero" %}
//! ```

use crate::compose::{
    AnimatedImageRequest, ComposeError, ImageRequest, PictureMarkup, compose_animated,
    compose_static,
};
use crate::config::PictureConfig;
use crate::imaging::ImageBackend;
use std::path::{Path, PathBuf};

/// Shortcodes for one page.
pub struct Shortcodes<'a, B: ImageBackend + ?Sized> {
    backend: &'a B,
    config: &'a PictureConfig,
    page_input_path: PathBuf,
}

impl<'a, B: ImageBackend + ?Sized> Shortcodes<'a, B> {
    pub fn new(backend: &'a B, config: &'a PictureConfig, page_input_path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            config,
            page_input_path: page_input_path.into(),
        }
    }

    pub fn page_input_path(&self) -> &Path {
        &self.page_input_path
    }

    /// Still image with an optional dark-mode alternate.
    pub fn image(
        &self,
        src: &str,
        alt: &str,
        dark_src: Option<&str>,
        sizes: Option<&str>,
        widths: Option<&[u32]>,
    ) -> Result<PictureMarkup, ComposeError> {
        let request = ImageRequest {
            source: src.to_string(),
            alt: alt.to_string(),
            dark_source: dark_src.map(str::to_string),
            sizes: self.sizes_or_default(sizes),
            widths: self.widths_or_default(widths),
        };
        compose_static(self.backend, self.config, &request, &self.page_input_path)
    }

    /// Animated image in the configured animation format.
    pub fn animated_image(
        &self,
        src: &str,
        alt: &str,
        sizes: Option<&str>,
        widths: Option<&[u32]>,
        class_name: Option<&str>,
    ) -> Result<PictureMarkup, ComposeError> {
        let request = AnimatedImageRequest {
            source: src.to_string(),
            alt: alt.to_string(),
            sizes: self.sizes_or_default(sizes),
            widths: self.widths_or_default(widths),
            class_name: class_name.map(str::to_string),
        };
        compose_animated(self.backend, self.config, &request, &self.page_input_path)
    }

    fn sizes_or_default(&self, sizes: Option<&str>) -> String {
        sizes.unwrap_or(&self.config.defaults.sizes).to_string()
    }

    fn widths_or_default(&self, widths: Option<&[u32]>) -> Vec<u32> {
        widths.unwrap_or(&self.config.defaults.widths).to_vec()
    }
}
