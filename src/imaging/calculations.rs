//! Pure calculation functions for derivative dimensions.
//!
//! Backends that wrap an external encoder can use these to describe what
//! they produce; the mock backend in the test suite uses them to return
//! realistic encoded sets. All functions here are pure and testable without
//! any I/O or images.

use super::backend::Dimensions;
use super::params::EncodeOptions;
use crate::types::{Derivative, EncodedSet};

/// Represents a single derivative width to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivativeSize {
    pub width: u32,
    /// Height preserving the source aspect ratio, rounded.
    pub height: u32,
}

/// Calculate which derivative widths to generate and their heights.
///
/// Widths larger than the original are skipped (no upscaling), duplicates are
/// dropped and the result is ascending. If every requested width exceeds the
/// original, the original size is the only entry.
///
/// # Examples
/// ```
/// # use simple_picture::imaging::{Dimensions, calculate_derivative_sizes};
/// let sizes = calculate_derivative_sizes(Dimensions { width: 600, height: 400 }, &[400, 800]);
/// assert_eq!(sizes.len(), 1);
/// assert_eq!((sizes[0].width, sizes[0].height), (400, 267));
/// ```
pub fn calculate_derivative_sizes(original: Dimensions, widths: &[u32]) -> Vec<DerivativeSize> {
    let mut targets: Vec<u32> = widths
        .iter()
        .copied()
        .filter(|&w| w > 0 && w <= original.width)
        .collect();
    targets.sort_unstable();
    targets.dedup();

    if targets.is_empty() {
        return vec![DerivativeSize {
            width: original.width,
            height: original.height,
        }];
    }

    targets
        .into_iter()
        .map(|width| DerivativeSize {
            width,
            height: scaled_height(original, width),
        })
        .collect()
}

fn scaled_height(original: Dimensions, width: u32) -> u32 {
    let ratio = width as f64 / original.width as f64;
    ((original.height as f64 * ratio).round() as u32).max(1)
}

/// Describe the encoded set a backend produces for `options`.
///
/// Files are named `{stem}-{width}.{ext}` under `options.url_path`.
pub fn plan_encoded_set(original: Dimensions, stem: &str, options: &EncodeOptions) -> EncodedSet {
    let sizes = calculate_derivative_sizes(original, &options.widths);
    let url_path = options.url_path.trim_end_matches('/');

    options
        .formats
        .iter()
        .map(|&format| {
            let group = sizes
                .iter()
                .map(|size| {
                    let url = format!("{url_path}/{stem}-{}.{}", size.width, format.extension());
                    Derivative {
                        srcset_entry: format!("{url} {}w", size.width),
                        url,
                        width: size.width,
                        height: size.height,
                        format_mime_type: format.mime_type().to_string(),
                    }
                })
                .collect();
            (format, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutputFormat;

    const LANDSCAPE: Dimensions = Dimensions {
        width: 2000,
        height: 1500,
    };

    // =========================================================================
    // calculate_derivative_sizes tests
    // =========================================================================

    #[test]
    fn sizes_filter_larger_widths() {
        let sizes = calculate_derivative_sizes(
            Dimensions {
                width: 1000,
                height: 800,
            },
            &[800, 1400, 2080],
        );
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes[0].width, 800);
    }

    #[test]
    fn sizes_preserve_aspect_ratio() {
        let sizes = calculate_derivative_sizes(LANDSCAPE, &[1000]);
        assert_eq!(
            sizes,
            vec![DerivativeSize {
                width: 1000,
                height: 750
            }]
        );
    }

    #[test]
    fn sizes_round_height() {
        // 400 * 400/600 = 266.67
        let sizes = calculate_derivative_sizes(
            Dimensions {
                width: 600,
                height: 400,
            },
            &[400],
        );
        assert_eq!(sizes[0].height, 267);
    }

    #[test]
    fn sizes_are_sorted_and_deduplicated() {
        let sizes = calculate_derivative_sizes(LANDSCAPE, &[800, 400, 800]);
        let widths: Vec<u32> = sizes.iter().map(|s| s.width).collect();
        assert_eq!(widths, vec![400, 800]);
    }

    #[test]
    fn sizes_fall_back_to_original_when_all_exceed() {
        let sizes = calculate_derivative_sizes(
            Dimensions {
                width: 300,
                height: 200,
            },
            &[400, 800],
        );
        assert_eq!(
            sizes,
            vec![DerivativeSize {
                width: 300,
                height: 200
            }]
        );
    }

    #[test]
    fn sizes_empty_widths_returns_original() {
        let sizes = calculate_derivative_sizes(LANDSCAPE, &[]);
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes[0].width, 2000);
    }

    // =========================================================================
    // plan_encoded_set tests
    // =========================================================================

    #[test]
    fn plan_covers_every_format_in_order() {
        let options = EncodeOptions::new(
            &[400, 800],
            &[OutputFormat::Avif, OutputFormat::Webp, OutputFormat::Jpeg],
            "_site/img",
            "/img/",
        );
        let set = plan_encoded_set(LANDSCAPE, "dawn", &options);

        assert_eq!(
            set.formats(),
            vec![OutputFormat::Avif, OutputFormat::Webp, OutputFormat::Jpeg]
        );
        for (_, group) in set.iter() {
            assert_eq!(group.len(), 2);
            assert!(group[0].width < group[1].width);
        }
    }

    #[test]
    fn plan_builds_urls_and_srcset_entries() {
        let options = EncodeOptions::new(&[400], &[OutputFormat::Webp], "_site/img", "/img");
        let set = plan_encoded_set(LANDSCAPE, "dawn", &options);

        let d = &set.get(OutputFormat::Webp).unwrap()[0];
        assert_eq!(d.url, "/img/dawn-400.webp");
        assert_eq!(d.srcset_entry, "/img/dawn-400.webp 400w");
        assert_eq!(d.format_mime_type, "image/webp");
        assert_eq!((d.width, d.height), (400, 300));
    }
}
