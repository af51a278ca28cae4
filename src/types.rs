//! Shared types passed between the backend and the markup stages.
//!
//! The backend produces an [`EncodedSet`] per source image; the source-set
//! assembler and the representative selector read it. Field names follow the
//! metadata shape common to image encoders (`url`, `width`, `height`,
//! `srcset`, `sourceType`) so an encoder's JSON output deserializes directly.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An encoded output format the backend can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Avif,
    Webp,
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    /// MIME type used for the `type` attribute of `<source>`.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Avif => "image/avif",
            Self::Webp => "image/webp",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Avif => "avif",
            Self::Webp => "webp",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One resized, encoded variant of a source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivative {
    /// Public URL of the encoded file.
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Ready-made srcset candidate, e.g. `/img/dawn-800.avif 800w`.
    #[serde(alias = "srcset")]
    pub srcset_entry: String,
    #[serde(alias = "sourceType")]
    pub format_mime_type: String,
}

/// Derivatives of one format, ascending by width. The last one is the largest.
pub type FormatGroup = Vec<Derivative>;

/// Format → derivatives, in the order the formats were requested.
///
/// Iteration order is insertion order, which is the format preference
/// order. Inserting a format that is already present replaces its group in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedSet {
    groups: Vec<(OutputFormat, FormatGroup)>,
}

impl EncodedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, format: OutputFormat, group: FormatGroup) {
        match self.groups.iter_mut().find(|(f, _)| *f == format) {
            Some((_, existing)) => *existing = group,
            None => self.groups.push((format, group)),
        }
    }

    pub fn get(&self, format: OutputFormat) -> Option<&[Derivative]> {
        self.groups
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, group)| group.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (OutputFormat, &[Derivative])> {
        self.groups.iter().map(|(f, group)| (*f, group.as_slice()))
    }

    pub fn formats(&self) -> Vec<OutputFormat> {
        self.groups.iter().map(|(f, _)| *f).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<(OutputFormat, FormatGroup)> for EncodedSet {
    fn from_iter<I: IntoIterator<Item = (OutputFormat, FormatGroup)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (format, group) in iter {
            set.insert(format, group);
        }
        set
    }
}

impl Serialize for EncodedSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (format, group) in &self.groups {
            map.serialize_entry(format, group)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EncodedSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EncodedSetVisitor;

        impl<'de> Visitor<'de> for EncodedSetVisitor {
            type Value = EncodedSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of output format to derivative list")
            }

            // Entries are read one by one so the document order survives.
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<EncodedSet, A::Error> {
                let mut set = EncodedSet::new();
                while let Some((format, group)) =
                    access.next_entry::<OutputFormat, FormatGroup>()?
                {
                    set.insert(format, group);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(EncodedSetVisitor)
    }
}
