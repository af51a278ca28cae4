//! HTML attribute serialization.
//!
//! Attributes are an ordered list of `name → Option<value>`. Absent values
//! vanish from the output entirely, which is how optional attributes such as
//! `media` on a light `<source>` or `class` on `<picture>` are left out:
//!
//! ```text
//! [("a", Some("1")), ("b", None), ("c", Some("x"))]  →  a="1" c="x"
//! ```
//!
//! Values are HTML-escaped with maud's escaper, the same one `html!` applies
//! to attribute values, so alt text or URLs containing `"` or `&` cannot
//! break out of the attribute.

use maud::Render;
use std::fmt;

/// Ordered attribute map for one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(&'static str, Option<String>)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a present attribute. Setting a name twice keeps its first
    /// position and the last value.
    pub fn set(self, name: &'static str, value: impl fmt::Display) -> Self {
        self.set_opt(name, Some(value))
    }

    /// Set an attribute that is omitted when `value` is `None`.
    pub fn set_opt(mut self, name: &'static str, value: Option<impl fmt::Display>) -> Self {
        let value = value.map(|v| v.to_string());
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Render as `name="value"` pairs joined by single spaces.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        write_attributes(
            &mut out,
            self.entries.iter().map(|(n, v)| (*n, v.as_deref())),
        );
        out
    }

    /// Whether at least one attribute will be rendered.
    pub fn has_present(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.is_some())
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Serialize borrowed `(name, value)` pairs, skipping `None` values.
pub fn serialize(attrs: &[(&str, Option<&str>)]) -> String {
    let mut out = String::new();
    write_attributes(&mut out, attrs.iter().copied());
    out
}

fn write_attributes<'a>(out: &mut String, attrs: impl Iterator<Item = (&'a str, Option<&'a str>)>) {
    for (name, value) in attrs {
        let Some(value) = value else { continue };
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str("=\"");
        value.render_to(out);
        out.push('"');
    }
}

/// Render a start tag: `<name attrs>` or `<name>` when nothing is present.
pub fn start_tag(name: &str, attrs: &Attributes) -> String {
    if attrs.has_present() {
        format!("<{name} {attrs}>")
    } else {
        format!("<{name}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_vanish() {
        assert_eq!(
            serialize(&[("a", Some("1")), ("b", None), ("c", Some("x"))]),
            r#"a="1" c="x""#
        );
    }

    #[test]
    fn leading_absent_value_leaves_no_space() {
        assert_eq!(serialize(&[("a", None), ("b", Some("2"))]), r#"b="2""#);
    }

    #[test]
    fn all_absent_is_empty() {
        assert_eq!(serialize(&[("a", None), ("b", None)]), "");
    }

    #[test]
    fn builder_preserves_insertion_order() {
        let attrs = Attributes::new()
            .set("src", "/img/a-800.avif")
            .set("width", 800)
            .set("height", 600)
            .set_opt("class", None::<&str>)
            .set("alt", "A cat");
        assert_eq!(
            attrs.serialize(),
            r#"src="/img/a-800.avif" width="800" height="600" alt="A cat""#
        );
    }

    #[test]
    fn setting_twice_keeps_position_and_last_value() {
        let attrs = Attributes::new()
            .set("a", "1")
            .set("b", "2")
            .set("a", "3");
        assert_eq!(attrs.to_string(), r#"a="3" b="2""#);
    }

    #[test]
    fn values_are_escaped() {
        let attrs = Attributes::new().set("alt", r#"Tom & "Jerry" <3"#);
        assert_eq!(
            attrs.serialize(),
            r#"alt="Tom &amp; &quot;Jerry&quot; &lt;3""#
        );
    }

    #[test]
    fn empty_string_is_present() {
        let attrs = Attributes::new().set("alt", "");
        assert_eq!(attrs.serialize(), r#"alt="""#);
    }

    #[test]
    fn start_tag_without_attributes_has_no_space() {
        let attrs = Attributes::new().set_opt("class", None::<&str>);
        assert_eq!(start_tag("picture", &attrs), "<picture>");
    }

    #[test]
    fn start_tag_with_attributes() {
        let attrs = Attributes::new().set_opt("class", Some("hero"));
        assert_eq!(start_tag("picture", &attrs), r#"<picture class="hero">"#);
    }
}
