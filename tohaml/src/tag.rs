//! One-line rendering of an element.
//!
//! A line is built from up to four parts: the `%tag` token (omitted for a
//! `div` that has shorthand), the `#id.class` shorthand, the `{key:"value"}`
//! map of everything the shorthand could not absorb, and for inline elements
//! the `>`/`<` whitespace markers.

use indextree::NodeId;

use crate::attrs::{Shorthand, classify};
use crate::dom::{Attributes, Document, ElementData};
use crate::error::ConvertError;

/// Elements whose surrounding and inner whitespace is significant.
const INLINE_ELEMENTS: &[&str] = &["a", "span", "strong", "em"];

/// Line emitted for a `<style>` element.
pub const STYLE_MARKER: &str = ":css";

/// Render the element at `id` as a single line, without indentation.
pub fn render_tag(doc: &Document, id: NodeId, elem: &ElementData) -> Result<String, ConvertError> {
    let tag = elem.tag();
    if tag == "style" {
        return Ok(STYLE_MARKER.to_string());
    }

    let Shorthand { prefix, remaining } = classify(tag, &elem.attrs)?;

    let mut line = String::new();
    if tag != "div" || prefix.is_empty() {
        line.push('%');
        line.push_str(tag);
    }
    line.push_str(&prefix);
    write_attribute_map(&mut line, &remaining);

    if INLINE_ELEMENTS.contains(&tag) {
        if doc.is_outer_nospace(id) {
            line.push('>');
        }
        if doc.is_inner_nospace(id) {
            line.push('<');
        }
    }
    Ok(line)
}

/// Append `{key:"value",...}` for `attrs`; nothing when `attrs` is empty.
pub fn write_attribute_map(out: &mut String, attrs: &Attributes) {
    if attrs.is_empty() {
        return;
    }
    out.push('{');
    for (idx, (key, value)) in attrs.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(key);
        out.push_str(":\"");
        for c in value.joined().chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        }
        out.push('"');
    }
    out.push('}');
}
