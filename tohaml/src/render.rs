//! Depth-first tree walker producing the indented markup.
//!
//! Elements become one line via [`crate::tag`], text and comments become zero
//! or more wrapped lines via [`crate::text`]. Every nesting level indents by
//! two spaces and every line ends with `\n`.

use indextree::NodeId;
use std::fmt::Write;

use crate::dom::{Document, NodeKind, parse};
use crate::error::ConvertError;
use crate::tag::render_tag;
use crate::text::render_text;
use crate::{debug, trace};

/// Spaces added per nesting level.
const INDENT_WIDTH: usize = 2;

/// Options for conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Total column budget for wrapped text, indentation included (default: 80)
    pub wrap_width: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { wrap_width: 80 }
    }
}

impl ConvertOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column budget for wrapped text.
    pub fn with_wrap_width(mut self, wrap_width: usize) -> Self {
        self.wrap_width = wrap_width;
        self
    }
}

/// Convert a whole HTML document, starting at `<html>`.
pub fn convert(html: &str) -> Result<String, ConvertError> {
    convert_with_options(html, &ConvertOptions::default())
}

/// Convert a whole HTML document with custom options.
pub fn convert_with_options(html: &str, opts: &ConvertOptions) -> Result<String, ConvertError> {
    render_document(&parse(html), opts)
}

/// Convert an HTML snippet: every top-level node of the snippet is rendered at
/// depth 0.
///
/// html5ever moves head-level elements (`<meta>`, `<title>`, `<style>`, ...)
/// of a bare snippet into the implied `<head>`, so its children come first,
/// followed by the children of `<body>`.
pub fn convert_fragment(html: &str) -> Result<String, ConvertError> {
    convert_fragment_with_options(html, &ConvertOptions::default())
}

/// Convert an HTML snippet with custom options.
pub fn convert_fragment_with_options(
    html: &str,
    opts: &ConvertOptions,
) -> Result<String, ConvertError> {
    let doc = parse(html);
    let mut out = String::new();
    let mut renderer = Renderer::new(&mut out, &doc, opts);
    for parent in [doc.head(), doc.body()].into_iter().flatten() {
        for child in doc.children(parent) {
            renderer.write_node(child, 0)?;
        }
    }
    Ok(out)
}

/// Render a parsed document from its root element.
pub fn render_document(doc: &Document, opts: &ConvertOptions) -> Result<String, ConvertError> {
    render_node(doc, doc.root, 0, opts)
}

/// Render the subtree at `id` as if it sat `depth` levels deep.
pub fn render_node(
    doc: &Document,
    id: NodeId,
    depth: usize,
    opts: &ConvertOptions,
) -> Result<String, ConvertError> {
    let mut out = String::new();
    Renderer::new(&mut out, doc, opts).write_node(id, depth)?;
    Ok(out)
}

struct Renderer<'a, W: Write> {
    out: &'a mut W,
    doc: &'a Document,
    options: &'a ConvertOptions,
}

impl<'a, W: Write> Renderer<'a, W> {
    fn new(out: &'a mut W, doc: &'a Document, options: &'a ConvertOptions) -> Self {
        Self { out, doc, options }
    }

    fn write_line(&mut self, depth: usize, line: &str) {
        let _ = writeln!(self.out, "{:indent$}{line}", "", indent = depth * INDENT_WIDTH);
    }

    fn write_node(&mut self, id: NodeId, depth: usize) -> Result<(), ConvertError> {
        let doc = self.doc;
        match doc.get(id) {
            NodeKind::Document => {
                // Invisible; render its children in place
                for child in doc.children(id) {
                    self.write_node(child, depth)?;
                }
            }
            NodeKind::Element(elem) => {
                trace!("element <{}> at depth {depth}", elem.tag());
                let line = render_tag(doc, id, elem)?;
                self.write_line(depth, &line);
                for child in doc.children(id) {
                    self.write_node(child, depth + 1)?;
                }
            }
            NodeKind::Text(text) | NodeKind::Comment(text) => {
                let indent = depth * INDENT_WIDTH;
                let width = self.options.wrap_width.saturating_sub(indent);
                let lines = render_text(text, width);
                if lines.is_empty() {
                    debug!("skipping whitespace-only node at depth {depth}");
                }
                for line in &lines {
                    self.write_line(depth, line);
                }
            }
        }
        Ok(())
    }
}
