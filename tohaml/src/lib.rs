//! HTML to HAML-style indentation markup, based on html5ever.
//!
//! tohaml provides:
//! - **Parsing**: browser-compatible HTML5 parsing via html5ever into an arena DOM
//! - **Shorthand**: `#id` / `.class` prefixes, with template markers kept verbatim
//! - **Text**: reserved-character escaping, entity folding and re-wrapping
//! - **Rendering**: one line per element, two spaces per nesting level
//!
//! # Example
//!
//! ```rust
//! use tohaml::{ConvertOptions, convert, convert_fragment_with_options};
//!
//! let haml = convert_fragment_with_options(
//!     r#"<div id="main" class="wide"><p>Hello!</p></div>"#,
//!     &ConvertOptions::new().with_wrap_width(60),
//! )
//! .unwrap();
//! assert_eq!(haml, "#main.wide\n  %p\n    Hello!\n");
//!
//! // Whole documents start at <html>
//! let haml = convert("<title>T</title>").unwrap();
//! assert!(haml.starts_with("%html\n  %head\n    %title\n"));
//! ```

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

pub mod attrs;
pub mod dom;
pub mod entities;
pub mod error;
pub mod render;
pub mod tag;
pub mod text;

pub use dom::{AttrValue, Attributes, Document, NodeKind, parse};
pub use error::ConvertError;
pub use render::{
    ConvertOptions, convert, convert_fragment, convert_fragment_with_options,
    convert_with_options, render_document, render_node,
};
