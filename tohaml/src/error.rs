//! Errors produced while converting a document.

use facet::Facet;

/// Errors that abort a conversion.
///
/// Only malformed templating markers inside a `class` attribute are fatal;
/// everything else in the input is handled permissively.
#[derive(Facet, Debug, Clone, PartialEq, Eq)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum ConvertError {
    /// closing marker `{marker}` at class token {position} of <{tag}> has no matching opener
    UnmatchedCloser {
        tag: String,
        marker: String,
        position: usize,
    },

    /// opening marker `{marker}` at class token {position} of <{tag}> is never closed
    UnclosedOpener {
        tag: String,
        marker: String,
        position: usize,
    },
}
