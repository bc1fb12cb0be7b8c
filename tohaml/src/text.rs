//! Text and comment rendering.
//!
//! A text node is handled one source line at a time: non-ASCII characters
//! are folded into entities, the words are re-flowed to the available width,
//! and a reserved character opening any output line is escaped.

use std::borrow::Cow;

use crate::entities::fold_non_ascii;

/// Characters that start a tag, id or code line when they open a line, and
/// what they are written as instead.
const RESERVED_LEADING: &[(char, &str)] = &[('-', "&minus;"), ('%', "&#37;"), ('#', "%#35")];

/// Line separators recognised inside a text node.
fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// Escape the first non-whitespace character of `line` if it is reserved.
pub fn escape_reserved_first_char(line: &str) -> Cow<'_, str> {
    let body = line.trim_start();
    let Some(first) = body.chars().next() else {
        return Cow::Borrowed(line);
    };
    match RESERVED_LEADING.iter().find(|&&(reserved, _)| reserved == first) {
        Some(&(_, escaped)) => {
            let lead = &line[..line.len() - body.len()];
            let rest = &body[first.len_utf8()..];
            Cow::Owned(format!("{lead}{escaped}{rest}"))
        }
        None => Cow::Borrowed(line),
    }
}

/// Re-flow one line so every output line stays under `width` columns,
/// appending the result to `out`.
///
/// The leading whitespace of `line` (one column per character) prefixes the
/// first and every continuation line. Every output line holds at least one
/// word, so a word that does not fit gets a line of its own. A line without
/// words produces nothing. `lead_word` rewrites the word that opens an output
/// line; its result is what gets measured.
fn flow_line<'w>(
    line: &'w str,
    width: usize,
    lead_word: impl Fn(&'w str) -> Cow<'w, str>,
    out: &mut Vec<String>,
) {
    let body = line.trim_start();
    let lead = line[..line.len() - body.len()].chars().count();

    let mut current = String::new();
    let mut columns = 0;
    for word in body.split_whitespace() {
        if !current.is_empty() && columns + 1 + word.chars().count() >= width {
            out.push(std::mem::take(&mut current));
        }
        if current.is_empty() {
            let word = lead_word(word);
            current.extend(std::iter::repeat_n(' ', lead));
            current.push_str(&word);
            columns = lead + word.chars().count();
        } else {
            current.push(' ');
            current.push_str(word);
            columns += 1 + word.chars().count();
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
}

/// Render a raw text or comment node into output lines (without indentation).
///
/// `width` is the room left after indentation. Every output line, wrapped
/// continuations included, has a reserved first character escaped.
/// Whitespace-only input yields no lines at all.
pub fn render_text(raw: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for line in raw.split(is_line_break) {
        let folded = fold_non_ascii(line);
        flow_line(&folded, width, escape_reserved_first_char, &mut lines);
    }
    lines
}
