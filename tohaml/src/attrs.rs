//! Id/class shorthand extraction.
//!
//! `#id` and `.class` shorthand cannot carry tokens that contain `#`, `.` or
//! templating markers without becoming ambiguous. Safe tokens are turned into
//! shorthand; everything else stays behind in an explicit attribute map. Both
//! can show up on the same element.

use tendril::StrTendril;

use crate::debug;
use crate::dom::{AttrValue, Attributes, Tokens, split_tokens};
use crate::error::ConvertError;

/// Substrings that make an id or class token unusable as shorthand.
const RESERVED_MARKERS: &[&str] = &["#", ".", "{{", "{%"];

/// Shorthand prefix plus the attributes it could not absorb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shorthand {
    /// `#id` followed by `.class` fragments, possibly empty
    pub prefix: String,
    /// Attributes left for the explicit `{...}` map, in source order
    pub remaining: Attributes,
}

/// Returns true if `token` contains a reserved marker.
pub fn is_reserved(token: &str) -> bool {
    RESERVED_MARKERS.iter().any(|marker| token.contains(marker))
}

/// Split `attrs` into shorthand and remaining attributes.
///
/// `attrs` itself is left untouched; the id/class extraction runs on a copy.
pub fn classify(tag: &str, attrs: &Attributes) -> Result<Shorthand, ConvertError> {
    let mut remaining = attrs.clone();
    let mut prefix = element_id(&mut remaining);
    prefix.push_str(&element_class(tag, &mut remaining)?);
    Ok(Shorthand { prefix, remaining })
}

/// Take a shorthand-safe `id` out of `attrs` and return it as `#value`.
///
/// Ids containing a reserved marker stay in `attrs` and the result is empty.
/// An empty id has no marker, so it is taken and yields a bare `#`.
pub fn element_id(attrs: &mut Attributes) -> String {
    let shorthand = match attrs.get("id") {
        Some(value) => {
            let id = value.joined();
            if is_reserved(&id) {
                return String::new();
            }
            format!("#{id}")
        }
        None => return String::new(),
    };
    attrs.shift_remove("id");
    shorthand
}

/// Turn the plain tokens of `class` into `.token` shorthand.
///
/// Templating fragments are folded first. Reserved tokens replace the `class`
/// entry (keeping its position); when there are none the entry is removed.
pub fn element_class(tag: &str, attrs: &mut Attributes) -> Result<String, ConvertError> {
    let Some(class) = attrs.get("class") else {
        return Ok(String::new());
    };
    let tokens = fold_template_tokens(tag, &class.tokens())?;

    let mut shorthand = String::new();
    let mut reserved = Tokens::new();
    for token in tokens {
        if is_reserved(&token) {
            reserved.push(token);
        } else if !token.is_empty() {
            shorthand.push('.');
            shorthand.push_str(&token);
        }
    }

    if reserved.is_empty() {
        attrs.shift_remove("class");
    } else if let Some(value) = attrs.get_mut("class") {
        *value = AttrValue::Tokens(reserved);
    }
    Ok(shorthand)
}

/// The closer that ends a fragment opened by `token`, if `token` is an opener.
fn closer_for(token: &str) -> Option<&'static str> {
    match token {
        "{%" => Some("%}"),
        "{{" => Some("}}"),
        _ => None,
    }
}

fn is_closer(token: &str) -> bool {
    matches!(token, "%}" | "}}")
}

/// Merge every templating fragment spread over several class tokens into one.
///
/// `{% cycle 'odd' 'even' %}` arrives as five tokens and leaves as one. Only
/// tokens that are exactly a marker count; `{{x}}` is already a single token.
/// Nested fragments fold into their outermost fragment.
pub fn fold_template_tokens(tag: &str, tokens: &[StrTendril]) -> Result<Tokens, ConvertError> {
    let mut folded = Tokens::new();
    // (position, expected closer) for every open fragment
    let mut open: Vec<(usize, &'static str)> = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        let text: &str = token;
        if let Some(closer) = closer_for(text) {
            open.push((position, closer));
            continue;
        }

        if is_closer(text) {
            let start = match open.pop() {
                Some((start, expected)) if expected == text => start,
                _ => {
                    return Err(ConvertError::UnmatchedCloser {
                        tag: tag.to_string(),
                        marker: text.to_string(),
                        position,
                    });
                }
            };
            // The opener popped last is the outermost one
            if open.is_empty() {
                let fragment = tokens[start..=position]
                    .iter()
                    .map(|t| &**t)
                    .collect::<Vec<_>>()
                    .join(" ");
                debug!("folded class tokens {start}..={position} of <{tag}> into {fragment:?}");
                folded.push(StrTendril::from(fragment));
            }
            continue;
        }

        if open.is_empty() {
            folded.push(token.clone());
        }
    }

    if let Some(&(position, _)) = open.first() {
        return Err(ConvertError::UnclosedOpener {
            tag: tag.to_string(),
            marker: tokens[position].to_string(),
            position,
        });
    }

    Ok(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|&(key, value)| {
                let value = if key == "class" {
                    AttrValue::split(&StrTendril::from(value))
                } else {
                    AttrValue::from(value)
                };
                (key.to_string(), value)
            })
            .collect()
    }

    fn tokens(text: &str) -> Tokens {
        split_tokens(&StrTendril::from(text))
    }

    fn strs(tokens: &Tokens) -> Vec<&str> {
        tokens.iter().map(|t| &**t).collect()
    }

    #[test]
    fn test_reserved_markers() {
        assert!(is_reserved("foo.bar"));
        assert!(is_reserved("#id"));
        assert!(is_reserved("{{ var }}"));
        assert!(is_reserved("{%"));
        assert!(!is_reserved("foo-bar_baz"));
        assert!(!is_reserved("{foo}"));
        assert!(!is_reserved("%}"));
    }

    #[test]
    fn test_clean_id_becomes_shorthand() {
        let mut map = attrs(&[("id", "foo"), ("title", "t")]);
        assert_eq!(element_id(&mut map), "#foo");
        assert!(!map.contains_key("id"));
        assert!(map.contains_key("title"));
    }

    #[test]
    fn test_reserved_id_stays() {
        for id in ["foo.bar", "foo#bar", "#id", "{{ id }}", "{%x"] {
            let mut map = attrs(&[("id", id)]);
            assert_eq!(element_id(&mut map), "");
            assert_eq!(map["id"], AttrValue::from(id));
        }
    }

    #[test]
    fn test_empty_id_is_taken() {
        let mut map = attrs(&[("id", ""), ("title", "t")]);
        assert_eq!(element_id(&mut map), "#");
        assert!(!map.contains_key("id"));
        assert!(map.contains_key("title"));
    }

    #[test]
    fn test_missing_attributes_are_noops() {
        let mut map = attrs(&[("href", "/")]);
        assert_eq!(element_id(&mut map), "");
        assert_eq!(element_class("a", &mut map), Ok(String::new()));
        assert_eq!(map, attrs(&[("href", "/")]));
    }

    #[test]
    fn test_plain_classes_in_order() {
        let mut map = attrs(&[("class", " foo bar baz ")]);
        assert_eq!(element_class("div", &mut map).unwrap(), ".foo.bar.baz");
        assert!(map.is_empty());
    }

    #[test]
    fn test_reserved_classes_stay_behind() {
        let mut map = attrs(&[("class", "foo foo#bar bar foo.bar"), ("id", "x")]);
        assert_eq!(element_class("div", &mut map).unwrap(), ".foo.bar");
        assert_eq!(map["class"].joined(), "foo#bar foo.bar");
        // class keeps its position ahead of id
        assert_eq!(map.get_index_of("class"), Some(0));
    }

    #[test]
    fn test_fold_cycle_tag() {
        let folded = fold_template_tokens("tr", &tokens("{% cycle 'odd' 'even' %}")).unwrap();
        assert_eq!(strs(&folded), ["{% cycle 'odd' 'even' %}"]);
    }

    #[test]
    fn test_fold_keeps_surrounding_tokens() {
        let folded =
            fold_template_tokens("li", &tokens("item {{ state }} wide {% if x %}")).unwrap();
        assert_eq!(strs(&folded), ["item", "{{ state }}", "wide", "{% if x %}"]);
    }

    #[test]
    fn test_fold_nested_fragments_into_outermost() {
        let folded = fold_template_tokens("p", &tokens("a {% if {{ x }} %} b")).unwrap();
        assert_eq!(strs(&folded), ["a", "{% if {{ x }} %}", "b"]);
    }

    #[test]
    fn test_fold_without_markers_is_identity() {
        let input = tokens("one two {{x}}");
        let folded = fold_template_tokens("p", &input).unwrap();
        assert_eq!(folded, input);
    }

    #[test]
    fn test_unclosed_opener_is_fatal() {
        let err = fold_template_tokens("tr", &tokens("a {% cycle b")).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnclosedOpener {
                tag: "tr".to_string(),
                marker: "{%".to_string(),
                position: 1,
            }
        );
    }

    #[test]
    fn test_stray_closer_is_fatal() {
        let err = fold_template_tokens("tr", &tokens("a %}")).unwrap_err();
        assert!(matches!(err, ConvertError::UnmatchedCloser { position: 1, .. }));
    }

    #[test]
    fn test_mismatched_closer_is_fatal() {
        let err = fold_template_tokens("tr", &tokens("{% x }}")).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnmatchedCloser { ref marker, position: 2, .. } if marker == "}}"
        ));
    }

    #[test]
    fn test_folded_fragment_stays_as_attribute() {
        let mut map = attrs(&[("class", "row {% cycle 'odd' 'even' %}")]);
        assert_eq!(element_class("tr", &mut map).unwrap(), ".row");
        assert_eq!(map["class"].joined(), "{% cycle 'odd' 'even' %}");
    }

    #[test]
    fn test_classify_leaves_input_untouched() {
        let map = attrs(&[("class", "cls1 cl.s2 c#ls3"), ("id", ".id"), ("lang", "en")]);
        let shorthand = classify("div", &map).unwrap();

        assert_eq!(shorthand.prefix, ".cls1");
        let keys: Vec<&str> = shorthand.remaining.keys().map(String::as_str).collect();
        assert_eq!(keys, ["class", "id", "lang"]);
        assert_eq!(shorthand.remaining["class"].joined(), "cl.s2 c#ls3");

        assert_eq!(map["class"].joined(), "cls1 cl.s2 c#ls3");
    }

    #[test]
    fn test_classify_id_then_class() {
        let map = attrs(&[("class", "cls"), ("id", "id")]);
        let shorthand = classify("h1", &map).unwrap();
        assert_eq!(shorthand.prefix, "#id.cls");
        assert!(shorthand.remaining.is_empty());
    }
}
