//! End-to-end conversion tests.

use facet_testhelpers::test;
use tohaml::{ConvertError, ConvertOptions, convert, convert_fragment, convert_fragment_with_options};

/// Convert a snippet and drop the trailing newline.
fn render(html: &str) -> String {
    let out = convert_fragment(html).unwrap();
    out.trim_end_matches('\n').to_string()
}

#[test]
fn test_no_tag_name_for_div_if_class_or_id_is_present() {
    assert_eq!(render(r#"<div id="foo"> </div>"#), "#foo");
    assert_eq!(render(r#"<div class="foo"> </div>"#), ".foo");
}

#[test]
fn test_multiple_class_names() {
    assert_eq!(render(r#"<div class=" foo bar baz "></div>"#), ".foo.bar.baz");
}

#[test]
fn test_attribute_maps() {
    assert_eq!(
        render(r#"<input type="text" name="login" />"#),
        r#"%input{type:"text",name:"login"}"#
    );
    assert_eq!(
        render(r#"<meta http-equiv="Content-Type" content="text/html" />"#),
        r#"%meta{http-equiv:"Content-Type",content:"text/html"}"#
    );
}

#[test]
fn test_id_with_dot_and_hash() {
    assert_eq!(render("<div id='foo.bar'></div>"), r#"%div{id:"foo.bar"}"#);
    assert_eq!(render("<div id='foo#bar'></div>"), r#"%div{id:"foo#bar"}"#);
}

#[test]
fn test_class_with_dot_and_hash() {
    assert_eq!(render("<div class=' foo.bar '></div>"), r#"%div{class:"foo.bar"}"#);
    assert_eq!(render("<div class=' foo#bar '></div>"), r#"%div{class:"foo#bar"}"#);
    assert_eq!(
        render("<div class='foo foo#bar bar foo.bar'></div>"),
        r#".foo.bar{class:"foo#bar foo.bar"}"#
    );
}

#[test]
fn test_self_closing_tag() {
    assert_eq!(render("<img />"), "%img");
}

#[test]
fn test_inline_text() {
    assert_eq!(render("<p>foo</p>"), "%p\n  foo");
}

#[test]
fn test_id_and_class() {
    assert_eq!(render("<h1 class='cls' id='id'></h1>"), "%h1#id.cls");
    assert_eq!(
        render("<div class='cls1 cls2 cls3' id='id'></div>"),
        "#id.cls1.cls2.cls3"
    );
    assert_eq!(render("<h1 class='cls' id='#id'></h1>"), r##"%h1.cls{id:"#id"}"##);
    assert_eq!(
        render("<div class='cls1 cl.s2 c#ls3' id='.id'></div>"),
        r#".cls1{class:"cl.s2 c#ls3",id:".id"}"#
    );
}

#[test]
fn test_template_markers_in_class() {
    assert_eq!(
        render("<table><tr class=\"row {% cycle 'odd' 'even' %}\"><td>x</td></tr></table>"),
        "%table\n  %tbody\n    %tr.row{class:\"{% cycle 'odd' 'even' %}\"}\n      %td\n        x"
    );
    assert_eq!(
        render("<span class='{{ state }}'>on</span>"),
        "%span{class:\"{{ state }}\"}><\n  on"
    );
}

#[test]
fn test_unbalanced_template_marker_is_an_error() {
    let err = convert_fragment("<p class='{% if x'>y</p>").unwrap_err();
    assert_eq!(
        err,
        ConvertError::UnclosedOpener {
            tag: "p".to_string(),
            marker: "{%".to_string(),
            position: 0,
        }
    );
    assert!(err.to_string().contains("never closed"));
}

#[test]
fn test_text_escaping_and_folding() {
    assert_eq!(
        render("<p>- one\n% two\n# three</p>"),
        "%p\n  &minus; one\n  &#37; two\n  %#35 three"
    );
    assert_eq!(render("<p>“Café” … Привет</p>"), "%p\n  \"Caf&eacute;\" ... Привет");
}

#[test]
fn test_inline_whitespace_markers() {
    assert_eq!(
        render("<p>Click <a href='/go'>here</a> now</p>"),
        "%p\n  Click\n  %a{href:\"/go\"}<\n    here\n  now"
    );
    assert_eq!(
        render("<p><em>a</em><strong> b </strong></p>"),
        "%p\n  %em><\n    a\n  %strong>\n    b"
    );
}

#[test]
fn test_style_block() {
    assert_eq!(
        render("<style>p { margin: 0 }</style>"),
        ":css\n  p { margin: 0 }"
    );
}

#[test]
fn test_snippet_keeps_head_level_elements_in_order() {
    assert_eq!(
        render("<title>Home</title><meta charset='utf-8'><p>x</p>"),
        "%title\n  Home\n%meta{charset:\"utf-8\"}\n%p\n  x"
    );
}

#[test]
fn test_empty_id_becomes_bare_shorthand() {
    assert_eq!(render("<div id=''>x</div>"), "#\n  x");
    assert_eq!(render("<p id=''></p>"), "%p#");
}

#[test]
fn test_wrapped_continuation_lines_are_escaped() {
    let opts = ConvertOptions::new().with_wrap_width(12);
    let out = convert_fragment_with_options("<p>aaaa bb -c #d %e</p>", &opts).unwrap();
    assert_eq!(out, "%p\n  aaaa bb\n  &minus;c\n  %#35d %e\n");
}

#[test]
fn test_full_document_starts_at_html() {
    let out = convert("<!DOCTYPE html><html><head></head><body><div class='x'>y</div></body></html>")
        .unwrap();
    assert_eq!(out, "%html\n  %head\n  %body\n    .x\n      y\n");
}

#[test]
fn test_wrap_width_accounts_for_indentation() {
    let opts = ConvertOptions::new().with_wrap_width(20);
    let out = convert_fragment_with_options(
        "<div><p>one two three four five six</p></div>",
        &opts,
    )
    .unwrap();
    assert_eq!(out, "%div\n  %p\n    one two three\n    four five six\n");
}

#[test]
fn test_empty_input() {
    assert_eq!(convert_fragment("").unwrap(), "");
    assert_eq!(convert("").unwrap(), "%html\n  %head\n  %body\n");
}
