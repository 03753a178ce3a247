//! HTML escaping used by the render path
//!
//! Text and attribute values get the same treatment: `&`, `<`, `>` and `"` become entities.

/// Append `text` to `out`, entity-escaped.
pub(crate) fn push_escaped(out: &mut String, text: &str) {
    html_escape::encode_double_quoted_attribute_to_string(text, out);
}

/// Entity-escape `text`.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}
