//! Character escaping for markup text and attribute values.

use std::borrow::Cow;

/// Escape text content: `&`, `<`, `>`.
pub fn escape_text(out: &mut String, s: &str) {
    html_escape::encode_text_to_string(s, out);
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(out: &mut String, s: &str) {
    html_escape::encode_double_quoted_attribute_to_string(s, out);
}

/// Decode named and numeric character references. Unknown references stay literal.
pub fn unescape(s: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(s)
}
