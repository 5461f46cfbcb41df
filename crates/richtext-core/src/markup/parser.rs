//! Lenient tag tokenizer for the markup subset.
//!
//! Produces a flat stream of [`MarkupEvent`]s. Nothing here fails: a `<` that
//! does not start a well-formed tag is emitted as text, comments and
//! declarations are skipped, and character references in text and attribute
//! values are decoded.

use std::borrow::Cow;

use smol_str::SmolStr;

use super::escape::unescape;

/// A single token of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    /// Opening tag. Names are lowercased.
    Start {
        name: SmolStr,
        attrs: Vec<(SmolStr, String)>,
        self_closing: bool,
    },
    /// Closing tag. Names are lowercased.
    End { name: SmolStr },
    /// Text with character references decoded.
    Text(Cow<'a, str>),
}

impl MarkupEvent<'_> {
    /// Look up an attribute on a start tag.
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            MarkupEvent::Start { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Iterator over the events of a markup string.
pub struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Try to read a tag at `start` (which holds `<`).
    ///
    /// Returns the event (None for skipped comments/declarations) and the
    /// byte position after the tag, or None if this is not a tag at all.
    fn read_tag(&self, start: usize) -> Option<(Option<MarkupEvent<'a>>, usize)> {
        let rest = &self.src[start..];
        let bytes = rest.as_bytes();

        if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .map(|i| start + 4 + i + 3)
                .unwrap_or(self.src.len());
            return Some((None, end));
        }
        if bytes.len() > 1 && (bytes[1] == b'!' || bytes[1] == b'?') {
            let end = rest.find('>')?;
            return Some((None, start + end + 1));
        }

        let closing = bytes.get(1) == Some(&b'/');
        let name_start = if closing { 2 } else { 1 };
        if !bytes.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
            return None;
        }
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
            .count();
        let name = SmolStr::new(rest[name_start..name_start + name_len].to_ascii_lowercase());
        let mut i = name_start + name_len;

        if closing {
            let end = rest[i..].find('>')?;
            return Some((Some(MarkupEvent::End { name }), start + i + end + 1));
        }

        let mut attrs = Vec::new();
        loop {
            while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
                i += 1;
            }
            match bytes.get(i)? {
                b'>' => {
                    let event = MarkupEvent::Start {
                        name,
                        attrs,
                        self_closing: false,
                    };
                    return Some((Some(event), start + i + 1));
                }
                b'/' if bytes.get(i + 1) == Some(&b'>') => {
                    let event = MarkupEvent::Start {
                        name,
                        attrs,
                        self_closing: true,
                    };
                    return Some((Some(event), start + i + 2));
                }
                b'/' => {
                    i += 1;
                    continue;
                }
                _ => {}
            }

            let key_len = rest[i..]
                .find(|c: char| c.is_ascii_whitespace() || matches!(c, '=' | '>' | '/'))
                .unwrap_or(rest.len() - i);
            if key_len == 0 {
                // Stray `=`.
                i += 1;
                continue;
            }
            let key = SmolStr::new(rest[i..i + key_len].to_ascii_lowercase());
            i += key_len;
            while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
                i += 1;
            }
            if bytes.get(i) != Some(&b'=') {
                attrs.push((key, String::new()));
                continue;
            }
            i += 1;
            while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
                i += 1;
            }
            let value = match bytes.get(i)? {
                quote @ (b'"' | b'\'') => {
                    let close = rest[i + 1..].find(*quote as char)?;
                    let raw = &rest[i + 1..i + 1 + close];
                    i += close + 2;
                    raw
                }
                _ => {
                    let len = rest[i..]
                        .find(|c: char| c.is_ascii_whitespace() || c == '>')
                        .unwrap_or(rest.len() - i);
                    let raw = &rest[i..i + len];
                    i += len;
                    raw
                }
            };
            attrs.push((key, unescape(value).into_owned()));
        }
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = MarkupEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            if rest.starts_with('<') {
                match self.read_tag(self.pos) {
                    Some((event, next)) => {
                        self.pos = next;
                        match event {
                            Some(event) => return Some(event),
                            None => continue,
                        }
                    }
                    None => {
                        // Not a tag: the `<` is literal text.
                        let text_end = rest[1..].find('<').map(|i| i + 1).unwrap_or(rest.len());
                        self.pos += text_end;
                        return Some(MarkupEvent::Text(unescape(&rest[..text_end])));
                    }
                }
            }
            let text_end = rest.find('<').unwrap_or(rest.len());
            self.pos += text_end;
            return Some(MarkupEvent::Text(unescape(&rest[..text_end])));
        }
        None
    }
}
