//! URL detection for message bodies.

use std::sync::LazyLock;

use regex::Regex;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("url pattern is valid"));

/// A run of message text, either plain or a hyperlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSegment<'a> {
    /// Ordinary text
    Plain(&'a str),
    /// An `http://` or `https://` URL, up to the next whitespace
    Link(&'a str),
}

impl<'a> TextSegment<'a> {
    /// The underlying text.
    pub fn as_str(&self) -> &'a str {
        match self {
            TextSegment::Plain(s) | TextSegment::Link(s) => s,
        }
    }

    /// Returns `true` for links.
    pub fn is_link(&self) -> bool {
        matches!(self, TextSegment::Link(_))
    }
}

/// Splits text into plain runs and links. Concatenating the segments gives
/// back the input.
///
/// ```rust
/// use chatarchive::core::links::{linkify, TextSegment};
///
/// assert_eq!(
///     linkify("docs at https://example.com/a?b=1 ok"),
///     vec![
///         TextSegment::Plain("docs at "),
///         TextSegment::Link("https://example.com/a?b=1"),
///         TextSegment::Plain(" ok"),
///     ]
/// );
/// ```
pub fn linkify(text: &str) -> Vec<TextSegment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for url in URL.find_iter(text) {
        if url.start() > last {
            segments.push(TextSegment::Plain(&text[last..url.start()]));
        }
        segments.push(TextSegment::Link(url.as_str()));
        last = url.end();
    }
    if last < text.len() {
        segments.push(TextSegment::Plain(&text[last..]));
    }

    segments
}

/// Returns `true` if the text contains at least one link.
pub fn has_links(text: &str) -> bool {
    URL.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(linkify("no links here"), vec![TextSegment::Plain("no links here")]);
        assert!(linkify("").is_empty());
        assert!(!has_links("ftp://nope"));
    }

    #[test]
    fn test_multiple_links() {
        let segments = linkify("http://a.io\nand https://b.io");
        assert_eq!(
            segments,
            vec![
                TextSegment::Link("http://a.io"),
                TextSegment::Plain("\nand "),
                TextSegment::Link("https://b.io"),
            ]
        );
        assert_eq!(segments.iter().filter(|s| s.is_link()).count(), 2);
    }

    #[test]
    fn test_roundtrip_concat() {
        let text = "see https://x.y/z, then (http://q.r)";
        let joined: String = linkify(text).iter().map(TextSegment::as_str).collect();
        assert_eq!(joined, text);
    }
}
