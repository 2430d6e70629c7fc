//! In-conversation search with a wrapping cursor.
//!
//! A [`SearchIndex`] is a snapshot for one `(conversation, query)` pair. It is
//! cheap to build and is simply rebuilt whenever either side changes.
//!
//! # Example
//!
//! ```rust
//! use chatarchive::core::{Conversation, SearchIndex};
//! use chatarchive::Message;
//!
//! let conv = Conversation::assemble("c", None, vec![
//!     Message::new(0, "1/1/24", "10:00", "Alice", "see you soon"),
//!     Message::new(1, "1/1/24", "10:01", "Bob", "ok"),
//! ]);
//!
//! let mut index = SearchIndex::build(&conv, "SOON");
//! assert_eq!(index.len(), 1);
//! assert_eq!(index.position(), 1);
//! assert_eq!(index.next(), Some(0));
//! assert_eq!(index.position(), 1);
//! ```

use std::collections::HashSet;

use regex::RegexBuilder;

use crate::core::Conversation;

/// Matching message ids plus a 1-based cursor (0 when inactive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    query: String,
    matches: Vec<usize>,
    cursor: usize,
}

impl SearchIndex {
    /// Scans the conversation for messages containing `query`,
    /// case-insensitively.
    ///
    /// A blank query yields an inactive index.
    pub fn build(conversation: &Conversation, query: &str) -> Self {
        if query.trim().is_empty() {
            return Self {
                query: query.to_string(),
                ..Self::default()
            };
        }

        let needle = query.to_lowercase();
        let matches: Vec<usize> = conversation
            .all_messages
            .iter()
            .filter(|msg| msg.text.to_lowercase().contains(&needle))
            .map(|msg| msg.id)
            .collect();

        let cursor = usize::from(!matches.is_empty());
        Self {
            query: query.to_string(),
            matches,
            cursor,
        }
    }

    /// The query this index was built for.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matching ids in conversation order.
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Returns `true` if there is at least one match to navigate.
    pub fn is_active(&self) -> bool {
        self.cursor != 0
    }

    /// 1-based cursor, 0 when inactive.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Message id under the cursor.
    pub fn current(&self) -> Option<usize> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.matches.get(i))
            .copied()
    }

    /// Advances the cursor, wrapping from last to first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<usize> {
        if self.is_active() {
            self.cursor = self.cursor % self.matches.len() + 1;
        }
        self.current()
    }

    /// Moves the cursor back, wrapping from first to last.
    pub fn prev(&mut self) -> Option<usize> {
        if self.is_active() {
            self.cursor = if self.cursor == 1 {
                self.matches.len()
            } else {
                self.cursor - 1
            };
        }
        self.current()
    }

    /// Returns `true` if the message id is one of the matches.
    pub fn is_match(&self, id: usize) -> bool {
        self.matches.binary_search(&id).is_ok()
    }

    /// All matching ids as a set, for bulk highlighting.
    pub fn match_set(&self) -> HashSet<usize> {
        self.matches.iter().copied().collect()
    }
}

/// A piece of message text, marked for the search highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight<'a> {
    /// Unmatched text
    Plain(&'a str),
    /// Case-insensitive occurrence of the query
    Match(&'a str),
}

impl<'a> Highlight<'a> {
    /// The underlying text.
    pub fn as_str(&self) -> &'a str {
        match self {
            Highlight::Plain(s) | Highlight::Match(s) => s,
        }
    }
}

/// Splits `text` around case-insensitive occurrences of `query`.
///
/// The query is taken literally. Concatenating the pieces gives back `text`.
///
/// ```rust
/// use chatarchive::core::search::{highlight, Highlight};
///
/// assert_eq!(
///     highlight("Soon, very soon", "soon"),
///     vec![
///         Highlight::Match("Soon"),
///         Highlight::Plain(", very "),
///         Highlight::Match("soon"),
///     ]
/// );
/// ```
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Highlight<'a>> {
    let pattern = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build();

    let pattern = match pattern {
        Ok(pattern) if !query.is_empty() => pattern,
        _ => return plain_only(text),
    };

    let mut pieces = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        if found.start() > last {
            pieces.push(Highlight::Plain(&text[last..found.start()]));
        }
        pieces.push(Highlight::Match(found.as_str()));
        last = found.end();
    }
    if last < text.len() {
        pieces.push(Highlight::Plain(&text[last..]));
    }
    pieces
}

fn plain_only(text: &str) -> Vec<Highlight<'_>> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Highlight::Plain(text)]
    }
}
