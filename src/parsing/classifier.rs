//! Header-line recognition for WhatsApp transcripts.
//!
//! Two timestamp dialects are recognized, always tried in this order:
//!
//! - [`Dialect::Loose`]: `12/05/23, 10:30 - Alice: Hello` (an optional leading
//!   `[` is tolerated, the closing bracket may be missing)
//! - [`Dialect::Bracketed`]: `[01/02/2024, 9:15:30 PM] Bob: On my way`
//!   (strict time with a mandatory AM/PM marker)
//!
//! Anything that doesn't match either is a continuation of the previous
//! message or is ignored, depending on [`ContinuationPolicy`].

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::ContinuationPolicy;

// 12/05/23, 10:30 - Alice: Hello
static LOOSE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[?([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}),\s(.*?)[\]|\s]-\s(.*?):\s(.*)$")
        .expect("loose header pattern is valid")
});

// [01/02/2024, 9:15:30 PM] Bob: On my way
static BRACKETED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\[([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4}),\s*([0-9]{1,2}:[0-9]{1,2}(?::[0-9]{1,2})?\s?[APap][Mm])\]\s(.+?):\s([\s\S]*)$",
    )
    .expect("bracketed header pattern is valid")
});

// A line that starts like a bracketed header but failed both patterns.
static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4},").expect("date prefix pattern is valid")
});

static FILE_ATTACHED_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s?\(file attached\)$").expect("file attached pattern is valid")
});

/// Timestamp dialect of a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `D/M/Y, time - Sender: text`, optional leading `[`.
    Loose,
    /// `[D/M/Y, H:MM[:SS] AM] Sender: text`.
    Bracketed,
}

impl Dialect {
    /// All dialects, in the order they are tried.
    pub fn all() -> &'static [Dialect] {
        &[Dialect::Loose, Dialect::Bracketed]
    }

    fn regex(self) -> &'static Regex {
        match self {
            Dialect::Loose => &LOOSE_HEADER,
            Dialect::Bracketed => &BRACKETED_HEADER,
        }
    }

    /// Returns `true` if the line is a header under this dialect alone.
    pub fn matches(self, line: &str) -> bool {
        self.regex().is_match(line)
    }

    /// Renders captured fields back into this dialect's canonical layout.
    ///
    /// The output re-matches the same dialect for any fields this dialect
    /// captured.
    pub fn render(self, date: &str, time: &str, sender: &str, text: &str) -> String {
        match self {
            Dialect::Loose => format!("{date}, {time} - {sender}: {text}"),
            Dialect::Bracketed => format!("[{date}, {time}] {sender}: {text}"),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Loose => write!(f, "loose"),
            Dialect::Bracketed => write!(f, "bracketed"),
        }
    }
}

/// Fields captured from a header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch<'a> {
    /// Which dialect matched.
    pub dialect: Dialect,
    /// Raw date token.
    pub date: &'a str,
    /// Raw time token.
    pub time: &'a str,
    /// Sender, exactly as captured.
    pub sender: &'a str,
    /// Message text, trimmed and with `(file attached)` removed if configured.
    pub text: String,
}

impl HeaderMatch<'_> {
    /// Reassembles the header in its dialect's canonical layout.
    pub fn render(&self) -> String {
        self.dialect
            .render(self.date, self.time, self.sender, &self.text)
    }
}

/// Classification of a single raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Starts a new message.
    Header(HeaderMatch<'a>),
    /// Belongs to the message in progress; holds the trimmed line.
    Continuation(&'a str),
    /// Dropped.
    Ignored,
}

/// Classifies raw transcript lines.
///
/// # Example
///
/// ```rust
/// use chatarchive::parsing::{Dialect, LineClass, LineClassifier};
///
/// let classifier = LineClassifier::new();
/// match classifier.classify("12/05/23, 10:30 - Alice: Hello there", false) {
///     LineClass::Header(h) => {
///         assert_eq!(h.dialect, Dialect::Loose);
///         assert_eq!(h.sender, "Alice");
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier {
    policy: ContinuationPolicy,
    strip_file_attached: bool,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    /// Creates a classifier with the loose continuation policy.
    pub fn new() -> Self {
        Self {
            policy: ContinuationPolicy::Loose,
            strip_file_attached: true,
        }
    }

    /// Creates a classifier with an explicit policy.
    pub fn with_policy(policy: ContinuationPolicy, strip_file_attached: bool) -> Self {
        Self {
            policy,
            strip_file_attached,
        }
    }

    /// Returns the continuation policy.
    pub fn policy(&self) -> ContinuationPolicy {
        self.policy
    }

    /// Tries both dialects in order.
    pub fn match_header<'a>(&self, line: &'a str) -> Option<HeaderMatch<'a>> {
        Dialect::all().iter().find_map(|&dialect| {
            dialect
                .regex()
                .captures(line)
                .map(|caps| self.header_from(dialect, &caps))
        })
    }

    /// Classifies a line given whether a message is currently in progress.
    pub fn classify<'a>(&self, line: &'a str, in_progress: bool) -> LineClass<'a> {
        if let Some(header) = self.match_header(line) {
            return LineClass::Header(header);
        }

        if !in_progress {
            return LineClass::Ignored;
        }

        if line.starts_with(char::is_whitespace) {
            return LineClass::Continuation(line.trim());
        }

        match self.policy {
            ContinuationPolicy::Loose if !DATE_PREFIX.is_match(line) => {
                LineClass::Continuation(line.trim())
            }
            _ => LineClass::Ignored,
        }
    }

    fn header_from<'a>(&self, dialect: Dialect, caps: &Captures<'a>) -> HeaderMatch<'a> {
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        HeaderMatch {
            dialect,
            date: group(1),
            time: group(2),
            sender: group(3),
            text: self.clean_text(group(4)),
        }
    }

    fn clean_text(&self, text: &str) -> String {
        if self.strip_file_attached {
            FILE_ATTACHED_SUFFIX.replace(text, "").trim().to_string()
        } else {
            text.trim().to_string()
        }
    }
}

/// Returns `true` if the line starts like a bracketed header (`[D/M/Y,`).
pub fn has_date_prefix(line: &str) -> bool {
    DATE_PREFIX.is_match(line)
}
