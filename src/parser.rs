//! WhatsApp transcript parser.
//!
//! Turns the full text of one exported transcript into an ordered list of
//! [`Message`]s. The parse is a single fold over the lines, carrying the
//! finished messages plus the one still accepting continuation lines:
//!
//! ```text
//! header     -> finish the open message, open a new one (next id)
//! continuation -> append to the open message
//! ignored    -> drop
//! end        -> finish the open message
//! ```
//!
//! Parsing never fails on transcript content. Unrecognized lines are dropped
//! and unparsable timestamps are kept as `None`.
//!
//! # Example
//!
//! ```rust
//! use chatarchive::parser::TranscriptParser;
//!
//! let transcript = "\
//! WhatsApp Chat with Bob
//! 12/05/23, 10:30 - Alice: Hello there
//!    see you soon
//! [01/02/2024, 9:15:30 PM] Bob: On my way";
//!
//! let parsed = TranscriptParser::new().parse_str(transcript);
//! assert_eq!(parsed.title.as_deref(), Some("Bob"));
//! assert_eq!(parsed.messages.len(), 2);
//! assert_eq!(parsed.messages[0].text, "Hello there\nsee you soon");
//! assert_eq!(parsed.messages[1].id, 1);
//! ```

use std::fs;
use std::path::Path;

use crate::Message;
use crate::config::ParserConfig;
use crate::error::ChatArchiveError;
use crate::parsing::{HeaderMatch, LineClass, LineClassifier, parse_timestamp};

/// Result of parsing one transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTranscript {
    /// Display name from a leading title line, if there was one.
    pub title: Option<String>,
    /// Messages in transcript order with dense 0-based ids.
    pub messages: Vec<Message>,
}

impl ParsedTranscript {
    /// Returns `true` if no header line was recognized.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Parser for WhatsApp TXT transcripts.
///
/// Stateless apart from its configuration, so one parser can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser {
    config: ParserConfig,
}

impl TranscriptParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn classifier(&self) -> LineClassifier {
        LineClassifier::with_policy(self.config.continuation, self.config.strip_file_attached)
    }

    /// Reads and parses a transcript file.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn parse(&self, path: &Path) -> Result<ParsedTranscript, ChatArchiveError> {
        let bytes = fs::read(path)?;
        Ok(self.parse_str(&String::from_utf8_lossy(&bytes)))
    }

    /// Parses transcript content from a string.
    pub fn parse_str(&self, content: &str) -> ParsedTranscript {
        let mut lines = split_lines(content).peekable();

        let sentinel = self.config.title_sentinel.as_str();
        let title = match lines.peek() {
            Some(first) if !sentinel.is_empty() && first.contains(sentinel) => {
                let title = title_from(first, sentinel);
                lines.next();
                Some(title)
            }
            _ => None,
        };

        ParsedTranscript {
            title,
            messages: self.parse_lines(lines),
        }
    }

    /// Parses already-split lines, without title detection.
    ///
    /// Empty lines are skipped here too, so slices taken straight from a
    /// transcript behave the same as [`parse_str`](Self::parse_str).
    pub fn parse_lines<'a, I>(&self, lines: I) -> Vec<Message>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classifier = self.classifier();
        lines
            .into_iter()
            .filter(|line| !line.is_empty())
            .fold(Fold::default(), |acc, line| acc.step(&classifier, line))
            .finish()
    }
}

/// Accumulator for the line fold.
#[derive(Debug, Default)]
struct Fold {
    done: Vec<Message>,
    open: Option<Message>,
}

impl Fold {
    fn step(mut self, classifier: &LineClassifier, line: &str) -> Self {
        match classifier.classify(line, self.open.is_some()) {
            LineClass::Header(header) => {
                if let Some(finished) = self.open.take() {
                    self.done.push(finished);
                }
                self.open = Some(into_message(self.done.len(), header));
            }
            LineClass::Continuation(rest) => {
                if let Some(open) = self.open.as_mut() {
                    open.push_line(rest);
                }
            }
            LineClass::Ignored => {
                log::debug!("dropping unrecognized line: {line:?}");
            }
        }
        self
    }

    fn finish(mut self) -> Vec<Message> {
        if let Some(last) = self.open.take() {
            self.done.push(last);
        }
        self.done
    }
}

fn into_message(id: usize, header: HeaderMatch<'_>) -> Message {
    let timestamp = parse_timestamp(header.date, header.time);
    if timestamp.is_none() {
        log::debug!(
            "message {id}: unparsable timestamp {:?} {:?}",
            header.date,
            header.time
        );
    }

    Message::new(id, header.date, header.time, header.sender, header.text)
        .with_timestamp_opt(timestamp)
}

/// Splits on line feeds, dropping a trailing carriage return and empty lines.
fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
}

fn title_from(line: &str, sentinel: &str) -> String {
    line.find(sentinel)
        .map(|at| line[at + sentinel.len()..].trim().to_string())
        .unwrap_or_default()
}
