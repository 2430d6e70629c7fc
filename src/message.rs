//! The message record produced by the transcript parser.
//!
//! A [`Message`] is one utterance from a WhatsApp transcript. The raw `date`
//! and `time` tokens are kept exactly as they appeared in the header line;
//! `timestamp` is a best-effort epoch value derived from them and may be
//! missing when the tokens don't form a real date.
//!
//! # Examples
//!
//! ```
//! use chatarchive::Message;
//!
//! let msg = Message::new(0, "12/05/23", "10:30", "Alice", "Hello there");
//! assert_eq!(msg.sender(), "Alice");
//! assert_eq!(msg.text(), "Hello there");
//! assert!(msg.timestamp().is_none());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One parsed chat message.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `id` | `usize` | Dense, 0-based position within its conversation |
/// | `date` | `String` | Raw date token, e.g. `12/05/23` |
/// | `time` | `String` | Raw time token, e.g. `10:30` or `9:15:30 PM` |
/// | `sender` | `String` | Display name, case-sensitive identity key |
/// | `text` | `String` | Body; continuation lines joined with `\n` |
/// | `timestamp` | `Option<i64>` | Epoch milliseconds, `None` if unparsable |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Position within the conversation, assigned in parse order.
    pub id: usize,

    /// Raw date token as captured from the header line.
    pub date: String,

    /// Raw time token as captured from the header line.
    pub time: String,

    /// Sender display name.
    pub sender: String,

    /// Message body.
    ///
    /// Trailing `(file attached)` markers are already stripped.
    pub text: String,

    /// Epoch milliseconds computed from `date` and `time`.
    ///
    /// Advisory only: used for display and sorting hints, never for
    /// correctness.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl Message {
    /// Creates a message without a timestamp.
    pub fn new(
        id: usize,
        date: impl Into<String>,
        time: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date: date.into(),
            time: time.into(),
            sender: sender.into(),
            text: text.into(),
            timestamp: None,
        }
    }

    /// Builder method to set the epoch-millisecond timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, millis: i64) -> Self {
        self.timestamp = Some(millis);
        self
    }

    /// Builder method to set an optional timestamp.
    #[must_use]
    pub fn with_timestamp_opt(mut self, millis: Option<i64>) -> Self {
        self.timestamp = millis;
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the message id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the raw date token.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Returns the raw time token.
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the epoch-millisecond timestamp, if it could be computed.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Returns the timestamp as a UTC datetime, if available.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::from_timestamp_millis)
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Appends a continuation line to the text.
    pub fn push_line(&mut self, line: &str) {
        self.text.push('\n');
        self.text.push_str(line);
    }

    /// Returns `true` if the text spans more than one line.
    pub fn is_multiline(&self) -> bool {
        self.text.contains('\n')
    }

    /// Renders the time token for display in 12-hour form.
    ///
    /// A 24-hour `H:MM` or `H:MM:SS` token becomes `h:MM AM/PM` (seconds are
    /// dropped). Tokens that already carry a meridiem, or that don't look
    /// like a time at all, are returned unchanged.
    ///
    /// ```
    /// use chatarchive::Message;
    ///
    /// let msg = Message::new(0, "12/05/23", "21:05", "Alice", "hi");
    /// assert_eq!(msg.display_time(), "9:05 PM");
    ///
    /// let msg = Message::new(0, "1/2/24", "9:15:30 PM", "Bob", "hi");
    /// assert_eq!(msg.display_time(), "9:15:30 PM");
    /// ```
    pub fn display_time(&self) -> String {
        to_twelve_hour(&self.time).unwrap_or_else(|| self.time.clone())
    }
}

fn to_twelve_hour(time: &str) -> Option<String> {
    let lower = time.to_ascii_lowercase();
    if lower.contains("am") || lower.contains("pm") {
        return None;
    }

    let mut parts = time.trim().split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minutes = parts.next()?;
    if hour > 23 || minutes.is_empty() || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    Some(format!("{hour12}:{minutes} {meridiem}"))
}
