//! Primary-user resolution: which sender is "me".
//!
//! Two entry points, both pure:
//!
//! - explicit selection of a 1-based index into a sender list
//!   ([`select_from_input`], [`select_by_index`])
//! - automatic fallback to the most frequent sender ([`auto_detect`])
//!
//! The interactive part is injected through [`UserPrompt`], so callers decide
//! whether the answer comes from stdin, a dialog or a test closure.
//!
//! # Example
//!
//! ```rust
//! use chatarchive::core::primary_user::{select_from_input, SelectionError};
//!
//! let senders = vec!["Alice".to_string(), "Bob".to_string()];
//! assert_eq!(select_from_input(&senders, "2").unwrap(), "Bob");
//! assert!(matches!(
//!     select_from_input(&senders, "7"),
//!     Err(SelectionError::OutOfRange { .. })
//! ));
//! ```

use std::fmt::Write as _;

use thiserror::Error;

use crate::Message;
use crate::core::Conversation;

/// Why an explicit selection was rejected.
///
/// Every variant means the same thing to the caller: fall back to
/// [`auto_detect`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The answer did not start with a number.
    #[error("'{input}' is not a number")]
    NonNumeric {
        /// Raw answer
        input: String,
    },

    /// The number was outside `1..=count`.
    #[error("{index} is not between 1 and {count}")]
    OutOfRange {
        /// Parsed 1-based index
        index: i64,
        /// Number of candidates
        count: usize,
    },

    /// The prompt was dismissed.
    #[error("selection cancelled")]
    Cancelled,

    /// No candidates to choose from.
    #[error("no senders to choose from")]
    NoCandidates,

    /// The conversation to choose from doesn't exist.
    #[error("unknown conversation '{0}'")]
    UnknownConversation(String),
}

/// Source of an answer to the sender prompt.
///
/// Returns `None` when the user cancels.
pub trait UserPrompt {
    /// Shows `message` and returns the raw answer.
    fn prompt(&self, message: &str) -> Option<String>;
}

impl<F> UserPrompt for F
where
    F: Fn(&str) -> Option<String>,
{
    fn prompt(&self, message: &str) -> Option<String> {
        self(message)
    }
}

/// Builds the numbered sender list shown to the user.
///
/// ```rust
/// use chatarchive::core::primary_user::format_sender_prompt;
///
/// let text = format_sender_prompt(&["Alice".to_string(), "Bob".to_string()]);
/// assert!(text.ends_with("1. Alice\n2. Bob\n"));
/// ```
pub fn format_sender_prompt<S: AsRef<str>>(senders: &[S]) -> String {
    let mut text =
        String::from("Select your username from the list by entering the corresponding number:\n\n");
    for (i, sender) in senders.iter().enumerate() {
        let _ = writeln!(text, "{}. {}", i + 1, sender.as_ref());
    }
    text
}

/// Reads a leading integer the way form inputs usually do.
///
/// Leading whitespace and a sign are accepted, anything after the digits is
/// ignored: `" 2"` and `"2x"` both give 2.
pub fn parse_selection(input: &str) -> Result<i64, SelectionError> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];

    if digits.is_empty() {
        return Err(SelectionError::NonNumeric {
            input: input.to_string(),
        });
    }

    // Absurdly long inputs saturate and then fail the range check.
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Ok(if negative { -value } else { value })
}

/// Picks the sender at a 1-based index.
pub fn select_by_index<S: AsRef<str>>(senders: &[S], index: i64) -> Result<String, SelectionError> {
    if senders.is_empty() {
        return Err(SelectionError::NoCandidates);
    }

    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| senders.get(i))
        .map(|sender| sender.as_ref().to_string())
        .ok_or(SelectionError::OutOfRange {
            index,
            count: senders.len(),
        })
}

/// Parses a raw answer and picks the matching sender.
pub fn select_from_input<S: AsRef<str>>(
    senders: &[S],
    input: &str,
) -> Result<String, SelectionError> {
    select_by_index(senders, parse_selection(input)?)
}

/// Asks `prompt` to choose among `senders`.
pub fn prompt_for_sender<S: AsRef<str>>(
    senders: &[S],
    prompt: &dyn UserPrompt,
) -> Result<String, SelectionError> {
    if senders.is_empty() {
        return Err(SelectionError::NoCandidates);
    }

    let answer = prompt
        .prompt(&format_sender_prompt(senders))
        .ok_or(SelectionError::Cancelled)?;
    select_from_input(senders, &answer)
}

/// The sender with the strictly greatest message count.
///
/// Ties go to whoever appeared first; no messages means no answer.
pub fn auto_detect(conversation: &Conversation) -> Option<String> {
    auto_detect_messages(&conversation.all_messages)
}

/// [`auto_detect`] over a bare message slice.
pub fn auto_detect_messages(messages: &[Message]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for msg in messages {
        match counts.iter_mut().find(|(sender, _)| *sender == msg.sender) {
            Some((_, count)) => *count += 1,
            None => counts.push((msg.sender.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (sender, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((sender, count));
        }
    }
    best.map(|(sender, _)| sender.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn senders() -> Vec<String> {
        vec!["Alice".into(), "Bob".into(), "Carol".into()]
    }

    fn conversation(order: &[&str]) -> Conversation {
        let messages = order
            .iter()
            .enumerate()
            .map(|(i, s)| Message::new(i, "1/1/24", "10:00", *s, "x"))
            .collect();
        Conversation::assemble("c", None, messages)
    }

    #[test]
    fn test_prompt_text() {
        let text = format_sender_prompt(&senders());
        assert_eq!(
            text,
            "Select your username from the list by entering the corresponding number:\n\n\
             1. Alice\n2. Bob\n3. Carol\n"
        );
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("2"), Ok(2));
        assert_eq!(parse_selection("  2"), Ok(2));
        assert_eq!(parse_selection("2x"), Ok(2));
        assert_eq!(parse_selection("-1"), Ok(-1));
        assert!(matches!(parse_selection("x2"), Err(SelectionError::NonNumeric { .. })));
        assert!(matches!(parse_selection(""), Err(SelectionError::NonNumeric { .. })));
        assert!(matches!(parse_selection("-"), Err(SelectionError::NonNumeric { .. })));
    }

    #[test]
    fn test_select_by_index() {
        assert_eq!(select_by_index(&senders(), 1).unwrap(), "Alice");
        assert_eq!(select_by_index(&senders(), 3).unwrap(), "Carol");
        assert_eq!(
            select_by_index(&senders(), 0),
            Err(SelectionError::OutOfRange { index: 0, count: 3 })
        );
        assert_eq!(
            select_by_index(&senders(), 4),
            Err(SelectionError::OutOfRange { index: 4, count: 3 })
        );
        assert!(select_by_index(&senders(), -2).is_err());
        assert_eq!(
            select_by_index::<String>(&[], 1),
            Err(SelectionError::NoCandidates)
        );
    }

    #[test]
    fn test_huge_index_is_out_of_range() {
        let result = select_from_input(&senders(), "99999999999999999999999");
        assert!(matches!(result, Err(SelectionError::OutOfRange { .. })));
    }

    #[test]
    fn test_prompt_for_sender() {
        let answer_two = |_: &str| Some("2".to_string());
        assert_eq!(prompt_for_sender(&senders(), &answer_two).unwrap(), "Bob");

        let cancel = |_: &str| -> Option<String> { None };
        assert_eq!(
            prompt_for_sender(&senders(), &cancel),
            Err(SelectionError::Cancelled)
        );
    }

    #[test]
    fn test_prompt_receives_list() {
        let check = |message: &str| {
            assert!(message.contains("3. Carol"));
            Some("1".to_string())
        };
        assert_eq!(prompt_for_sender(&senders(), &check).unwrap(), "Alice");
    }

    #[test]
    fn test_auto_detect_majority() {
        let conv = conversation(&["Bob", "Alice", "Alice", "Bob", "Alice", "Alice", "Bob", "Alice"]);
        assert_eq!(auto_detect(&conv).as_deref(), Some("Alice"));
    }

    #[test]
    fn test_auto_detect_tie_goes_to_first_seen() {
        let conv = conversation(&["Bob", "Alice", "Alice", "Bob"]);
        assert_eq!(auto_detect(&conv).as_deref(), Some("Bob"));
    }

    #[test]
    fn test_auto_detect_empty() {
        assert_eq!(auto_detect(&conversation(&[])), None);
    }
}
