//! Conversation assembly.
//!
//! Turns one transcript's parsed messages into a [`Conversation`]: the full
//! message list, day buckets keyed by the raw date token, and the distinct
//! senders. Assembly is a single pass and cannot fail.
//!
//! # Example
//!
//! ```rust
//! use chatarchive::core::Conversation;
//! use chatarchive::Message;
//!
//! let messages = vec![
//!     Message::new(0, "12/05/23", "10:30", "Alice", "Hi"),
//!     Message::new(1, "12/05/23", "10:31", "Bob", "Hey"),
//!     Message::new(2, "12/06/23", "08:00", "Alice", "Morning"),
//! ];
//!
//! let conv = Conversation::assemble("_chat", None, messages);
//! assert_eq!(conv.name, "_chat");
//! assert_eq!(conv.unique_senders, vec!["Alice", "Bob"]);
//! assert_eq!(conv.days().count(), 2);
//! assert_eq!(conv.last_message().map(|m| m.text.as_str()), Some("Morning"));
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::Message;

/// Indices of the messages sharing one raw date token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    /// Raw date token, as it appears on the messages
    pub date: String,
    /// Positions in `all_messages`, ascending
    pub message_ids: Vec<usize>,
}

/// One parsed transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Stable key derived from the transcript file name.
    pub id: String,

    /// Display name: the transcript title if present, else `id`.
    pub name: String,

    /// Every message, in transcript order.
    pub all_messages: Vec<Message>,

    /// Day buckets in first-seen order; together they cover `all_messages`
    /// exactly once.
    pub messages_by_date: Vec<DayGroup>,

    /// Distinct senders in first-seen order.
    pub unique_senders: Vec<String>,
}

impl Conversation {
    /// Builds a conversation from parsed messages.
    pub fn assemble(id: impl Into<String>, title: Option<String>, messages: Vec<Message>) -> Self {
        let id = id.into();
        let name = title.filter(|t| !t.is_empty()).unwrap_or_else(|| id.clone());

        let (messages_by_date, unique_senders) = group_messages(&messages);

        Self {
            id,
            name,
            all_messages: messages,
            messages_by_date,
            unique_senders,
        }
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.all_messages.len()
    }

    /// Returns `true` if the transcript had no recognizable messages.
    pub fn is_empty(&self) -> bool {
        self.all_messages.is_empty()
    }

    /// The final message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.all_messages.last()
    }

    /// Looks up a message by id.
    pub fn message(&self, id: usize) -> Option<&Message> {
        self.all_messages.get(id)
    }

    /// Iterates the day buckets in first-seen order.
    pub fn days(&self) -> impl Iterator<Item = Day<'_>> {
        self.messages_by_date.iter().map(move |group| Day {
            conversation: self,
            group,
        })
    }

    /// Message count per sender, in first-seen sender order.
    pub fn sender_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .unique_senders
            .iter()
            .map(|sender| (sender.as_str(), 0))
            .collect();
        let slot: HashMap<&str, usize> = counts
            .iter()
            .enumerate()
            .map(|(i, (sender, _))| (*sender, i))
            .collect();

        for msg in &self.all_messages {
            if let Some(&i) = slot.get(msg.sender.as_str()) {
                counts[i].1 += 1;
            }
        }
        counts
    }
}

fn group_messages(messages: &[Message]) -> (Vec<DayGroup>, Vec<String>) {
    let mut groups: Vec<DayGroup> = Vec::new();
    let mut bucket_of: HashMap<&str, usize> = HashMap::new();
    let mut senders: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (pos, msg) in messages.iter().enumerate() {
        match bucket_of.get(msg.date.as_str()) {
            Some(&bucket) => groups[bucket].message_ids.push(pos),
            None => {
                bucket_of.insert(&msg.date, groups.len());
                groups.push(DayGroup {
                    date: msg.date.clone(),
                    message_ids: vec![pos],
                });
            }
        }

        if seen.insert(&msg.sender) {
            senders.push(msg.sender.clone());
        }
    }

    (groups, senders)
}

/// A borrowed view of one day bucket.
#[derive(Debug, Clone, Copy)]
pub struct Day<'a> {
    conversation: &'a Conversation,
    group: &'a DayGroup,
}

impl<'a> Day<'a> {
    /// Raw date token.
    pub fn date(&self) -> &'a str {
        &self.group.date
    }

    /// Number of messages on this date.
    pub fn len(&self) -> usize {
        self.group.message_ids.len()
    }

    /// Always `false`: buckets are only created for a message.
    pub fn is_empty(&self) -> bool {
        self.group.message_ids.is_empty()
    }

    /// Messages on this date, in transcript order.
    pub fn messages(&self) -> impl Iterator<Item = &'a Message> + use<'a> {
        let all = &self.conversation.all_messages;
        let ids = &self.group.message_ids;
        ids.iter().filter_map(move |&id| all.get(id))
    }
}
