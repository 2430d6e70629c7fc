//! Core engine: everything that happens after a transcript has been parsed.
//!
//! This module contains:
//! - [`conversation`] - day grouping and sender collection
//! - [`primary_user`] - explicit and automatic "me" selection
//! - [`media`] - attachment hint extraction and archive matching
//! - [`search`] - case-insensitive search with a wrapping cursor
//! - [`links`] - URL segmentation for rendering
//! - [`models`] - export configuration
//! - [`output`] - format writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use chatarchive::core::{Conversation, SearchIndex, auto_detect};
//! use chatarchive::parser::TranscriptParser;
//!
//! let parsed = TranscriptParser::new().parse_str("12/05/23, 10:30 - Alice: see you soon");
//! let conv = Conversation::assemble("_chat", parsed.title, parsed.messages);
//!
//! assert_eq!(auto_detect(&conv).as_deref(), Some("Alice"));
//! assert_eq!(SearchIndex::build(&conv, "soon").len(), 1);
//! ```

pub mod conversation;
pub mod links;
pub mod media;
pub mod models;
pub mod output;
pub mod primary_user;
pub mod search;

pub use conversation::{Conversation, Day, DayGroup};
pub use links::{TextSegment, linkify};
pub use media::{BlobRef, MediaArchive, MediaKind, MediaRef, resolve, resolve_message};
pub use models::OutputConfig;
pub use primary_user::{
    SelectionError, UserPrompt, auto_detect, format_sender_prompt, select_by_index,
    select_from_input,
};
pub use search::{Highlight, SearchIndex, highlight};

// Re-export Message from the crate root
pub use crate::Message;

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
