//! # Chatarchive
//!
//! A Rust library for reading exported WhatsApp chat archives into a
//! queryable conversation model.
//!
//! ## Overview
//!
//! An export is a zip (or an unpacked directory) holding one `.txt`
//! transcript per chat plus the attachments it mentions. Chatarchive:
//!
//! - parses transcripts in both the Android (`12/05/23, 10:30 - Alice: hi`)
//!   and iOS (`[12/05/23, 10:30:00 PM] Alice: hi`) header dialects, folding
//!   continuation lines into the previous message
//! - groups messages by calendar day and collects distinct senders
//! - resolves attachment mentions to archive entries
//! - decides which sender is "me", by prompt or by message count
//! - searches a conversation case-insensitively with a wrapping cursor
//! - exports messages as CSV, JSON or JSONL
//!
//! Malformed input never aborts parsing: lines that fit nowhere are dropped,
//! bad timestamps become `None` and unmatched media stays text. Only an
//! unreadable archive container is an error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use chatarchive::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let archive_config = ArchiveConfig::new();
//!     let extracted = open_extractor(Path::new("WhatsApp Chat with Bob.zip"), &archive_config)?
//!         .extract()?;
//!
//!     let mut session = Session::load(extracted, &archive_config, &ParserConfig::new());
//!     session.choose_primary_user(&|_: &str| Some("1".to_string()));
//!
//!     let conv = &session.conversations()[0];
//!     write_json(&conv.all_messages, "bob.json", &OutputConfig::new(), Some(session.media()))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing a Transcript Directly
//!
//! ```rust
//! use chatarchive::core::Conversation;
//! use chatarchive::parser::TranscriptParser;
//!
//! let text = "WhatsApp Chat with Bob\n\
//!             12/05/23, 10:30 - Alice: Hello\n\
//!             12/05/23, 10:31 - Bob: hi\n\
//!             and more";
//!
//! let parsed = TranscriptParser::new().parse_str(text);
//! let conv = Conversation::assemble("bob", parsed.title, parsed.messages);
//!
//! assert_eq!(conv.name, "Bob");
//! assert_eq!(conv.all_messages[1].text, "hi\nand more");
//! assert_eq!(conv.unique_senders, vec!["Alice", "Bob"]);
//! ```
//!
//! ## Module Structure
//!
//! - [`parsing`] - line classification and timestamp derivation
//! - [`parser`] - [`TranscriptParser`](parser::TranscriptParser): transcript text to messages
//! - [`core`] - conversations, primary user, media, search, links, export
//! - [`archive`] - zip, directory and single-file extractors
//! - [`session`] - [`Session`](session::Session): loaded archive plus primary user
//! - [`config`] - [`ParserConfig`](config::ParserConfig), [`ArchiveConfig`](config::ArchiveConfig)
//! - [`format`] - [`OutputFormat`](format::OutputFormat) and export dispatch
//! - [`error`] - [`ChatArchiveError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod parser;
pub mod parsing;
pub mod session;

// Re-export the main types at the crate root for convenience
pub use error::{ChatArchiveError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatarchive::prelude::*;
/// ```
pub mod prelude {
    // Core message type
    pub use crate::Message;

    // Error types
    pub use crate::error::{ChatArchiveError, Result};

    // Configuration
    pub use crate::config::{ArchiveConfig, ContinuationPolicy, ParserConfig};
    pub use crate::core::OutputConfig;

    // Parsing
    pub use crate::parser::{ParsedTranscript, TranscriptParser};

    // Engine
    pub use crate::core::{
        Conversation, MediaArchive, MediaKind, MediaRef, SearchIndex, SelectionError,
        UserPrompt, auto_detect,
    };

    // Loading
    pub use crate::archive::{ArchiveExtractor, ExtractedArchive, open_extractor};
    pub use crate::session::{PrimaryUserOutcome, Session};

    // Output
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
}
