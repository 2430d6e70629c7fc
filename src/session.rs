//! A loaded archive and the "who am I" choice.
//!
//! [`Session`] is the one place with mutable state: the conversations parsed
//! from an archive, its media, and the primary user. Everything it does is
//! delegated to the pure functions in [`core`](crate::core).
//!
//! # Example
//!
//! ```rust
//! use chatarchive::archive::{ExtractedArchive, TextEntry};
//! use chatarchive::config::{ArchiveConfig, ParserConfig};
//! use chatarchive::core::MediaArchive;
//! use chatarchive::session::{PrimaryUserOutcome, Session};
//!
//! let extracted = ExtractedArchive::new(
//!     vec![TextEntry::new(
//!         "WhatsApp Chat with Bob.txt",
//!         "12/05/23, 10:30 - Alice: Hello there\n12/05/23, 10:31 - Bob: hi",
//!     )],
//!     MediaArchive::new(),
//! );
//!
//! let mut session = Session::load(extracted, &ArchiveConfig::new(), &ParserConfig::new());
//! let outcome = session.choose_primary_user(&|_: &str| Some("2".to_string()));
//!
//! assert_eq!(outcome, PrimaryUserOutcome::Selected("Bob".to_string()));
//! assert!(session.is_mine(&session.conversations()[0].all_messages[1]));
//! ```

use std::collections::HashSet;

use crate::Message;
use crate::archive::{ExtractedArchive, TextEntry};
use crate::config::{ArchiveConfig, ParserConfig};
use crate::core::media::{MediaArchive, MediaRef, resolve_message};
use crate::core::primary_user::{SelectionError, UserPrompt, auto_detect, prompt_for_sender};
use crate::core::{Conversation, SearchIndex};
use crate::parser::TranscriptParser;

/// How the primary user was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryUserOutcome {
    /// Picked from the prompt.
    Selected(String),
    /// The prompt failed; the most frequent sender was used instead.
    AutoDetected {
        /// Chosen sender, `None` if the fallback conversation was empty
        user: Option<String>,
        /// Why the prompt answer was not used
        reason: SelectionError,
    },
    /// Nobody to choose from.
    NoSenders,
}

impl PrimaryUserOutcome {
    /// The sender now considered "me", if any.
    pub fn user(&self) -> Option<&str> {
        match self {
            PrimaryUserOutcome::Selected(user) => Some(user),
            PrimaryUserOutcome::AutoDetected { user, .. } => user.as_deref(),
            PrimaryUserOutcome::NoSenders => None,
        }
    }
}

/// Parsed conversations, their media and the primary user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    conversations: Vec<Conversation>,
    media: MediaArchive,
    primary_user: Option<String>,
}

impl Session {
    /// Parses every transcript of an extracted archive.
    ///
    /// Conversations keep archive order. With the `parallel` feature and
    /// `archive_config.parallel` set, transcripts are parsed concurrently.
    pub fn load(
        extracted: ExtractedArchive,
        archive_config: &ArchiveConfig,
        parser_config: &ParserConfig,
    ) -> Self {
        let parser = TranscriptParser::with_config(parser_config.clone());
        let ExtractedArchive { transcripts, media } = extracted;

        let conversations = parse_all(&parser, archive_config, &transcripts);

        log::info!(
            "loaded {} conversations ({} messages), {} media files",
            conversations.len(),
            conversations.iter().map(Conversation::len).sum::<usize>(),
            media.len()
        );

        Self {
            conversations,
            media,
            primary_user: None,
        }
    }

    /// Builds a session from conversations assembled elsewhere.
    pub fn from_parts(conversations: Vec<Conversation>, media: MediaArchive) -> Self {
        Self {
            conversations,
            media,
            primary_user: None,
        }
    }

    /// Returns `true` if the archive held no transcripts.
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Conversations in archive order.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Finds a conversation by id or display name.
    pub fn conversation(&self, key: &str) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conv| conv.id == key)
            .or_else(|| self.conversations.iter().find(|conv| conv.name == key))
    }

    /// The archive's media.
    pub fn media(&self) -> &MediaArchive {
        &self.media
    }

    /// Distinct senders across all conversations, first-seen order.
    pub fn all_senders(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.conversations
            .iter()
            .flat_map(|conv| conv.unique_senders.iter())
            .filter(|sender| seen.insert(sender.as_str()))
            .cloned()
            .collect()
    }

    // =========================================================================
    // Primary user
    // =========================================================================

    /// Current primary user.
    pub fn primary_user(&self) -> Option<&str> {
        self.primary_user.as_deref()
    }

    /// Overrides the primary user.
    pub fn set_primary_user(&mut self, user: impl Into<String>) {
        self.primary_user = Some(user.into());
    }

    /// Forgets the primary user.
    pub fn clear_primary_user(&mut self) {
        self.primary_user = None;
    }

    /// Asks for the primary user among every sender in the archive.
    ///
    /// Any failure (cancel, bad number) falls back to auto-detection on the
    /// first conversation.
    pub fn choose_primary_user(&mut self, prompt: &dyn UserPrompt) -> PrimaryUserOutcome {
        let senders = self.all_senders();
        if senders.is_empty() {
            self.primary_user = None;
            return PrimaryUserOutcome::NoSenders;
        }

        match prompt_for_sender(&senders, prompt) {
            Ok(user) => {
                log::info!("primary user selected: {user}");
                self.primary_user = Some(user.clone());
                PrimaryUserOutcome::Selected(user)
            }
            Err(reason) => {
                let user = self.conversations.first().and_then(auto_detect);
                log::info!("primary user selection failed ({reason}), auto-detected {user:?}");
                self.primary_user = user.clone();
                PrimaryUserOutcome::AutoDetected { user, reason }
            }
        }
    }

    /// Picks the primary user among the senders of one conversation.
    ///
    /// Unlike [`choose_primary_user`](Self::choose_primary_user), a failed
    /// answer leaves the current choice untouched.
    pub fn change_primary_user(
        &mut self,
        conversation: &str,
        prompt: &dyn UserPrompt,
    ) -> Result<&str, SelectionError> {
        let conv = self
            .conversation(conversation)
            .ok_or_else(|| SelectionError::UnknownConversation(conversation.to_string()))?;

        let user = prompt_for_sender(&conv.unique_senders, prompt)?;
        Ok(self.primary_user.insert(user).as_str())
    }

    /// Auto-detects the primary user from one conversation.
    pub fn auto_detect_primary_user(&mut self, conversation: &str) -> Option<&str> {
        let detected = self.conversation(conversation).and_then(auto_detect);
        self.primary_user = detected;
        self.primary_user.as_deref()
    }

    /// Returns `true` if the message was sent by the primary user.
    pub fn is_mine(&self, message: &Message) -> bool {
        self.primary_user
            .as_deref()
            .is_some_and(|user| user == message.sender)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Resolves a message's attachment against this archive.
    pub fn resolve_media(&self, message: &Message) -> MediaRef {
        resolve_message(message, &self.media)
    }

    /// Builds a search index over one conversation.
    pub fn search(&self, conversation: &str, query: &str) -> Option<SearchIndex> {
        self.conversation(conversation)
            .map(|conv| SearchIndex::build(conv, query))
    }
}

fn parse_one(parser: &TranscriptParser, config: &ArchiveConfig, entry: &TextEntry) -> Conversation {
    let parsed = parser.parse_str(&entry.content);
    let id = config.conversation_id(&entry.path);
    log::debug!("{}: {} messages", entry.path, parsed.messages.len());
    Conversation::assemble(id, parsed.title, parsed.messages)
}

#[cfg(feature = "parallel")]
fn parse_all(
    parser: &TranscriptParser,
    config: &ArchiveConfig,
    transcripts: &[TextEntry],
) -> Vec<Conversation> {
    use rayon::prelude::*;

    if config.parallel && transcripts.len() > 1 {
        transcripts
            .par_iter()
            .map(|entry| parse_one(parser, config, entry))
            .collect()
    } else {
        transcripts
            .iter()
            .map(|entry| parse_one(parser, config, entry))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn parse_all(
    parser: &TranscriptParser,
    config: &ArchiveConfig,
    transcripts: &[TextEntry],
) -> Vec<Conversation> {
    transcripts
        .iter()
        .map(|entry| parse_one(parser, config, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::media::{BlobRef, MediaKind};

    const FAMILY: &str = "\
WhatsApp Chat with Family
12/05/23, 10:30 - Alice: Hello there
   see you soon
12/05/23, 10:31 - Bob: IMG-001.jpg (file attached)
12/06/23, 09:00 - Alice: morning";

    const WORK: &str = "\
[01/02/2024, 9:15:30 PM] Carol: On my way
[01/02/2024, 9:16:00 PM] Bob: ok";

    fn session() -> Session {
        let media = MediaArchive::from_entries(vec![(
            "photos/IMG-001.jpg",
            BlobRef::from_bytes("photos/IMG-001.jpg", vec![0xffu8]),
        )]);
        let extracted = ExtractedArchive::new(
            vec![
                TextEntry::new("WhatsApp Chat with Family.txt", FAMILY),
                TextEntry::new("chats/work.txt", WORK),
            ],
            media,
        );
        Session::load(extracted, &ArchiveConfig::new(), &ParserConfig::new())
    }

    fn answer(text: &'static str) -> impl Fn(&str) -> Option<String> {
        move |_: &str| Some(text.to_string())
    }

    #[test]
    fn test_load_keeps_archive_order() {
        let session = session();
        let ids: Vec<&str> = session.conversations().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["WhatsApp Chat with Family", "work"]);
        assert_eq!(session.conversations()[0].name, "Family");
        assert_eq!(session.conversations()[1].name, "work");
    }

    #[test]
    fn test_sequential_load_matches_parallel() {
        let extracted = ExtractedArchive::new(
            vec![TextEntry::new("a.txt", FAMILY), TextEntry::new("b.txt", WORK)],
            MediaArchive::new(),
        );
        let parallel = Session::load(extracted.clone(), &ArchiveConfig::new(), &ParserConfig::new());
        let sequential = Session::load(
            extracted,
            &ArchiveConfig::new().with_parallel(false),
            &ParserConfig::new(),
        );
        assert_eq!(parallel.conversations(), sequential.conversations());
    }

    #[test]
    fn test_all_senders_union() {
        assert_eq!(session().all_senders(), vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_choose_primary_user_selected() {
        let mut session = session();
        let outcome = session.choose_primary_user(&answer("3"));
        assert_eq!(outcome, PrimaryUserOutcome::Selected("Carol".into()));
        assert_eq!(session.primary_user(), Some("Carol"));
    }

    #[test]
    fn test_choose_primary_user_falls_back() {
        let mut session = session();
        let outcome = session.choose_primary_user(&answer("9"));
        assert_eq!(outcome.user(), Some("Alice"));
        assert!(matches!(
            outcome,
            PrimaryUserOutcome::AutoDetected {
                reason: SelectionError::OutOfRange { index: 9, count: 3 },
                ..
            }
        ));

        let cancel = |_: &str| -> Option<String> { None };
        let outcome = session.choose_primary_user(&cancel);
        assert!(matches!(
            outcome,
            PrimaryUserOutcome::AutoDetected {
                reason: SelectionError::Cancelled,
                ..
            }
        ));
    }

    #[test]
    fn test_choose_primary_user_no_senders() {
        let mut session = Session::default();
        assert_eq!(
            session.choose_primary_user(&answer("1")),
            PrimaryUserOutcome::NoSenders
        );

        let empty = Conversation::assemble("empty", Some("Empty".into()), Vec::new());
        let mut session = Session::from_parts(vec![empty], MediaArchive::new());
        assert!(!session.is_empty());
        assert_eq!(
            session.choose_primary_user(&answer("1")),
            PrimaryUserOutcome::NoSenders
        );
        assert_eq!(session.primary_user(), None);
        assert_eq!(session.conversation("Empty").map(|c| c.id.as_str()), Some("empty"));
    }

    #[test]
    fn test_change_primary_user_scoped_to_conversation() {
        let mut session = session();
        session.set_primary_user("Alice");

        // "work" has Carol, Bob
        assert_eq!(session.change_primary_user("work", &answer("2")), Ok("Bob"));
        assert_eq!(session.primary_user(), Some("Bob"));

        let result = session.change_primary_user("work", &answer("3"));
        assert!(matches!(result, Err(SelectionError::OutOfRange { .. })));
        assert_eq!(session.primary_user(), Some("Bob"));

        let cancel = |_: &str| -> Option<String> { None };
        assert_eq!(
            session.change_primary_user("Family", &cancel),
            Err(SelectionError::Cancelled)
        );
        assert_eq!(session.primary_user(), Some("Bob"));

        assert!(matches!(
            session.change_primary_user("nope", &answer("1")),
            Err(SelectionError::UnknownConversation(_))
        ));
    }

    #[test]
    fn test_is_mine() {
        let mut session = session();
        let first = session.conversations()[0].all_messages[0].clone();
        assert!(!session.is_mine(&first));

        session.set_primary_user("Alice");
        assert!(session.is_mine(&first));

        session.clear_primary_user();
        assert!(!session.is_mine(&first));
    }

    #[test]
    fn test_auto_detect_primary_user() {
        let mut session = session();
        assert_eq!(session.auto_detect_primary_user("Family"), Some("Alice"));
        assert_eq!(session.auto_detect_primary_user("missing"), None);
    }

    #[test]
    fn test_resolve_media_and_search() {
        let session = session();
        let conv = &session.conversations()[0];

        let media = session.resolve_media(&conv.all_messages[1]);
        assert_eq!(media.kind, MediaKind::Image);
        assert_eq!(session.resolve_media(&conv.all_messages[0]).kind, MediaKind::Text);

        let index = session.search("Family", "soon").unwrap();
        assert_eq!(index.matches(), &[0]);
        assert!(session.search("missing", "soon").is_none());
    }
}
