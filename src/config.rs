//! Configuration types for parsing and loading archives.
//!
//! Plain structs with builder methods, usable without any CLI framework.
//!
//! - [`ParserConfig`] - transcript parsing policy
//! - [`ArchiveConfig`] - which archive entries are transcripts, parallelism
//!
//! # Example
//!
//! ```rust
//! use chatarchive::config::{ContinuationPolicy, ParserConfig};
//! use chatarchive::parser::TranscriptParser;
//!
//! let config = ParserConfig::new().with_continuation(ContinuationPolicy::Strict);
//! let parser = TranscriptParser::with_config(config);
//! ```

use serde::{Deserialize, Serialize};

/// How non-header lines following a message are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuationPolicy {
    /// Fold every non-header line into the previous message unless it looks
    /// like a malformed `[D/M/Y,` header.
    #[default]
    Loose,

    /// Fold only lines that begin with whitespace.
    Strict,
}

impl std::fmt::Display for ContinuationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContinuationPolicy::Loose => write!(f, "loose"),
            ContinuationPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Configuration for transcript parsing.
///
/// # Example
///
/// ```rust
/// use chatarchive::config::ParserConfig;
///
/// let config = ParserConfig::new().with_strip_file_attached(false);
/// assert!(!config.strip_file_attached);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Continuation line policy (default: loose)
    pub continuation: ContinuationPolicy,

    /// Substring that marks the first line as a title line
    /// (default: `WhatsApp Chat with`)
    pub title_sentinel: String,

    /// Strip a trailing `(file attached)` marker from header text (default: true)
    pub strip_file_attached: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            continuation: ContinuationPolicy::Loose,
            title_sentinel: "WhatsApp Chat with".to_string(),
            strip_file_attached: true,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the continuation policy.
    #[must_use]
    pub fn with_continuation(mut self, policy: ContinuationPolicy) -> Self {
        self.continuation = policy;
        self
    }

    /// Sets the title sentinel.
    #[must_use]
    pub fn with_title_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.title_sentinel = sentinel.into();
        self
    }

    /// Sets whether `(file attached)` is stripped from header text.
    #[must_use]
    pub fn with_strip_file_attached(mut self, strip: bool) -> Self {
        self.strip_file_attached = strip;
        self
    }
}

/// Configuration for loading an archive.
///
/// # Example
///
/// ```rust
/// use chatarchive::config::ArchiveConfig;
///
/// let config = ArchiveConfig::new().with_parallel(false);
/// assert!(config.is_transcript("chats/WhatsApp Chat with Bob.txt"));
/// assert!(!config.is_transcript("IMG-001.jpg"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Extension (without dot) of entries treated as transcripts (default: `txt`)
    pub transcript_extension: String,

    /// Parse transcripts concurrently when the `parallel` feature is on (default: true)
    pub parallel: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            transcript_extension: "txt".to_string(),
            parallel: true,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transcript extension.
    #[must_use]
    pub fn with_transcript_extension(mut self, ext: impl Into<String>) -> Self {
        self.transcript_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    /// Enables or disables parallel transcript parsing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Returns `true` if an entry name denotes a transcript.
    ///
    /// The comparison is case-sensitive, matching how exports name their
    /// transcript files.
    pub fn is_transcript(&self, entry_name: &str) -> bool {
        entry_name
            .strip_suffix(self.transcript_extension.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    }

    /// Derives a conversation id from a transcript entry path.
    ///
    /// ```rust
    /// use chatarchive::config::ArchiveConfig;
    ///
    /// let config = ArchiveConfig::new();
    /// assert_eq!(config.conversation_id("export/WhatsApp Chat with Bob.txt"), "WhatsApp Chat with Bob");
    /// ```
    pub fn conversation_id<'a>(&self, entry_path: &'a str) -> &'a str {
        let base = crate::core::media::base_name(entry_path);
        base.strip_suffix(self.transcript_extension.as_str())
            .and_then(|stem| stem.strip_suffix('.'))
            .unwrap_or(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.continuation, ContinuationPolicy::Loose);
        assert_eq!(config.title_sentinel, "WhatsApp Chat with");
        assert!(config.strip_file_attached);
    }

    #[test]
    fn test_parser_config_builder() {
        let config = ParserConfig::new()
            .with_continuation(ContinuationPolicy::Strict)
            .with_title_sentinel("Chat with")
            .with_strip_file_attached(false);
        assert_eq!(config.continuation, ContinuationPolicy::Strict);
        assert_eq!(config.title_sentinel, "Chat with");
        assert!(!config.strip_file_attached);
    }

    #[test]
    fn test_archive_config_is_transcript() {
        let config = ArchiveConfig::new();
        assert!(config.is_transcript("_chat.txt"));
        assert!(config.is_transcript("nested/dir/WhatsApp Chat with Bob.txt"));
        assert!(!config.is_transcript("notes.TXT"));
        assert!(!config.is_transcript("photo.jpg"));
        assert!(!config.is_transcript("txt"));
    }

    #[test]
    fn test_archive_config_custom_extension() {
        let config = ArchiveConfig::new().with_transcript_extension(".log");
        assert_eq!(config.transcript_extension, "log");
        assert!(config.is_transcript("chat.log"));
        assert!(!config.is_transcript("chat.txt"));
    }

    #[test]
    fn test_conversation_id() {
        let config = ArchiveConfig::new();
        assert_eq!(config.conversation_id("_chat.txt"), "_chat");
        assert_eq!(config.conversation_id("a/b/Family.txt"), "Family");
        assert_eq!(config.conversation_id("README"), "README");
    }

    #[test]
    fn test_config_serde() {
        let config = ParserConfig::new().with_continuation(ContinuationPolicy::Strict);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"continuation\":\"strict\""));

        let parsed: ParserConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
