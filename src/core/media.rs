//! Media name resolution.
//!
//! Exports reference attachments only by a textual placeholder inside the
//! message body. This module recovers a filename hint from that text and
//! fuzzy-matches it against the files pulled out of the archive.
//!
//! # Example
//!
//! ```rust
//! use chatarchive::core::media::{BlobRef, MediaArchive, MediaKind, resolve};
//!
//! let archive: MediaArchive = vec![(
//!     "photos/IMG-001.jpg".to_string(),
//!     BlobRef::from_bytes("photos/IMG-001.jpg", vec![0xffu8, 0xd8]),
//! )]
//! .into_iter()
//! .collect();
//!
//! let media = resolve("IMG-001.jpg", &archive);
//! assert_eq!(media.kind, MediaKind::Image);
//! assert!(media.blob.is_some());
//!
//! assert_eq!(resolve("just words", &archive).kind, MediaKind::Text);
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Message;

static BIDI_MARKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\u{200E}\u{200F}\u{202A}-\u{202E}\u{2066}-\u{2069}]")
        .expect("bidi pattern is valid")
});

// <attached: 00000012-PHOTO-2023-01-02.jpg>
static IOS_HINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<attached:\s*([^>]+)>").expect("ios hint pattern is valid"));

// IMG-20230102-WA0001.jpg (file attached)
static ANDROID_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([A-Za-z0-9\-_]+\.(?:jpg|jpeg|png|gif|mp4|mov|opus|ogg|mp3|pdf|doc|xls|webm))\s?\(file attached\)",
    )
    .expect("android hint pattern is valid")
});

static KNOWN_EXTENSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(?:jpg|jpeg|png|gif|mp4|mov|opus|ogg|mp3|pdf|doc|xls|webm)$")
        .expect("extension pattern is valid")
});

static COUNTER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+-").expect("counter prefix pattern is valid"));

/// Returns the last `/`-separated segment of an entry path.
///
/// ```rust
/// use chatarchive::core::media::base_name;
///
/// assert_eq!(base_name("photos/2023/IMG-001.jpg"), "IMG-001.jpg");
/// assert_eq!(base_name("IMG-001.jpg"), "IMG-001.jpg");
/// ```
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// ============================================================================
// Blob references and the archive mapping
// ============================================================================

/// Opaque handle to an attachment's bytes.
///
/// The resolver never looks inside; rendering layers turn it into a URL or
/// read it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobRef {
    /// Bytes held in memory, with the full entry path they came from.
    Bytes {
        /// Entry path inside the archive
        entry: String,
        /// Original bytes
        data: Arc<[u8]>,
    },
    /// A file on disk.
    Path(PathBuf),
}

impl BlobRef {
    /// Creates an in-memory blob.
    pub fn from_bytes(entry: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        BlobRef::Bytes {
            entry: entry.into(),
            data: data.into(),
        }
    }

    /// Creates a blob backed by a file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        BlobRef::Path(path.into())
    }

    /// Returns the in-memory bytes, if this blob holds any.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            BlobRef::Bytes { data, .. } => Some(data),
            BlobRef::Path(_) => None,
        }
    }

    /// Returns the backing file, if this blob lives on disk.
    pub fn path(&self) -> Option<&Path> {
        match self {
            BlobRef::Bytes { .. } => None,
            BlobRef::Path(path) => Some(path),
        }
    }

    /// A printable locator: the entry path or the file path.
    pub fn locator(&self) -> Cow<'_, str> {
        match self {
            BlobRef::Bytes { entry, .. } => Cow::Borrowed(entry),
            BlobRef::Path(path) => path.to_string_lossy(),
        }
    }
}

/// Mapping from base file name to blob, in extraction order.
///
/// Built once and never modified. When two entries share a base name the
/// later blob replaces the earlier one but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct MediaArchive {
    entries: Vec<(String, BlobRef)>,
    index: HashMap<String, usize>,
}

impl MediaArchive {
    /// Creates an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an archive from `(entry path, blob)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, BlobRef)>,
        S: AsRef<str>,
    {
        let mut archive = Self::default();
        for (path, blob) in entries {
            archive.insert(base_name(path.as_ref()), blob);
        }
        archive
    }

    fn insert(&mut self, key: &str, blob: BlobRef) {
        match self.index.get(key) {
            Some(&slot) => {
                log::debug!("media name collision on {key:?}, keeping the later entry");
                self.entries[slot].1 = blob;
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), blob));
            }
        }
    }

    /// Number of distinct base names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no media entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by base name.
    pub fn get(&self, name: &str) -> Option<&BlobRef> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    /// Base names in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// `(base name, blob)` pairs in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BlobRef)> {
        self.entries.iter().map(|(key, blob)| (key.as_str(), blob))
    }

    /// First entry whose lowercased name contains the lowercased hint.
    ///
    /// With several candidates the choice is purely positional.
    pub fn find_containing(&self, hint: &str) -> Option<(&str, &BlobRef)> {
        let needle = hint.to_lowercase();
        self.iter()
            .find(|(key, _)| key.to_lowercase().contains(&needle))
    }
}

impl<S: AsRef<str>> FromIterator<(S, BlobRef)> for MediaArchive {
    fn from_iter<I: IntoIterator<Item = (S, BlobRef)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

// ============================================================================
// Classification
// ============================================================================

/// What a message renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Plain text, no attachment.
    Text,
    /// jpg, jpeg, png, gif
    Image,
    /// opus, ogg, mp3
    Audio,
    /// mp4, mov, webm
    Video,
    /// Any other matched file.
    Document,
}

impl MediaKind {
    /// Classifies a matched file name by its extension.
    ///
    /// Never returns [`MediaKind::Text`]: an unknown extension is a document.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" => MediaKind::Image,
            "opus" | "ogg" | "mp3" => MediaKind::Audio,
            "mp4" | "mov" | "webm" => MediaKind::Video,
            _ => MediaKind::Document,
        }
    }

    /// Lowercase name, as used in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Text => "text",
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of media resolution. `blob` is present iff `kind` is not text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    /// Render kind
    pub kind: MediaKind,
    /// Matched attachment
    pub blob: Option<BlobRef>,
    /// Base name of the matched archive entry
    pub name: Option<String>,
}

impl MediaRef {
    /// A plain-text result.
    pub fn text() -> Self {
        Self {
            kind: MediaKind::Text,
            blob: None,
            name: None,
        }
    }

    fn matched(name: &str, blob: &BlobRef) -> Self {
        Self {
            kind: MediaKind::from_file_name(name),
            blob: Some(blob.clone()),
            name: Some(name.to_string()),
        }
    }

    /// Returns `true` if an attachment was found.
    pub fn is_media(&self) -> bool {
        self.kind != MediaKind::Text
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Removes bidirectional embedding, override and isolate marks.
pub fn strip_bidi_marks(text: &str) -> Cow<'_, str> {
    BIDI_MARKS.replace_all(text, "")
}

/// Pulls a filename hint out of already-cleaned message text.
///
/// Tried in order: `<attached: NAME>`, `NAME.ext (file attached)`, then the
/// whole trimmed text if it ends in a known extension.
///
/// ```rust
/// use chatarchive::core::media::extract_hint;
///
/// assert_eq!(extract_hint("<attached: 00000012-PHOTO.jpg>").as_deref(), Some("00000012-PHOTO.jpg"));
/// assert_eq!(extract_hint("IMG-1.JPG (file attached)").as_deref(), Some("IMG-1.JPG"));
/// assert_eq!(extract_hint(" report.pdf ").as_deref(), Some("report.pdf"));
/// assert_eq!(extract_hint("see you soon"), None);
/// ```
pub fn extract_hint(text: &str) -> Option<String> {
    if let Some(caps) = IOS_HINT.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    if let Some(caps) = ANDROID_HINT.captures(text) {
        return Some(caps[1].trim().to_string());
    }

    let trimmed = text.trim();
    KNOWN_EXTENSION_SUFFIX
        .is_match(trimmed)
        .then(|| trimmed.to_string())
}

/// Resolves message text against the archive.
///
/// Never fails; anything that doesn't lead to an archive entry is text.
pub fn resolve(text: &str, archive: &MediaArchive) -> MediaRef {
    let cleaned = strip_bidi_marks(text);

    let Some(hint) = extract_hint(&cleaned) else {
        return MediaRef::text();
    };

    // A hint emptied by the prefix strip still matches the first entry.
    let hint = COUNTER_PREFIX.replace(&hint, "");

    match archive.find_containing(&hint) {
        Some((name, blob)) => MediaRef::matched(name, blob),
        None => {
            log::debug!("no archive entry matches media hint {hint:?}");
            MediaRef::text()
        }
    }
}

/// Resolves a message's text against the archive.
pub fn resolve_message(message: &Message, archive: &MediaArchive) -> MediaRef {
    resolve(&message.text, archive)
}
