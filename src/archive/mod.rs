//! Archive extraction: getting transcripts and attachments out of an export.
//!
//! Every extractor produces the same [`ExtractedArchive`]: the candidate
//! transcripts as text, and everything else as a [`MediaArchive`] keyed by
//! base file name. Only a structurally unreadable container is an error;
//! an archive with no transcripts is a valid, empty result.
//!
//! | Extractor | Input | Media blobs |
//! |-----------|-------|-------------|
//! | [`ZipExtractor`] | `.zip` file or bytes (`archive` feature) | in memory |
//! | [`DirectoryExtractor`] | unpacked export directory | file paths |
//! | [`TranscriptFile`] | a single `.txt` transcript | none |
//!
//! # Example
//!
//! ```rust,no_run
//! use chatarchive::archive::open_extractor;
//! use chatarchive::config::ArchiveConfig;
//! use std::path::Path;
//!
//! # fn main() -> chatarchive::Result<()> {
//! let config = ArchiveConfig::new();
//! let extracted = open_extractor(Path::new("WhatsApp Chat.zip"), &config)?.extract()?;
//! println!("{} transcripts, {} media files", extracted.transcripts.len(), extracted.media.len());
//! # Ok(())
//! # }
//! ```

mod directory;
#[cfg(feature = "archive")]
mod zip_archive;

pub use directory::DirectoryExtractor;
#[cfg(feature = "archive")]
pub use zip_archive::ZipExtractor;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ArchiveConfig;
use crate::core::media::MediaArchive;
use crate::error::{ChatArchiveError, Result};

/// A candidate transcript pulled from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    /// Entry path inside the archive, `/`-separated
    pub path: String,
    /// Decoded text
    pub content: String,
}

impl TextEntry {
    /// Creates a text entry.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Everything an extractor found.
#[derive(Debug, Clone, Default)]
pub struct ExtractedArchive {
    /// Transcripts in archive order
    pub transcripts: Vec<TextEntry>,
    /// All other entries
    pub media: MediaArchive,
}

impl ExtractedArchive {
    /// Creates an extracted archive from its parts.
    pub fn new(transcripts: Vec<TextEntry>, media: MediaArchive) -> Self {
        Self { transcripts, media }
    }

    /// Returns `true` if there is nothing to parse.
    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
}

/// Source of transcripts and attachments.
pub trait ArchiveExtractor {
    /// Short name for logs and messages.
    fn name(&self) -> &'static str;

    /// Reads the whole source.
    ///
    /// # Errors
    ///
    /// Fails only when the container itself can't be read.
    fn extract(&self) -> Result<ExtractedArchive>;
}

/// Decodes transcript bytes, replacing invalid UTF-8 instead of failing.
pub(crate) fn decode_transcript(entry: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("{entry}: transcript is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

/// A lone transcript file with no attachments.
#[derive(Debug, Clone)]
pub struct TranscriptFile {
    path: PathBuf,
}

impl TranscriptFile {
    /// Creates an extractor for one transcript on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArchiveExtractor for TranscriptFile {
    fn name(&self) -> &'static str {
        "transcript"
    }

    fn extract(&self) -> Result<ExtractedArchive> {
        let bytes = fs::read(&self.path)?;
        let entry = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned());

        let content = decode_transcript(&entry, bytes);
        Ok(ExtractedArchive::new(
            vec![TextEntry::new(entry, content)],
            MediaArchive::new(),
        ))
    }
}

/// Picks an extractor by the shape of `path`.
///
/// Directories are walked, `.zip` files are opened as archives and
/// transcript files are read on their own.
///
/// # Errors
///
/// Fails if the path doesn't exist or has an unsupported extension.
pub fn open_extractor(path: &Path, config: &ArchiveConfig) -> Result<Box<dyn ArchiveExtractor>> {
    let metadata = fs::metadata(path)?;

    if metadata.is_dir() {
        return Ok(Box::new(
            DirectoryExtractor::new(path).with_config(config.clone()),
        ));
    }

    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        return zip_extractor(path, config);
    }

    if config.is_transcript(&path.to_string_lossy()) {
        return Ok(Box::new(TranscriptFile::new(path)));
    }

    Err(ChatArchiveError::invalid_format(
        "input",
        format!(
            "'{}' is not a .zip archive, a directory or a .{} transcript",
            path.display(),
            config.transcript_extension
        ),
    ))
}

#[cfg(feature = "archive")]
fn zip_extractor(path: &Path, config: &ArchiveConfig) -> Result<Box<dyn ArchiveExtractor>> {
    Ok(Box::new(
        ZipExtractor::from_path(path).with_config(config.clone()),
    ))
}

#[cfg(not(feature = "archive"))]
fn zip_extractor(_path: &Path, _config: &ArchiveConfig) -> Result<Box<dyn ArchiveExtractor>> {
    Err(ChatArchiveError::invalid_format(
        "input",
        "zip archives require the 'archive' feature",
    ))
}
