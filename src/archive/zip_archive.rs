//! Zip archive extraction.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::PathBuf;
use std::sync::Arc;

use zip::ZipArchive;
use zip::result::ZipError;

use super::{ArchiveExtractor, ExtractedArchive, TextEntry, decode_transcript};
use crate::config::ArchiveConfig;
use crate::core::media::{BlobRef, MediaArchive};
use crate::error::{ChatArchiveError, Result};

#[derive(Debug, Clone)]
enum ZipSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// Reads a WhatsApp `.zip` export.
///
/// Entries ending in the transcript extension become transcripts; every
/// other file becomes an in-memory media blob.
///
/// ```rust,no_run
/// use chatarchive::archive::{ArchiveExtractor, ZipExtractor};
///
/// # fn main() -> chatarchive::Result<()> {
/// let extracted = ZipExtractor::from_path("WhatsApp Chat with Bob.zip").extract()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ZipExtractor {
    source: ZipSource,
    config: ArchiveConfig,
}

impl ZipExtractor {
    /// Reads the archive from disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ZipSource::Path(path.into()),
            config: ArchiveConfig::default(),
        }
    }

    /// Reads the archive from an uploaded blob.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            source: ZipSource::Bytes(bytes.into()),
            config: ArchiveConfig::default(),
        }
    }

    /// Sets the archive configuration.
    #[must_use]
    pub fn with_config(mut self, config: ArchiveConfig) -> Self {
        self.config = config;
        self
    }

    fn path(&self) -> Option<PathBuf> {
        match &self.source {
            ZipSource::Path(path) => Some(path.clone()),
            ZipSource::Bytes(_) => None,
        }
    }

    fn read_all<R: Read + Seek>(&self, reader: R) -> Result<ExtractedArchive> {
        let path = self.path();
        let mut archive =
            ZipArchive::new(reader).map_err(|e| ChatArchiveError::zip(e, path.clone()))?;

        let mut transcripts = Vec::new();
        let mut media = Vec::new();

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| ChatArchiveError::zip(e, path.clone()))?;
            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| ChatArchiveError::zip(ZipError::Io(e), path.clone()))?;

            if self.config.is_transcript(&name) {
                let content = decode_transcript(&name, data);
                transcripts.push(TextEntry::new(name, content));
            } else {
                let blob = BlobRef::from_bytes(name.clone(), data);
                media.push((name, blob));
            }
        }

        log::info!(
            "zip: {} transcripts, {} media entries",
            transcripts.len(),
            media.len()
        );
        Ok(ExtractedArchive::new(
            transcripts,
            MediaArchive::from_entries(media),
        ))
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn extract(&self) -> Result<ExtractedArchive> {
        match &self.source {
            ZipSource::Path(path) => self.read_all(File::open(path)?),
            ZipSource::Bytes(bytes) => self.read_all(Cursor::new(bytes.as_ref())),
        }
    }
}
