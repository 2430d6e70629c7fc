//! Extraction from an already-unpacked export directory.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{ArchiveExtractor, ExtractedArchive, TextEntry, decode_transcript};
use crate::config::ArchiveConfig;
use crate::core::media::{BlobRef, MediaArchive};
use crate::error::{ChatArchiveError, Result};

/// Walks a directory tree the same way [`ZipExtractor`](super::ZipExtractor)
/// walks a zip.
///
/// Entries are visited in file-name order so repeated runs see the same
/// media iteration order. Media blobs point at the files instead of copying
/// them.
#[derive(Debug, Clone)]
pub struct DirectoryExtractor {
    root: PathBuf,
    config: ArchiveConfig,
}

impl DirectoryExtractor {
    /// Creates an extractor rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: ArchiveConfig::default(),
        }
    }

    /// Sets the archive configuration.
    #[must_use]
    pub fn with_config(mut self, config: ArchiveConfig) -> Self {
        self.config = config;
        self
    }

    fn entry_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl ArchiveExtractor for DirectoryExtractor {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn extract(&self) -> Result<ExtractedArchive> {
        let mut transcripts = Vec::new();
        let mut media = Vec::new();

        let walker = WalkDir::new(&self.root).sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| ChatArchiveError::walk(e, Some(self.root.clone())))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = self.entry_name(entry.path());
            if self.config.is_transcript(&name) {
                let content = decode_transcript(&name, fs::read(entry.path())?);
                transcripts.push(TextEntry::new(name, content));
            } else {
                media.push((name, BlobRef::from_path(entry.path())));
            }
        }

        log::info!(
            "{}: {} transcripts, {} media files",
            self.root.display(),
            transcripts.len(),
            media.len()
        );
        Ok(ExtractedArchive::new(
            transcripts,
            MediaArchive::from_entries(media),
        ))
    }
}
