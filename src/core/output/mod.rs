//! Export writers.
//!
//! - [`write_csv`] / [`to_csv`] - semicolon-delimited CSV (`csv-output` feature)
//! - [`write_json`] / [`to_json`] - pretty JSON array (`json-output` feature)
//! - [`write_jsonl`] / [`to_jsonl`] - one JSON object per line (`json-output` feature)
//!
//! All writers take the same arguments: the messages, an [`OutputConfig`]
//! and, for media columns, the archive to resolve attachments against.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatarchive::Result<()> {
//! use chatarchive::core::output::{to_csv, write_json};
//! use chatarchive::core::OutputConfig;
//! use chatarchive::Message;
//!
//! let messages = vec![
//!     Message::new(0, "12/05/23", "10:30", "Alice", "Hello!"),
//!     Message::new(1, "12/05/23", "10:31", "Bob", "Hi there!"),
//! ];
//!
//! let config = OutputConfig::new().with_ids();
//! write_json(&messages, "output.json", &config, None)?;
//! let csv_string = to_csv(&messages, &config, None)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

use serde::Serialize;

use crate::Message;
use crate::core::media::{MediaArchive, MediaKind, resolve_message};
use crate::core::models::OutputConfig;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One exported message with only the enabled optional fields.
#[derive(Debug, Serialize)]
pub(crate) struct ExportRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    date: &'a str,
    time: &'a str,
    sender: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<MediaKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_file: Option<String>,
}

impl<'a> ExportRow<'a> {
    pub(crate) fn new(
        msg: &'a Message,
        config: &OutputConfig,
        archive: Option<&MediaArchive>,
    ) -> Self {
        let (media, media_file) = if config.include_media {
            let resolved = archive.map(|archive| resolve_message(msg, archive));
            match resolved {
                Some(found) => (Some(found.kind), found.name),
                None => (Some(MediaKind::Text), None),
            }
        } else {
            (None, None)
        };

        Self {
            id: config.include_ids.then_some(msg.id),
            timestamp: if config.include_timestamps {
                msg.datetime()
                    .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            } else {
                None
            },
            date: &msg.date,
            time: &msg.time,
            sender: &msg.sender,
            text: &msg.text,
            media,
            media_file,
        }
    }

    /// CSV header for a configuration, matching [`ExportRow::csv_record`].
    #[cfg(feature = "csv-output")]
    pub(crate) fn csv_header(config: &OutputConfig) -> Vec<&'static str> {
        let mut header = Vec::new();
        if config.include_ids {
            header.push("ID");
        }
        if config.include_timestamps {
            header.push("Timestamp");
        }
        header.extend(["Date", "Time", "Sender", "Text"]);
        if config.include_media {
            header.extend(["Media", "MediaFile"]);
        }
        header
    }

    /// CSV cells, in header order.
    #[cfg(feature = "csv-output")]
    pub(crate) fn csv_record(&self, config: &OutputConfig) -> Vec<String> {
        let mut record = Vec::new();
        if config.include_ids {
            record.push(self.id.map(|id| id.to_string()).unwrap_or_default());
        }
        if config.include_timestamps {
            record.push(self.timestamp.clone().unwrap_or_default());
        }
        record.extend([
            self.date.to_string(),
            self.time.to_string(),
            self.sender.to_string(),
            self.text.to_string(),
        ]);
        if config.include_media {
            record.push(self.media.map(|kind| kind.to_string()).unwrap_or_default());
            record.push(self.media_file.clone().unwrap_or_default());
        }
        record
    }
}

pub(crate) fn export_rows<'a>(
    messages: &'a [Message],
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Vec<ExportRow<'a>> {
    messages
        .iter()
        .map(|msg| ExportRow::new(msg, config, archive))
        .collect()
}
