//! Export format selection.
//!
//! [`OutputFormat`] names the three export formats and knows how to detect
//! one from a file name. [`write_to_format`] and [`to_format_string`]
//! dispatch to the matching writer in [`core::output`](crate::core::output).
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> chatarchive::Result<()> {
//! use chatarchive::format::{OutputFormat, to_format_string};
//! use chatarchive::core::OutputConfig;
//! use chatarchive::Message;
//!
//! let messages = vec![Message::new(0, "12/05/23", "10:30", "Alice", "Hello!")];
//!
//! let format = OutputFormat::from_path("alice.jsonl")?;
//! let jsonl = to_format_string(&messages, format, &OutputConfig::new(), None)?;
//! assert_eq!(jsonl.lines().count(), 1);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::core::media::MediaArchive;
use crate::core::models::OutputConfig;
use crate::error::ChatArchiveError;

/// Export format.
///
/// ```rust
/// use chatarchive::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("ndjson").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Semicolon-delimited CSV (default)
    #[default]
    Csv,

    /// Pretty-printed JSON array
    Json,

    /// One JSON object per line (also accepted as `ndjson`)
    #[cfg_attr(feature = "cli", value(alias = "ndjson"))]
    Jsonl,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Every accepted format name, aliases included.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson"]
    }

    /// Every format.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl]
    }

    /// MIME type of the exported document.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
            OutputFormat::Jsonl => "application/x-ndjson",
        }
    }

    /// Picks the format from a file name's extension, case-insensitively.
    pub fn from_path(path: &str) -> Result<Self, ChatArchiveError> {
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        Self::from_name(&ext).ok_or_else(|| {
            ChatArchiveError::invalid_format(
                "output",
                format!("unknown file extension '.{ext}', expected one of: csv, json, jsonl"),
            )
        })
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            "jsonl" | "ndjson" => Some(OutputFormat::Jsonl),
            _ => None,
        }
    }

    fn required_feature(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv-output",
            OutputFormat::Json | OutputFormat::Jsonl => "json-output",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(&s.to_lowercase()).ok_or_else(|| {
            format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )
        })
    }
}

fn feature_disabled(format: OutputFormat) -> ChatArchiveError {
    ChatArchiveError::invalid_format(
        "output",
        format!(
            "{format} export requires the '{}' feature",
            format.required_feature()
        ),
    )
}

/// Writes messages to `path` in the given format.
///
/// `archive` is only consulted when `config.include_media` is set.
///
/// # Errors
///
/// Fails if the format's feature is disabled or the file can't be written.
#[allow(unused_variables)]
pub fn write_to_format(
    messages: &[Message],
    path: &str,
    format: OutputFormat,
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<(), ChatArchiveError> {
    log::debug!("writing {} messages as {format} to {path}", messages.len());

    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(messages, path, config, archive),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(messages, path, config, archive),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(messages, path, config, archive),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}

/// Renders messages to a string in the given format.
#[allow(unused_variables)]
pub fn to_format_string(
    messages: &[Message],
    format: OutputFormat,
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<String, ChatArchiveError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(messages, config, archive),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(messages, config, archive),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(messages, config, archive),
        #[allow(unreachable_patterns)]
        _ => Err(feature_disabled(format)),
    }
}
