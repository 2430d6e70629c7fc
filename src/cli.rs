//! Command-line interface definition using clap.
//!
//! [`Args`] describes the `chatarchive` binary. Everything the binary does
//! is available through the library; this module only maps flags onto the
//! library's config types.

use clap::Parser;

use crate::config::{ArchiveConfig, ContinuationPolicy, ParserConfig};
use crate::core::OutputConfig;
use crate::format::OutputFormat;

/// Output file stem used when `--output` is omitted.
pub const DEFAULT_OUTPUT_STEM: &str = "chat_export";

/// Load a WhatsApp chat export, pick who you are, search it and export it
/// to CSV, JSON or JSONL.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatarchive")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatarchive \"WhatsApp Chat with Bob.zip\"
    chatarchive export/ --list --auto-me
    chatarchive chat.zip --chat Family --search dinner
    chatarchive chat.zip --me 2 -f jsonl -o family.jsonl --media")]
pub struct Args {
    /// Path to a .zip export, an unpacked export directory or a .txt transcript
    pub input: String,

    /// Path to output file [default: chat_export.<format extension>]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (detected from --output when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pick yourself by 1-based position in the sender list instead of being asked
    #[arg(long, value_name = "N", conflicts_with = "auto_me")]
    pub me: Option<String>,

    /// Use the most frequent sender of the first chat as yourself
    #[arg(long)]
    pub auto_me: bool,

    /// Chat to search and export, by file name or title (default: first)
    #[arg(long, value_name = "NAME")]
    pub chat: Option<String>,

    /// Case-insensitive text to look for in the selected chat
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Only fold lines that start with whitespace into the previous message
    #[arg(long)]
    pub strict_continuation: bool,

    /// Print the summary only, don't write an export
    #[arg(long)]
    pub list: bool,

    /// Include timestamps in output
    #[arg(short = 't', long)]
    pub timestamps: bool,

    /// Include message IDs in output
    #[arg(long)]
    pub ids: bool,

    /// Include resolved media kind and file in output
    #[arg(long)]
    pub media: bool,

    /// Log debug details to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Transcript parsing configuration.
    pub fn parser_config(&self) -> ParserConfig {
        let policy = if self.strict_continuation {
            ContinuationPolicy::Strict
        } else {
            ContinuationPolicy::Loose
        };
        ParserConfig::new().with_continuation(policy)
    }

    /// Archive loading configuration.
    pub fn archive_config(&self) -> ArchiveConfig {
        ArchiveConfig::new()
    }

    /// Export configuration.
    pub fn output_config(&self) -> OutputConfig {
        let mut config = OutputConfig::new();
        if self.timestamps {
            config = config.with_timestamps();
        }
        if self.ids {
            config = config.with_ids();
        }
        if self.media {
            config = config.with_media();
        }
        config
    }

    /// Export format: `--format`, else the output extension, else CSV.
    pub fn output_format(&self) -> OutputFormat {
        self.format
            .or_else(|| {
                self.output
                    .as_deref()
                    .and_then(|path| OutputFormat::from_path(path).ok())
            })
            .unwrap_or_default()
    }

    /// Output path: `--output` as given, else the default stem with the
    /// format's extension.
    pub fn output_path(&self) -> String {
        match &self.output {
            Some(path) => path.clone(),
            None => format!("{DEFAULT_OUTPUT_STEM}.{}", self.output_format().extension()),
        }
    }

    /// Log filter implied by `--verbose` / `--quiet`.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
