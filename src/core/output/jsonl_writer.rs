//! JSON Lines (JSONL) output writer.
//!
//! One object per line, suited to line-oriented tools and streaming readers.

use std::fs::File;
use std::io::{BufWriter, Write};

use super::export_rows;
use crate::Message;
use crate::core::media::MediaArchive;
use crate::core::models::OutputConfig;
use crate::error::Result;

/// Writes messages to JSONL (JSON Lines) format.
///
/// ```jsonl
/// {"date":"12/05/23","time":"10:30","sender":"Alice","text":"Hello"}
/// {"date":"12/05/23","time":"10:31","sender":"Bob","text":"Hi"}
/// ```
pub fn write_jsonl(
    messages: &[Message],
    output_path: &str,
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(&mut writer, messages, config, archive)?;
    writer.flush()?;
    Ok(())
}

/// Converts messages to a JSONL string.
pub fn to_jsonl(
    messages: &[Message],
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<String> {
    let mut buffer = Vec::new();
    write_lines(&mut buffer, messages, config, archive)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_lines<W: Write>(
    writer: &mut W,
    messages: &[Message],
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<()> {
    for row in export_rows(messages, config, archive) {
        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
