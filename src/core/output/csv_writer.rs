//! CSV output writer.

use std::fs::File;
use std::io::Write;

use super::{ExportRow, export_rows};
use crate::Message;
use crate::core::media::MediaArchive;
use crate::core::models::OutputConfig;
use crate::error::Result;

/// Writes messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: depend on [`OutputConfig`]
///   - Basic: `Date`, `Time`, `Sender`, `Text`
///   - With ids: `ID` first
///   - With timestamps: `Timestamp` before `Date`
///   - With media: `Media`, `MediaFile` last
/// - Encoding: UTF-8
pub fn write_csv(
    messages: &[Message],
    output_path: &str,
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<()> {
    let file = File::create(output_path)?;
    write_to(file, messages, config, archive)
}

/// Converts messages to a CSV string.
///
/// Same format as [`write_csv`].
pub fn to_csv(
    messages: &[Message],
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<String> {
    let mut buffer = Vec::new();
    write_to(&mut buffer, messages, config, archive)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_to<W: Write>(
    sink: W,
    messages: &[Message],
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(sink);

    writer.write_record(ExportRow::csv_header(config))?;
    for row in export_rows(messages, config, archive) {
        writer.write_record(row.csv_record(config))?;
    }

    writer.flush()?;
    Ok(())
}
