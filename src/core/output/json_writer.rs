//! JSON output writer.

use std::fs::File;
use std::io::Write;

use super::export_rows;
use crate::Message;
use crate::core::media::MediaArchive;
use crate::core::models::OutputConfig;
use crate::error::Result;

/// Writes messages to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"date": "12/05/23", "time": "10:30", "sender": "Alice", "text": "Hello"},
///   {"date": "12/05/23", "time": "10:31", "sender": "Bob", "text": "Hi"}
/// ]
/// ```
pub fn write_json(
    messages: &[Message],
    output_path: &str,
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<()> {
    let json = to_json(messages, config, archive)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts messages to a pretty-printed JSON array.
pub fn to_json(
    messages: &[Message],
    config: &OutputConfig,
    archive: Option<&MediaArchive>,
) -> Result<String> {
    let rows = export_rows(messages, config, archive);
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_to_json_basic() {
        let messages = vec![
            Message::new(0, "12/05/23", "10:30", "Alice", "Hello"),
            Message::new(1, "12/05/23", "10:31", "Bob", "Hi"),
        ];
        let json = to_json(&messages, &OutputConfig::new(), None).unwrap();

        assert!(json.contains(r#""sender": "Alice""#));
        assert!(json.contains(r#""text": "Hello""#));
        assert!(json.contains(r#""date": "12/05/23""#));
        assert!(!json.contains("timestamp"));
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_to_json_with_metadata() {
        let msg = Message::new(7, "1/1/24", "0:00", "Alice", "Hi").with_timestamp(1_704_067_200_000);
        let config = OutputConfig::new().with_timestamps().with_ids();
        let json = to_json(&[msg], &config, None).unwrap();

        assert!(json.contains(r#""timestamp": "2024-01-01T00:00:00Z""#));
        assert!(json.contains(r#""id": 7"#));
    }

    #[test]
    fn test_media_without_archive_is_text() {
        let msg = Message::new(0, "1/1/24", "0:00", "Alice", "IMG-001.jpg");
        let json = to_json(&[msg], &OutputConfig::new().with_media(), None).unwrap();
        assert!(json.contains(r#""media": "text""#));
        assert!(!json.contains("media_file"));
    }

    #[test]
    fn test_write_json_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let messages = vec![Message::new(0, "1/1/24", "0:00", "Alice", "Hello")];
        write_json(&messages, path, &OutputConfig::new(), None).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed[0]["sender"], "Alice");
    }
}
