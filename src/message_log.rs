//! File-based log of outgoing messages, for debugging formatting defects.
//!
//! One JSON file per send/edit attempt, partitioned by date:
//! `<dir>/outgoing/YYYY-MM-DD/<chat>_<HH-MM-SS>-<micros>.json`. Logging is
//! best-effort; a failure to write a record must never affect sending.

use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CONFIG;

#[derive(Debug, Serialize)]
pub(crate) struct MessageLogRecord {
    pub timestamp: String,
    pub chat_id: i64,
    /// "send", "send_fallback" or "edit".
    pub action: &'static str,
    pub parse_mode: &'static str,
    pub content_type: &'static str,
    pub original_text: String,
    pub formatted_text: String,
    /// "sent" or the error text.
    pub outcome: String,
}

impl MessageLogRecord {
    pub fn new(
        chat_id: i64,
        action: &'static str,
        parse_mode: &'static str,
        content_type: &'static str,
        original_text: &str,
        formatted_text: &str,
        outcome: String,
    ) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            chat_id,
            action,
            parse_mode,
            content_type,
            original_text: original_text.to_string(),
            formatted_text: formatted_text.to_string(),
            outcome,
        }
    }
}

/// Writes the record if logging is enabled. Failures are logged and swallowed.
pub(crate) fn log_outgoing(record: &MessageLogRecord) {
    if !CONFIG.enable_message_logging {
        return;
    }
    if let Err(e) = write_record(Path::new(&CONFIG.message_log_dir), record) {
        log::warn!("Failed to write message log record: {}", e);
    }
}

fn write_record(log_dir: &Path, record: &MessageLogRecord) -> std::io::Result<()> {
    let path = record_path(log_dir, record.chat_id);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(record)?;
    fs::write(&path, json)?;
    log::debug!("Message log record written to {}", path.display());
    Ok(())
}

fn record_path(log_dir: &Path, chat_id: i64) -> PathBuf {
    let now = Local::now();
    let chat_prefix = if chat_id < 0 { "group" } else { "user" };
    log_dir
        .join("outgoing")
        .join(now.format("%Y-%m-%d").to_string())
        .join(format!(
            "{}_{}_{}-{:06}.json",
            chat_prefix,
            chat_id.unsigned_abs(),
            now.format("%H-%M-%S"),
            now.timestamp_subsec_micros()
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_all_fields() {
        let record = MessageLogRecord::new(
            42,
            "send",
            "MarkdownV2",
            "RAW",
            "a.b",
            "a\\.b",
            "sent".to_string(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"chat_id\":42"));
        assert!(json.contains("\"content_type\":\"RAW\""));
        assert!(json.contains("a\\\\.b"));
    }

    #[test]
    fn records_land_in_date_partitioned_directories() {
        let dir = tempfile::tempdir().unwrap();
        let record = MessageLogRecord::new(
            -100500,
            "send",
            "MarkdownV2",
            "FORMATTED",
            "текст",
            "текст",
            "sent".to_string(),
        );
        write_record(dir.path(), &record).unwrap();

        let outgoing = dir.path().join("outgoing");
        let date_dir = fs::read_dir(&outgoing).unwrap().next().unwrap().unwrap();
        let file = fs::read_dir(date_dir.path()).unwrap().next().unwrap().unwrap();
        let name = file.file_name().into_string().unwrap();
        assert!(name.starts_with("group_100500_"), "unexpected name {name}");
        assert!(name.ends_with(".json"));
        let body = fs::read_to_string(file.path()).unwrap();
        assert!(body.contains("\"outcome\": \"sent\""));
    }
}
