//! On-demand persistence of the session transcript.

use std::path::Path;

use chrono::Local;
use serde::Serialize;
use shoplite_client::{AnswerResult, Endpoint};
use thiserror::Error;

/// One question/answer exchange, recorded after each successful reply.
/// Entries are append-only and keep REPL iteration order.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub timestamp: String,
    pub question: String,
    pub response: AnswerResult,
}

impl TranscriptEntry {
    pub fn new(question: String, response: AnswerResult) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            question,
            response,
        }
    }
}

/// On-disk layout of one saved session log.
#[derive(Serialize)]
struct TranscriptFile<'a> {
    api_url: &'a str,
    timestamp: String,
    conversations: &'a [TranscriptEntry],
}

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write the whole transcript to a timestamped JSON file in `dir` and
/// return the file name. Every call snapshots afresh; saves within the
/// same second land on the same name and overwrite.
pub fn save_log_in(
    dir: &Path,
    endpoint: &Endpoint,
    entries: &[TranscriptEntry],
) -> Result<String, TranscriptError> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let filename = format!("shoplite_chat_log_{stamp}.json");

    let log = TranscriptFile {
        api_url: endpoint.as_str(),
        timestamp: stamp,
        conversations: entries,
    };
    let contents = serde_json::to_string_pretty(&log)?;
    std::fs::write(dir.join(&filename), contents)?;

    log::info!("saved {} transcript entries to {filename}", entries.len());
    Ok(filename)
}

/// Save into the current working directory, the documented layout.
pub fn save_log(endpoint: &Endpoint, entries: &[TranscriptEntry]) -> Result<String, TranscriptError> {
    save_log_in(Path::new("."), endpoint, entries)
}
