//! JSONL event feed adapter
//!
//! Reads raw flow events from a JSON-lines file for replay or batch
//! evaluation. Malformed lines become validation-stage rejections
//! instead of aborting the whole feed.

use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::domain::{RawEvent, Rejection};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to read feed file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed feed contents
#[derive(Debug, Default)]
pub struct FeedBatch {
    pub events: Vec<RawEvent>,
    /// Lines that failed to parse, identified by line number
    pub rejected: Vec<(String, Rejection)>,
}

/// Read a JSONL feed file. Blank lines are skipped; a line that does
/// not parse as an event (bad direction, bad field types) is reported
/// as a rejection with its line number.
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<FeedBatch, FeedError> {
    let content = std::fs::read_to_string(path)?;
    let mut batch = FeedBatch::default();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawEvent>(line) {
            Ok(event) => batch.events.push(event),
            Err(e) => {
                let label = format!("line {}", index + 1);
                debug!(%label, error = %e, "dropping malformed feed line");
                batch
                    .rejected
                    .push((label, Rejection::validation(format!("Malformed event: {}", e))));
            }
        }
    }

    Ok(batch)
}
