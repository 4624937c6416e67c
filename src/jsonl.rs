// JSONL file reading

use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Read every record from a JSONL file, in file order
///
/// Blank lines are ignored. Lines that cannot be read or decoded are
/// logged and dropped so one bad line does not sink the whole file.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open JSONL file {}", path.display()))?;

    let records: Vec<T> = BufReader::new(file)
        .lines()
        .enumerate()
        .filter_map(|(index, line)| decode_line(path, index + 1, line))
        .collect();

    info!(file = ?path, count = records.len(), "Loaded records from JSONL");
    Ok(records)
}

/// Decode one line, or `None` when it is blank or unusable
fn decode_line<T: DeserializeOwned>(path: &Path, line_no: usize, line: io::Result<String>) -> Option<T> {
    let text = line
        .inspect_err(|e| warn!(file = ?path, line_no, error = %e, "Unreadable JSONL line dropped"))
        .ok()?;
    if text.trim().is_empty() {
        return None;
    }

    serde_json::from_str(&text)
        .inspect_err(|e| warn!(file = ?path, line_no, error = %e, "Undecodable JSONL line dropped"))
        .ok()
}
