use super::types::Records;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Load records from a JSON file
///
/// If the file doesn't exist, returns a new empty record set.
/// If the file exists but has an unsupported version, returns an error.
/// Stored schemes are re-validated while parsing.
pub fn load_records(path: &Path) -> Result<Records> {
    if !path.exists() {
        debug!(path = %path.display(), "records file missing, starting empty");
        return Ok(Records::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open records file at {}", path.display()))?;

    let records: Records = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load records from {}", path.display()))?;

    // Version check
    if records.version != 1 {
        anyhow::bail!("Unsupported records version: {}", records.version);
    }

    records
        .check_marks()
        .with_context(|| format!("Invalid mark in {}", path.display()))?;

    debug!(
        path = %path.display(),
        courses = records.courses.len(),
        marks = records.marks.len(),
        "records loaded"
    );
    Ok(records)
}

/// Save records to a JSON file atomically
///
/// Uses atomic-write-file to ensure the file is never left in a corrupted state.
/// Creates the parent directory if it doesn't exist.
pub fn save_records(path: &Path, records: &Records) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, records).context("Failed to serialize records")?;

    file.commit().context("Failed to save records")?;

    debug!(path = %path.display(), "records saved");
    Ok(())
}
