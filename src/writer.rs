use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::parser::ArchiveRecord;
use crate::timestamp::{format_archive_date, TimestampStyle};

pub const NO_RESULTS: &str = "No URLs found";
pub const ENTRY_SEPARATOR: &str = " # archived on ";

pub fn output_path(domain: &str) -> PathBuf {
    PathBuf::from(format!("{domain}_wayback_urls.txt"))
}

/// Sort the serialized lines, drop exact duplicates, persist the listing.
/// Dedup is over the full line: the same URL under two capture dates keeps
/// both entries. Returns the number of entries written.
pub fn write_results(
    path: &Path,
    records: &[ArchiveRecord],
    style: TimestampStyle,
) -> Result<usize> {
    let mut lines: Vec<String> = records
        .iter()
        .map(|record| {
            format!(
                "{}{}{}",
                record.url,
                ENTRY_SEPARATOR,
                format_archive_date(&record.raw_timestamp, style)
            )
        })
        .collect();

    lines.sort();
    lines.dedup();

    let entry_count = lines.len();
    if lines.is_empty() {
        lines.push(NO_RESULTS.to_string());
    }

    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        action = "write",
        component = "result_writer",
        path = %path.display(),
        entries = entry_count,
        "Result listing written"
    );
    Ok(entry_count)
}
