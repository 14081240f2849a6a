use serde::Deserialize;
use tracing::warn;

use crate::query::ArchiveResponse;

/// One index row: the original URL plus the raw capture stamp (0-14 digits,
/// possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    pub url: String,
    pub raw_timestamp: String,
}

#[derive(Debug, Default)]
pub struct ParsedRecords {
    pub records: Vec<ArchiveRecord>,
    pub skipped: u32,
}

/// One structured body line, a JSON array `[url, timestamp]`. Either field
/// can arrive as the literal `null`.
#[derive(Debug, Deserialize)]
struct StructuredRow(Option<String>, Option<String>);

/// Convert a tagged index response into archive records. The format is
/// dispatched exactly once; both arms produce the same record contract.
pub fn parse_response(response: &ArchiveResponse) -> ParsedRecords {
    match response {
        ArchiveResponse::Structured(body) => parse_structured(body),
        ArchiveResponse::Fallback(body) => parse_fallback(body),
    }
}

fn parse_structured(body: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    for line in body.lines() {
        let row = trim_row(line);
        if row.is_empty() || row == "[" || row == "]" {
            continue;
        }

        match serde_json::from_str::<StructuredRow>(row) {
            Ok(StructuredRow(Some(url), timestamp)) => {
                if url == "original" && timestamp.as_deref() == Some("timestamp") {
                    continue;
                }
                parsed.records.push(ArchiveRecord {
                    url,
                    raw_timestamp: timestamp.unwrap_or_default(),
                });
            }
            Ok(StructuredRow(None, _)) => {
                parsed.skipped += 1;
                warn!(
                    action = "skip",
                    component = "response_parser",
                    reason = "null_url",
                    "Dropped record with null URL field"
                );
            }
            // Malformed structured bodies can carry plain delimited rows
            // mid-stream.
            Err(_) if row.contains(',') => match delimited_row(row) {
                Some(record) => parsed.records.push(record),
                None => parsed.skipped += 1,
            },
            Err(error) => {
                parsed.skipped += 1;
                warn!(
                    action = "skip",
                    component = "response_parser",
                    error = %error,
                    "Dropped unparsable structured row"
                );
            }
        }
    }

    parsed
}

// Delimited bodies are header-row-first, one url,timestamp pair per line.
fn parse_fallback(body: &str) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    for line in body.lines() {
        let row = line.trim();
        if row.is_empty() {
            continue;
        }
        match delimited_row(row) {
            Some(record) => {
                if record.url == "original" && record.raw_timestamp == "timestamp" {
                    continue;
                }
                parsed.records.push(record);
            }
            None => {
                parsed.skipped += 1;
                warn!(
                    action = "skip",
                    component = "response_parser",
                    reason = "empty_url",
                    "Dropped delimited row without a URL"
                );
            }
        }
    }

    parsed
}

// Split on the first comma, stripping surrounding quotes from both fields.
// A row with no comma is a URL with no recorded stamp.
fn delimited_row(row: &str) -> Option<ArchiveRecord> {
    let (url, timestamp) = match row.split_once(',') {
        Some((url, timestamp)) => (url, timestamp),
        None => (row, ""),
    };
    let url = strip_quotes(url);
    if url.is_empty() {
        return None;
    }
    Some(ArchiveRecord {
        url: url.to_string(),
        raw_timestamp: strip_quotes(timestamp).to_string(),
    })
}

fn strip_quotes(field: &str) -> &str {
    field.trim().trim_matches(&['"', '\''][..])
}

fn trim_row(line: &str) -> &str {
    let mut row = line.trim();
    row = row.strip_suffix(',').unwrap_or(row);
    if row.starts_with("[[") {
        row = &row[1..];
    }
    if row.ends_with("]]") {
        row = &row[..row.len() - 1];
    }
    row.trim()
}
