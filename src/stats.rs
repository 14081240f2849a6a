use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

use crate::writer::{ENTRY_SEPARATOR, NO_RESULTS};

const TOP_EXTENSIONS: usize = 5;

/// Summary statistics over the persisted listing.
#[derive(Debug, PartialEq, Eq)]
pub struct UrlSummary {
    pub distinct_hosts: usize,
    pub top_extensions: Vec<(String, u32)>,
}

#[derive(Debug)]
pub struct LookupResult {
    pub domain: String,
    pub output_path: PathBuf,
    pub entry_count: usize,
    pub skipped_records: u32,
    pub summary: Option<UrlSummary>,
}

/// Compute the summary from the persisted listing. An absent, empty, or
/// sentinel-only file has no summary.
pub fn analyze_results(path: &Path) -> Result<Option<UrlSummary>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() || (lines.len() == 1 && lines[0] == NO_RESULTS) {
        return Ok(None);
    }

    let mut hosts = HashSet::new();
    let mut extension_counts: HashMap<String, u32> = HashMap::new();

    for line in &lines {
        let url_part = line
            .split_once(ENTRY_SEPARATOR)
            .map(|(url, _)| url)
            .unwrap_or(line);
        let url = match Url::parse(url_part) {
            Ok(url) => url,
            Err(_) => continue,
        };
        if let Some(host) = url.host_str() {
            hosts.insert(format!("{}://{}", url.scheme(), host));
        }
        if let Some(extension) = path_extension(&url) {
            *extension_counts.entry(extension).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, u32)> = extension_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_EXTENSIONS);

    info!(
        action = "complete",
        component = "analyzer",
        distinct_hosts = hosts.len(),
        extensions = ranked.len(),
        "Listing analysis completed"
    );

    Ok(Some(UrlSummary {
        distinct_hosts: hosts.len(),
        top_extensions: ranked,
    }))
}

// Text after the final '.' of the last path segment; a segment without a
// dot, or with an empty stem or suffix, contributes nothing.
fn path_extension(url: &Url) -> Option<String> {
    let segment = url.path().rsplit('/').next()?;
    let (stem, extension) = segment.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_string())
}
