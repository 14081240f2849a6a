use anyhow::Result;
use std::time::Instant;
use tracing::info;

use crate::query::{self, ArchiveResponse};
use crate::stats::{self, LookupResult};
use crate::timestamp::TimestampStyle;
use crate::utils::format_number;
use crate::{domain, parser, writer, Args};

pub fn run_lookup(args: &Args) -> Result<LookupResult> {
    lookup_against(args, query::CDX_ENDPOINT)
}

/// Validate, query, parse, persist, analyze. Strictly sequential: every
/// stage consumes the previous stage's complete output.
pub fn lookup_against(args: &Args, endpoint: &str) -> Result<LookupResult> {
    let total_start = Instant::now();

    let domain = domain::strip_scheme(&args.domain);
    domain::validate_domain(&domain)?;

    info!(
        action = "start",
        component = "lookup",
        domain = %domain,
        "Starting archive lookup"
    );

    let client = query::build_client()?;
    let response = query::fetch_index(&client, endpoint, &domain)?;
    let style = match &response {
        ArchiveResponse::Structured(_) => TimestampStyle::Structured,
        ArchiveResponse::Fallback(_) => TimestampStyle::Delimited,
    };

    let parsed = parser::parse_response(&response);
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| writer::output_path(&domain));
    let entry_count = writer::write_results(&output_path, &parsed.records, style)?;
    let summary = stats::analyze_results(&output_path)?;

    info!(
        action = "complete",
        component = "lookup",
        entries = entry_count,
        skipped = parsed.skipped,
        duration_ms = total_start.elapsed().as_millis(),
        "Archive lookup completed"
    );

    Ok(LookupResult {
        domain,
        output_path,
        entry_count,
        skipped_records: parsed.skipped,
        summary,
    })
}

pub fn print_lookup_results(result: &LookupResult) {
    println!("\n--- {} Wayback Archive ---", result.domain);
    println!("Output file: {}", result.output_path.display());
    println!("Archived URLs: {}", format_number(result.entry_count as u64));
    println!(
        "Records skipped (malformed): {}",
        format_number(u64::from(result.skipped_records))
    );

    match &result.summary {
        Some(summary) => {
            println!(
                "Distinct hosts: {}",
                format_number(summary.distinct_hosts as u64)
            );
            if !summary.top_extensions.is_empty() {
                println!("\nTop {} file extensions:", summary.top_extensions.len());
                for (extension, count) in &summary.top_extensions {
                    println!("- {}: {} URLs", extension, format_number(u64::from(*count)));
                }
            }
        }
        None => println!("No analysis available"),
    }
}
