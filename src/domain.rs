use anyhow::Result;
use regex::Regex;

const DOMAIN_PATTERN: &str =
    r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$";

// Drop an optional scheme prefix and any trailing slashes.
pub fn strip_scheme(input: &str) -> String {
    let trimmed = input.trim();
    let bare = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    bare.trim_end_matches('/').to_string()
}

pub fn validate_domain(domain: &str) -> Result<()> {
    let pattern = Regex::new(DOMAIN_PATTERN)?;
    if !pattern.is_match(domain) {
        anyhow::bail!("Invalid domain: '{}'", domain);
    }
    Ok(())
}
