use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Instant;
use tracing::{info, warn};

/// Public CDX index endpoint of the Wayback Machine.
pub const CDX_ENDPOINT: &str = "https://web.archive.org/cdx/search/cdx";

/// One index response, tagged with the encoding it actually arrived in.
#[derive(Debug)]
pub enum ArchiveResponse {
    Structured(String),
    Fallback(String),
}

pub fn build_client() -> Result<Client> {
    // No request timeout: an unresponsive index blocks the run rather than
    // producing a partial result.
    Client::builder()
        .user_agent(concat!("wayback-urls/", env!("CARGO_PKG_VERSION")))
        .timeout(None)
        .build()
        .context("Failed to build HTTP client")
}

/// Issue the bulk index query for `domain`. The JSON encoding is requested
/// first; if the body does not come back as a structured record array, the
/// same query is reissued in the comma-delimited text encoding.
pub fn fetch_index(client: &Client, endpoint: &str, domain: &str) -> Result<ArchiveResponse> {
    let start_time = Instant::now();
    let prefix = format!("{domain}/*");

    info!(
        action = "start",
        component = "index_query",
        domain = domain,
        "Querying archive index"
    );

    let body = request_encoding(client, endpoint, &prefix, "json")?;
    if is_structured(&body) {
        info!(
            action = "complete",
            component = "index_query",
            encoding = "structured",
            bytes = body.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Index query completed"
        );
        return Ok(ArchiveResponse::Structured(body));
    }

    warn!(
        action = "fallback",
        component = "index_query",
        "Structured response not parsable, retrying in delimited encoding"
    );

    let body = request_encoding(client, endpoint, &prefix, "csv")?;
    info!(
        action = "complete",
        component = "index_query",
        encoding = "fallback",
        bytes = body.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Index query completed"
    );
    Ok(ArchiveResponse::Fallback(body))
}

fn request_encoding(client: &Client, endpoint: &str, prefix: &str, output: &str) -> Result<String> {
    client
        .get(endpoint)
        .query(&[
            ("url", prefix),
            ("fl", "original,timestamp"),
            ("collapse", "urlkey"),
            ("output", output),
        ])
        .send()
        .context("Archive index query failed")?
        .error_for_status()
        .context("Archive index returned an error status")?
        .text()
        .context("Failed to read archive index response body")
}

// Structured means a record array whose first record is the
// ["original","timestamp"] header pair.
fn is_structured(body: &str) -> bool {
    match serde_json::from_str::<Vec<Vec<serde_json::Value>>>(body) {
        Ok(rows) => rows
            .first()
            .map_or(false, |header| {
                header.len() == 2 && header[0] == "original" && header[1] == "timestamp"
            }),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const STRUCTURED_BODY: &str =
        "[[\"original\",\"timestamp\"],\n[\"https://example.com/a\",\"20230115000000\"]]";

    #[test]
    fn test_structured_response_is_tagged() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("output".into(), "json".into()))
            .with_body(STRUCTURED_BODY)
            .create();

        let client = build_client().unwrap();
        let response = fetch_index(&client, &server.url(), "example.com").unwrap();

        mock.assert();
        match response {
            ArchiveResponse::Structured(body) => assert_eq!(body, STRUCTURED_BODY),
            other => panic!("expected structured tag, got {:?}", other),
        }
    }

    #[test]
    fn test_unparsable_body_falls_back_to_delimited() {
        let mut server = mockito::Server::new();
        let _json = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("output".into(), "json".into()))
            .with_body("<html>gateway error</html>")
            .create();
        let csv_body = "original,timestamp\nhttps://example.com/a,20230115000000\n";
        let csv = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("output".into(), "csv".into()))
            .with_body(csv_body)
            .create();

        let client = build_client().unwrap();
        let response = fetch_index(&client, &server.url(), "example.com").unwrap();

        csv.assert();
        match response {
            ArchiveResponse::Fallback(body) => assert_eq!(body, csv_body),
            other => panic!("expected fallback tag, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_body_is_still_structured() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("output".into(), "json".into()))
            .with_body("[[\"original\",\"timestamp\"]]")
            .create();

        let client = build_client().unwrap();
        let response = fetch_index(&client, &server.url(), "example.com").unwrap();
        assert!(matches!(response, ArchiveResponse::Structured(_)));
    }

    #[test]
    fn test_http_error_is_fatal() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("output".into(), "json".into()))
            .with_status(503)
            .create();

        let client = build_client().unwrap();
        assert!(fetch_index(&client, &server.url(), "example.com").is_err());
    }

    #[test]
    fn test_query_carries_prefix_and_fields() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("url".into(), "example.com/*".into()),
                Matcher::UrlEncoded("fl".into(), "original,timestamp".into()),
                Matcher::UrlEncoded("collapse".into(), "urlkey".into()),
                Matcher::UrlEncoded("output".into(), "json".into()),
            ]))
            .with_body("[[\"original\",\"timestamp\"]]")
            .create();

        let client = build_client().unwrap();
        fetch_index(&client, &server.url(), "example.com").unwrap();
        mock.assert();
    }
}
