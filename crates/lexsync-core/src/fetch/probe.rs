//! HTTP HEAD / metadata probing.
//!
//! Fetches response headers and captures `Last-Modified` and `ETag` for the
//! change detector. A probe that cannot reach the server is a transport
//! failure; a reachable server answering non-200 is an application failure.
//! Neither may be read as "not modified".

use super::FetchOptions;
use crate::error::SyncError;
use chrono::{DateTime, Utc};
use std::str;

/// Result of a HEAD request: freshness metadata for conditional fetch.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// HTTP status code of the probe (always 200 on the Ok path).
    pub code: u32,
    /// Parsed `Last-Modified` if present and well-formed.
    pub last_modified: Option<DateTime<Utc>>,
    /// `ETag` value if present, quotes stripped.
    pub etag: Option<String>,
}

/// Performs a HEAD request and returns parsed freshness metadata.
///
/// Follows redirects. Runs in the current thread.
pub fn probe(url: &str, options: &FetchOptions) -> Result<ProbeResult, SyncError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(|e| SyncError::transport(url, e))?;
    easy.nobody(true).map_err(|e| SyncError::transport(url, e))?; // HEAD request
    easy.follow_location(true)
        .map_err(|e| SyncError::transport(url, e))?;
    easy.connect_timeout(options.connect_timeout)
        .map_err(|e| SyncError::transport(url, e))?;
    easy.timeout(options.probe_timeout)
        .map_err(|e| SyncError::transport(url, e))?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(|e| SyncError::transport(url, e))?;
        transfer
            .perform()
            .map_err(|e| SyncError::transport(url, e))?;
    }

    let code = easy
        .response_code()
        .map_err(|e| SyncError::transport(url, e))?;
    if code != 200 {
        return Err(SyncError::Application {
            address: url.to_string(),
            code,
            message: format!("HEAD returned HTTP {}", code),
        });
    }

    let (last_modified, etag) = parse_probe_headers(&headers);
    Ok(ProbeResult {
        code,
        last_modified,
        etag,
    })
}

/// Parse collected header lines into freshness metadata. Redirect chains
/// deliver several header blocks; the last occurrence wins.
fn parse_probe_headers(lines: &[String]) -> (Option<DateTime<Utc>>, Option<String>) {
    let mut last_modified = None;
    let mut etag = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("last-modified") {
                last_modified = parse_http_date(value);
            }
            if name.eq_ignore_ascii_case("etag") {
                etag = Some(value.trim_matches('"').to_string());
            }
        }
    }

    (last_modified, etag)
}

/// HTTP-date (IMF-fixdate) is an RFC 2822 subset; unparseable values are
/// dropped rather than failing the probe.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
