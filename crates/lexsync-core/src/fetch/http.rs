//! Single-shot HTTP GET for model bytes.
//!
//! Reads the whole response body into memory; model files are bounded and
//! decoded immediately, the buffer never outlives the refresh cycle.

use super::FetchOptions;
use crate::error::SyncError;

/// Downloads `url` with one GET. A 200 response yields the body bytes; any
/// other status is an application failure carrying the response body text
/// as the message.
pub fn http_get(url: &str, options: &FetchOptions) -> Result<Vec<u8>, SyncError> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(|e| SyncError::transport(url, e))?;
    easy.get(true).map_err(|e| SyncError::transport(url, e))?;
    easy.follow_location(true)
        .map_err(|e| SyncError::transport(url, e))?;
    easy.max_redirections(10)
        .map_err(|e| SyncError::transport(url, e))?;
    easy.connect_timeout(options.connect_timeout)
        .map_err(|e| SyncError::transport(url, e))?;
    easy.timeout(options.fetch_timeout)
        .map_err(|e| SyncError::transport(url, e))?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
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
            message: String::from_utf8_lossy(&body).trim().to_string(),
        });
    }

    Ok(body)
}
