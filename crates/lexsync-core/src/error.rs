//! Error taxonomy for the refresh pipeline.
//!
//! Setup errors (bad paths, refresh already running) are returned
//! synchronously before any I/O. Per-artifact errors during a cycle are
//! collected and rolled up into the cycle result instead of being thrown
//! past sibling fetches.

use thiserror::Error;

/// Transport-level failure during a probe or fetch, keeping the original cause.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Failure to decode fetched bytes into a usable artifact.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unrecognized model header")]
    BadMagic,
    #[error("unsupported model version {0}")]
    UnsupportedVersion(u8),
    #[error("truncated model data at offset {0}")]
    Truncated(usize),
    #[error("invalid utf-8 in model data at offset {0}")]
    InvalidUtf8(usize),
}

/// Errors surfaced by the refresh entry points and recorded per artifact
/// during a cycle.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Bad, empty, or unsupported source path; rejected before any I/O.
    #[error("invalid source: {0}")]
    Validation(String),

    /// A refresh cycle is already running; the new request is rejected,
    /// never queued.
    #[error("a refresh is already in progress")]
    RefreshInProgress,

    /// Local file absent and no bundled resource resolves the path.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// Network or disk failure during a probe or fetch.
    #[error("transport failure for {address}: {source}")]
    Transport {
        address: String,
        #[source]
        source: TransportError,
    },

    /// The server answered, but not with a usable response. The message is
    /// the server-provided body text.
    #[error("{address} returned HTTP {code}: {message}")]
    Application {
        address: String,
        code: u32,
        message: String,
    },

    /// Bytes were fetched but did not parse into a valid artifact.
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
}

impl SyncError {
    pub(crate) fn transport(address: &str, source: impl Into<TransportError>) -> Self {
        SyncError::Transport {
            address: address.to_string(),
            source: source.into(),
        }
    }
}
