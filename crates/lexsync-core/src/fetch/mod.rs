//! Source retrieval: one blocking round trip per call.
//!
//! Remote sources use the curl crate (libcurl): a HEAD probe for freshness
//! metadata and a GET for the model bytes. Local sources read the
//! filesystem with an optional bundled-resource fallback. All calls run in
//! the current thread; the refresh cycle dispatches them on worker threads.

mod http;
mod local;
mod probe;

pub use http::http_get;
pub use local::read_local;
pub use probe::{probe, ProbeResult};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::resources::ResourceResolver;
use crate::source::{Scheme, SourceDescriptor};
use std::time::Duration;

/// Timeouts applied to remote probes and fetches.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub probe_timeout: Duration,
    pub fetch_timeout: Duration,
}

impl FetchOptions {
    pub fn from_config(cfg: &SyncConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            probe_timeout: cfg.probe_timeout(),
            fetch_timeout: cfg.fetch_timeout(),
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

/// Retrieves the bytes for one source, dispatching on its scheme. The
/// returned buffer is owned by the caller; nothing is retained here.
pub fn fetch(
    source: &SourceDescriptor,
    resolver: &ResourceResolver,
    options: &FetchOptions,
) -> Result<Vec<u8>, SyncError> {
    match source.scheme() {
        Scheme::Http | Scheme::Https => http_get(source.address(), options),
        Scheme::Local => read_local(source.address(), resolver),
    }
}
