//! Change detection: decides whether a source must be re-fetched.
//!
//! Keeps per-address freshness metadata (`Last-Modified`, `ETag` for remote
//! sources, filesystem mtime for local ones), created on first successful
//! check and advanced on every positive determination. The cache lives for
//! the process; it is only read and written during a refresh cycle, which
//! runs single-flight.

use crate::error::SyncError;
use crate::fetch::{self, FetchOptions};
use crate::resources::ResourceResolver;
use crate::source::{Scheme, SourceDescriptor};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Cached freshness metadata for one source address.
#[derive(Debug, Clone, Default)]
struct Freshness {
    last_modified: Option<DateTime<Utc>>,
    etag: Option<String>,
}

pub struct ChangeDetector {
    states: Mutex<HashMap<String, Freshness>>,
    resolver: ResourceResolver,
    options: FetchOptions,
}

impl ChangeDetector {
    pub fn new(resolver: ResourceResolver, options: FetchOptions) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            resolver,
            options,
        }
    }

    /// Reports whether `source` must be re-fetched. `mandatory` skips all
    /// metadata comparison and always reports modified (first load / forced
    /// reload). A positive determination caches the new metadata before
    /// returning; failures to reach the source propagate as errors, never
    /// as "not modified".
    pub fn is_modified(
        &self,
        source: &SourceDescriptor,
        mandatory: bool,
    ) -> Result<bool, SyncError> {
        if mandatory {
            return Ok(true);
        }
        match source.scheme() {
            Scheme::Http | Scheme::Https => self.remote_modified(source.address()),
            Scheme::Local => self.local_modified(source.address()),
        }
    }

    fn remote_modified(&self, address: &str) -> Result<bool, SyncError> {
        let probe = fetch::probe(address, &self.options)?;

        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        let cached = states.get(address);
        let modified = remote_changed(
            cached.and_then(|f| f.last_modified),
            cached.and_then(|f| f.etag.as_deref()),
            probe.last_modified,
            probe.etag.as_deref(),
        );
        if modified {
            states.insert(
                address.to_string(),
                Freshness {
                    last_modified: probe.last_modified,
                    etag: probe.etag,
                },
            );
        }
        Ok(modified)
    }

    fn local_modified(&self, address: &str) -> Result<bool, SyncError> {
        let path = Path::new(address);
        if !path.exists() {
            // A bundled resource is static: readable, never re-fetched.
            return if self.resolver.resolve(address).is_some() {
                Ok(false)
            } else {
                Err(SyncError::SourceNotFound(address.to_string()))
            };
        }

        let metadata = std::fs::metadata(path).map_err(|e| SyncError::transport(address, e))?;
        let mtime: DateTime<Utc> = metadata
            .modified()
            .map_err(|e| SyncError::transport(address, e))?
            .into();

        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());
        let cached = states.get(address).and_then(|f| f.last_modified);
        let modified = match cached {
            None => true,
            Some(prev) => mtime > prev,
        };
        if modified {
            states.insert(
                address.to_string(),
                Freshness {
                    last_modified: Some(mtime),
                    etag: None,
                },
            );
        }
        Ok(modified)
    }
}

/// Remote comparison: modified if the probed timestamp is strictly newer,
/// or, with timestamps tied or absent, a cached entity tag no longer matches.
fn remote_changed(
    cached_lm: Option<DateTime<Utc>>,
    cached_etag: Option<&str>,
    probe_lm: Option<DateTime<Utc>>,
    probe_etag: Option<&str>,
) -> bool {
    let mut modified = match (cached_lm, probe_lm) {
        (None, _) => true,
        (Some(prev), Some(cur)) => cur > prev,
        (Some(_), None) => false,
    };
    if !modified {
        if let Some(prev_tag) = cached_etag {
            modified = probe_etag != Some(prev_tag);
        }
    }
    modified
}
