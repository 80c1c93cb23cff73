//! Custom-dictionary segmenter facade over `;`-joined shard paths.
//!
//! Each shard is fetched and decoded independently; the committed trie is
//! rebuilt from the complete shard set in request order. A shard that was
//! not modified this cycle contributes its previously decoded entries, so
//! readers never see a trie missing an unchanged shard.

use crate::artifacts::dict::{decode_shard, DictEntry, DictTrie};
use crate::artifacts::Term;
use crate::config::SyncConfig;
use crate::error::{DecodeError, SyncError};
use crate::refresh::{ArtifactSet, Coordinator, NamedSource, Status, WorkerPool};
use crate::source::SourceDescriptor;
use std::collections::HashMap;
use std::sync::Arc;

/// Validated dictionary shard paths, in caller order.
#[derive(Debug, Clone)]
pub struct DictRequest {
    sources: Vec<SourceDescriptor>,
}

impl DictRequest {
    /// Parses a `;`-joined shard path list; any bad element fails the whole
    /// request before any I/O.
    pub fn parse(joined: &str) -> Result<Self, SyncError> {
        Ok(Self {
            sources: SourceDescriptor::parse_list(joined)?,
        })
    }

    pub fn paths(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.address().to_string()).collect()
    }
}

/// Per-cycle scratch: freshly decoded entries per shard slot, plus the
/// request's source list so commit can merge in order.
pub struct DictStaged {
    sources: Vec<SourceDescriptor>,
    shards: Vec<Option<Vec<DictEntry>>>,
}

/// The committed dictionary: the merged trie plus each shard's decoded
/// entries keyed by address, kept for reuse when a shard is unchanged.
pub struct DictSet {
    pub trie: Arc<DictTrie>,
    shards: HashMap<String, Arc<Vec<DictEntry>>>,
}

impl DictSet {
    fn cold() -> Self {
        Self {
            trie: Arc::new(DictTrie::empty()),
            shards: HashMap::new(),
        }
    }
}

/// Marker type wiring dictionary shards into the coordinator.
pub struct DictShards;

impl ArtifactSet for DictShards {
    type Request = DictRequest;
    type Piece = Vec<DictEntry>;
    type Staged = DictStaged;
    type Live = DictSet;

    fn sources(request: &Self::Request) -> Vec<NamedSource> {
        request
            .sources
            .iter()
            .enumerate()
            .map(|(slot, source)| NamedSource {
                name: source.short_name().to_string(),
                slot,
                source: source.clone(),
            })
            .collect()
    }

    fn new_staged(request: &Self::Request) -> Self::Staged {
        DictStaged {
            sources: request.sources.clone(),
            shards: vec![None; request.sources.len()],
        }
    }

    fn decode(_source: &NamedSource, bytes: Vec<u8>) -> Result<Self::Piece, DecodeError> {
        decode_shard(&bytes)
    }

    fn store(source: &NamedSource, piece: Self::Piece, staged: &mut Self::Staged) {
        staged.shards[source.slot] = Some(piece);
    }

    fn commit(previous: &Self::Live, staged: Self::Staged) -> Self::Live {
        let mut shards = HashMap::with_capacity(staged.sources.len());
        let mut ordered: Vec<Arc<Vec<DictEntry>>> = Vec::with_capacity(staged.sources.len());
        for (source, fresh) in staged.sources.iter().zip(staged.shards) {
            let entries = match fresh {
                Some(entries) => Arc::new(entries),
                None => match previous.shards.get(source.address()) {
                    Some(cached) => Arc::clone(cached),
                    None => {
                        tracing::warn!(
                            "no data for {} this cycle and no cached copy; shard contributes no entries",
                            source.address()
                        );
                        Arc::new(Vec::new())
                    }
                },
            };
            shards.insert(source.address().to_string(), Arc::clone(&entries));
            ordered.push(entries);
        }
        let trie = DictTrie::from_shards(ordered.iter().map(|e| e.as_slice()));
        tracing::info!("dictionary rebuilt with {} entries", trie.len());
        DictSet {
            trie: Arc::new(trie),
            shards,
        }
    }
}

pub struct DictSegmenter {
    coordinator: Arc<Coordinator<DictShards>>,
    pool: WorkerPool,
}

impl DictSegmenter {
    /// Cold segmenter: empty dictionary, `Unloaded` until a refresh commits.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            coordinator: Arc::new(Coordinator::new(
                DictSet::cold(),
                Status::Unloaded,
                config,
            )),
            pool: WorkerPool::new(config.lazy_workers),
        }
    }

    /// Segmenter loaded synchronously from a `;`-joined path list.
    /// Validation errors surface here; a shard failure leaves the segmenter
    /// constructed but not ready, so check `is_ready`.
    pub fn from_paths(joined: &str, config: &SyncConfig) -> Result<Self, SyncError> {
        let segmenter = Self::new(config);
        segmenter.reload(joined)?;
        Ok(segmenter)
    }

    /// Synchronous, mandatory reload of the given shard paths.
    pub fn reload(&self, joined: &str) -> Result<bool, SyncError> {
        self.coordinator.set_request(DictRequest::parse(joined)?);
        self.coordinator.refresh(true)
    }

    /// Validates and caches the path list, then refreshes in the background.
    pub fn lazy(&self, joined: &str) -> Result<(), SyncError> {
        self.coordinator.set_request(DictRequest::parse(joined)?);
        Arc::clone(&self.coordinator).lazy_refresh(&self.pool);
        Ok(())
    }

    /// Re-runs the last configured request.
    pub fn refresh(&self, mandatory: bool) -> Result<bool, SyncError> {
        self.coordinator.refresh(mandatory)
    }

    pub fn is_ready(&self) -> bool {
        self.coordinator.is_ready()
    }

    pub fn status(&self) -> Status {
        self.coordinator.status()
    }

    /// Snapshot of the committed dictionary.
    pub fn dictionary(&self) -> Arc<DictTrie> {
        Arc::clone(&self.coordinator.snapshot().trie)
    }

    /// Segments `text` against the committed dictionary.
    pub fn seg(&self, text: &str) -> Vec<Term> {
        self.coordinator.snapshot().trie.segment(text)
    }

    /// The shard paths of the last configured request.
    pub fn custom_paths(&self) -> Vec<String> {
        self.coordinator
            .request()
            .map(|r| r.paths())
            .unwrap_or_default()
    }

    /// Shard file names of the last configured request, for display.
    pub fn short_custom_paths(&self) -> Vec<String> {
        self.coordinator
            .request()
            .map(|r| {
                r.sources
                    .iter()
                    .map(|s| s.short_name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}
