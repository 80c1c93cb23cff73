//! The refresh coordinator: one cycle = change check + fetch + decode per
//! artifact on worker threads, then an all-or-nothing commit.
//!
//! The live artifact set is published through an `ArcSwap`: analysis calls
//! take a snapshot and never synchronize with an in-flight cycle. Commit is
//! a single pointer store, so readers observe either the full previous set
//! or the full next set.

use super::pool::WorkerPool;
use super::status::{Status, StatusCell, SyncCell, SyncPhase};
use crate::config::SyncConfig;
use crate::detect::ChangeDetector;
use crate::error::{DecodeError, SyncError};
use crate::fetch::{self, FetchOptions};
use crate::resources::ResourceResolver;
use crate::source::SourceDescriptor;
use arc_swap::ArcSwap;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

/// One named source within a refresh request: a stable slot index for the
/// staged set plus the artifact name used in logs and failures.
#[derive(Debug, Clone)]
pub struct NamedSource {
    pub name: String,
    pub slot: usize,
    pub source: SourceDescriptor,
}

/// A family of artifacts refreshed together. Implementations supply the
/// request shape, the decoder per slot, and the commit function building
/// the next live set from the previous one plus this cycle's pieces.
pub trait ArtifactSet: Send + Sync + 'static {
    /// Validated named sources, cached between cycles.
    type Request: Clone + Send + Sync + 'static;
    /// Output of one successful fetch+decode.
    type Piece: Send + 'static;
    /// Per-cycle scratch holding decoded pieces until commit or rollback.
    type Staged: Send + 'static;
    /// The committed set; replaced atomically, never mutated in place.
    type Live: Send + Sync + 'static;

    fn sources(request: &Self::Request) -> Vec<NamedSource>;
    fn new_staged(request: &Self::Request) -> Self::Staged;
    fn decode(source: &NamedSource, bytes: Vec<u8>) -> Result<Self::Piece, DecodeError>;
    fn store(source: &NamedSource, piece: Self::Piece, staged: &mut Self::Staged);
    fn commit(previous: &Self::Live, staged: Self::Staged) -> Self::Live;
}

pub struct Coordinator<A: ArtifactSet> {
    live: ArcSwap<A::Live>,
    request: Mutex<Option<Arc<A::Request>>>,
    detector: Arc<ChangeDetector>,
    resolver: Arc<ResourceResolver>,
    options: FetchOptions,
    max_concurrent: usize,
    status: StatusCell,
    sync: SyncCell,
}

impl<A: ArtifactSet> Coordinator<A> {
    pub fn new(initial: A::Live, initial_status: Status, config: &SyncConfig) -> Self {
        let resolver = Arc::new(ResourceResolver::new(config.resource_dirs.clone()));
        let options = FetchOptions::from_config(config);
        Self {
            live: ArcSwap::from_pointee(initial),
            request: Mutex::new(None),
            detector: Arc::new(ChangeDetector::new((*resolver).clone(), options)),
            resolver,
            options,
            max_concurrent: config.max_concurrent_fetches,
            status: StatusCell::new(initial_status),
            sync: SyncCell::new(),
        }
    }

    /// Caches a validated request for subsequent cycles. Always applied,
    /// even while a cycle is running: the running cycle keeps the request
    /// it was accepted with.
    pub fn set_request(&self, request: A::Request) {
        let mut guard = self.request.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Arc::new(request));
    }

    pub fn request(&self) -> Option<Arc<A::Request>> {
        self.request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Snapshot of the committed artifact set. Never blocks, never torn.
    pub fn snapshot(&self) -> Arc<A::Live> {
        self.live.load_full()
    }

    pub fn status(&self) -> Status {
        self.status.load()
    }

    pub fn is_ready(&self) -> bool {
        self.status.load() == Status::Ready
    }

    /// Runs one refresh cycle over the cached request.
    ///
    /// Returns `Ok(true)` when every artifact committed, `Ok(false)` when
    /// the cycle rolled back. Setup failures (no cached request, or a cycle
    /// already running) surface as `Err` before any I/O.
    pub fn refresh(&self, mandatory: bool) -> Result<bool, SyncError> {
        let request = self.request().ok_or_else(|| {
            SyncError::Validation("no source paths configured for refresh".to_string())
        })?;

        if !self.sync.try_begin() {
            tracing::warn!("refresh rejected: another refresh is in progress");
            return Err(SyncError::RefreshInProgress);
        }

        let ok = self.run_cycle(&request, mandatory);

        // Safety net: a transient status must not outlive its cycle.
        if self.status.load().is_transient() {
            self.status.store(Status::Ready);
        }
        self.sync.store(SyncPhase::Idle);
        Ok(ok)
    }

    /// Submits a non-mandatory cycle to the pool and returns immediately.
    /// Failures are observable only through logs and an unchanged status.
    pub fn lazy_refresh(self: Arc<Self>, pool: &WorkerPool) {
        let coordinator = self;
        let submitted = pool.submit(move || match coordinator.refresh(false) {
            Ok(true) => {}
            Ok(false) => tracing::warn!("background refresh rolled back"),
            Err(e) => tracing::warn!("background refresh rejected: {}", e),
        });
        if !submitted {
            tracing::warn!("background refresh dropped: worker queue full");
        }
    }

    fn run_cycle(&self, request: &Arc<A::Request>, mandatory: bool) -> bool {
        let sources = A::sources(request);
        let previous_status = self.status.load();
        self.status.store(Status::Fetching);

        let mut staged = A::new_staged(request);
        let mut failures: Vec<(String, SyncError)> = Vec::new();

        let count = sources.len();
        let workers = self.max_concurrent.max(1).min(count.max(1));
        let work: Arc<Mutex<VecDeque<NamedSource>>> =
            Arc::new(Mutex::new(sources.into_iter().collect()));
        let (tx, rx) = mpsc::channel::<(NamedSource, Result<Option<A::Piece>, SyncError>)>();

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let work = Arc::clone(&work);
            let tx = tx.clone();
            let detector = Arc::clone(&self.detector);
            let resolver = Arc::clone(&self.resolver);
            let options = self.options;
            handles.push(std::thread::spawn(move || loop {
                let source = match work.lock() {
                    Ok(mut queue) => match queue.pop_front() {
                        Some(s) => s,
                        None => break,
                    },
                    Err(_) => break,
                };
                let result = fetch_one::<A>(&detector, &resolver, &options, &source, mandatory);
                if tx.send((source, result)).is_err() {
                    break;
                }
            }));
        }
        drop(tx);

        while let Ok((source, result)) = rx.recv() {
            match result {
                Ok(Some(piece)) => {
                    tracing::info!("decoded {} from {}", source.name, source.source);
                    A::store(&source, piece, &mut staged);
                }
                Ok(None) => {
                    tracing::debug!("{} not modified, fetch skipped", source.source);
                }
                Err(e) => {
                    tracing::warn!("{} failed: {}", source.name, e);
                    failures.push((source.name, e));
                }
            }
        }
        for handle in handles {
            handle
                .join()
                .unwrap_or_else(|e| panic!("refresh worker panicked: {:?}", e));
        }

        // All per-artifact attempts have resolved; commit or roll back.
        self.sync.store(SyncPhase::Finalizing);
        self.status.store(Status::Committing);

        if failures.is_empty() {
            let next = A::commit(&self.live.load(), staged);
            self.live.store(Arc::new(next));
            self.status.store(Status::Ready);
            tracing::info!("refresh committed ({} artifacts checked)", count);
            true
        } else {
            for (name, error) in &failures {
                tracing::warn!("refresh rolling back, {} failed: {}", name, error);
            }
            drop(staged);
            self.status.store(previous_status);
            false
        }
    }
}

fn fetch_one<A: ArtifactSet>(
    detector: &ChangeDetector,
    resolver: &ResourceResolver,
    options: &FetchOptions,
    source: &NamedSource,
    mandatory: bool,
) -> Result<Option<A::Piece>, SyncError> {
    if !detector.is_modified(&source.source, mandatory)? {
        return Ok(None);
    }
    tracing::info!("fetching {}", source.source);
    let bytes = fetch::fetch(&source.source, resolver, options)?;
    let piece = A::decode(source, bytes).map_err(|e| SyncError::Decode {
        name: source.name.clone(),
        source: e,
    })?;
    Ok(Some(piece))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::time::Duration;

    /// Minimal artifact set for coordinator tests: each source is a UTF-8
    /// blob stored under its name. A `corrupt` prefix fails decoding; a
    /// `slow:` prefix stalls it, to hold a cycle open.
    struct BlobSet;

    #[derive(Clone)]
    struct BlobRequest {
        sources: Vec<NamedSource>,
    }

    impl ArtifactSet for BlobSet {
        type Request = BlobRequest;
        type Piece = String;
        type Staged = HashMap<String, String>;
        type Live = HashMap<String, String>;

        fn sources(request: &Self::Request) -> Vec<NamedSource> {
            request.sources.clone()
        }

        fn new_staged(_request: &Self::Request) -> Self::Staged {
            HashMap::new()
        }

        fn decode(_source: &NamedSource, bytes: Vec<u8>) -> Result<Self::Piece, DecodeError> {
            let text = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(0))?;
            if text.starts_with("corrupt") {
                return Err(DecodeError::BadMagic);
            }
            if let Some(rest) = text.strip_prefix("slow:") {
                std::thread::sleep(Duration::from_millis(300));
                return Ok(rest.to_string());
            }
            Ok(text)
        }

        fn store(source: &NamedSource, piece: Self::Piece, staged: &mut Self::Staged) {
            staged.insert(source.name.clone(), piece);
        }

        fn commit(previous: &Self::Live, staged: Self::Staged) -> Self::Live {
            let mut next = previous.clone();
            next.extend(staged);
            next
        }
    }

    fn named(name: &str, path: &std::path::Path) -> NamedSource {
        NamedSource {
            name: name.to_string(),
            slot: 0,
            source: SourceDescriptor::parse(path.to_str().unwrap()).unwrap(),
        }
    }

    fn coordinator() -> Coordinator<BlobSet> {
        Coordinator::new(HashMap::new(), Status::Unloaded, &SyncConfig::default())
    }

    #[test]
    fn refresh_without_request_is_validation_error() {
        let c = coordinator();
        assert!(matches!(c.refresh(true), Err(SyncError::Validation(_))));
        assert_eq!(c.status(), Status::Unloaded);
    }

    #[test]
    fn mandatory_refresh_commits_all_blobs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), "alpha").unwrap();
        fs::write(dir.path().join("b.bin"), "beta").unwrap();

        let c = coordinator();
        c.set_request(BlobRequest {
            sources: vec![
                named("a", &dir.path().join("a.bin")),
                named("b", &dir.path().join("b.bin")),
            ],
        });

        assert!(c.refresh(true).unwrap());
        assert_eq!(c.status(), Status::Ready);
        assert!(c.is_ready());
        let live = c.snapshot();
        assert_eq!(live.get("a").unwrap(), "alpha");
        assert_eq!(live.get("b").unwrap(), "beta");
    }

    #[test]
    fn any_failure_rolls_back_every_staged_piece() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), "alpha").unwrap();
        fs::write(dir.path().join("b.bin"), "corrupt-bytes").unwrap();

        let c = coordinator();
        c.set_request(BlobRequest {
            sources: vec![
                named("a", &dir.path().join("a.bin")),
                named("b", &dir.path().join("b.bin")),
            ],
        });

        assert!(!c.refresh(true).unwrap());
        assert_eq!(c.status(), Status::Unloaded);
        assert!(c.snapshot().is_empty());
    }

    #[test]
    fn rollback_preserves_previously_committed_set() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        fs::write(&a, "alpha").unwrap();

        let c = coordinator();
        c.set_request(BlobRequest {
            sources: vec![named("a", &a)],
        });
        assert!(c.refresh(true).unwrap());

        fs::write(&a, "corrupt-now").unwrap();
        assert!(!c.refresh(true).unwrap());
        // Prior commit still serving; status back to Ready.
        assert_eq!(c.status(), Status::Ready);
        assert_eq!(c.snapshot().get("a").unwrap(), "alpha");
    }

    #[test]
    fn missing_source_fails_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let c = coordinator();
        c.set_request(BlobRequest {
            sources: vec![named("a", &dir.path().join("missing.bin"))],
        });
        assert!(!c.refresh(true).unwrap());
        assert_eq!(c.status(), Status::Unloaded);
    }

    #[test]
    fn unchanged_sources_skip_work_and_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        fs::write(&a, "alpha").unwrap();

        let c = coordinator();
        c.set_request(BlobRequest {
            sources: vec![named("a", &a)],
        });
        // Non-mandatory: first pass fetches (nothing cached), second skips.
        assert!(c.refresh(false).unwrap());
        assert!(c.refresh(false).unwrap());
        assert_eq!(c.status(), Status::Ready);
        assert_eq!(c.snapshot().get("a").unwrap(), "alpha");
    }

    #[test]
    fn concurrent_refresh_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        fs::write(&a, "slow:alpha").unwrap();

        let c = Arc::new(coordinator());
        c.set_request(BlobRequest {
            sources: vec![named("a", &a)],
        });

        let c2 = Arc::clone(&c);
        let slow = std::thread::spawn(move || c2.refresh(true));
        std::thread::sleep(Duration::from_millis(80));
        let quick = c.refresh(true);
        assert!(matches!(quick, Err(SyncError::RefreshInProgress)));
        assert!(slow.join().unwrap().unwrap());
        assert_eq!(c.status(), Status::Ready);
    }
}
