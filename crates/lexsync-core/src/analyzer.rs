//! Lexical analyzer facade: segmentation, POS tagging, and NER backed by
//! hot-reloadable models.
//!
//! The facade composes a refresh coordinator over the cws/pos/ner artifact
//! set. Analysis calls read the committed snapshot and never wait on an
//! in-flight refresh; they observe either the pre- or post-cycle models,
//! never a mixture.

use crate::artifacts::lexical::{NerModel, PosModel, SegmenterModel, OUTSIDE_LABEL};
use crate::artifacts::Term;
use crate::config::SyncConfig;
use crate::error::{DecodeError, SyncError};
use crate::refresh::{ArtifactSet, Coordinator, NamedSource, Status, WorkerPool};
use crate::source::SourceDescriptor;
use std::sync::Arc;

const SLOT_CWS: usize = 0;
const SLOT_POS: usize = 1;
const SLOT_NER: usize = 2;

/// Validated model sources for one analyzer. Only the segmenter is
/// required; POS and NER are optional extras.
#[derive(Debug, Clone)]
pub struct LexicalRequest {
    cws: SourceDescriptor,
    pos: Option<SourceDescriptor>,
    ner: Option<SourceDescriptor>,
}

impl LexicalRequest {
    /// Parses and validates the path set before any I/O. Empty optional
    /// paths mean "not requested".
    pub fn parse(
        cws: &str,
        pos: Option<&str>,
        ner: Option<&str>,
    ) -> Result<Self, SyncError> {
        if cws.trim().is_empty() {
            return Err(SyncError::Validation(
                "no segmentation model path given".to_string(),
            ));
        }
        let cws = SourceDescriptor::parse(cws)?;
        let pos = pos
            .filter(|p| !p.trim().is_empty())
            .map(SourceDescriptor::parse)
            .transpose()?;
        let ner = ner
            .filter(|p| !p.trim().is_empty())
            .map(SourceDescriptor::parse)
            .transpose()?;
        Ok(Self { cws, pos, ner })
    }
}

/// Decoded models staged during one cycle.
#[derive(Default)]
pub struct LexicalStaged {
    segmenter: Option<SegmenterModel>,
    tagger: Option<PosModel>,
    recognizer: Option<NerModel>,
}

pub enum LexicalPiece {
    Segmenter(SegmenterModel),
    Tagger(PosModel),
    Recognizer(NerModel),
}

/// The committed model set. Replaced as one unit; the capability flags are
/// set in the same commit as the artifacts they describe.
pub struct ModelSet {
    pub segmenter: Arc<SegmenterModel>,
    pub tagger: Option<Arc<PosModel>>,
    pub recognizer: Option<Arc<NerModel>>,
    /// POS tagging enabled (a tagger has been committed).
    pub pos_tagging: bool,
    /// Entity recognition enabled (a recognizer has been committed).
    pub ner: bool,
}

impl ModelSet {
    fn cold() -> Self {
        Self {
            segmenter: Arc::new(SegmenterModel::empty()),
            tagger: None,
            recognizer: None,
            pos_tagging: false,
            ner: false,
        }
    }
}

/// Marker type wiring the lexical artifact family into the coordinator.
pub struct LexicalModels;

impl ArtifactSet for LexicalModels {
    type Request = LexicalRequest;
    type Piece = LexicalPiece;
    type Staged = LexicalStaged;
    type Live = ModelSet;

    fn sources(request: &Self::Request) -> Vec<NamedSource> {
        let mut sources = vec![NamedSource {
            name: "cws".to_string(),
            slot: SLOT_CWS,
            source: request.cws.clone(),
        }];
        if let Some(pos) = &request.pos {
            sources.push(NamedSource {
                name: "pos".to_string(),
                slot: SLOT_POS,
                source: pos.clone(),
            });
        }
        if let Some(ner) = &request.ner {
            sources.push(NamedSource {
                name: "ner".to_string(),
                slot: SLOT_NER,
                source: ner.clone(),
            });
        }
        sources
    }

    fn new_staged(_request: &Self::Request) -> Self::Staged {
        LexicalStaged::default()
    }

    fn decode(source: &NamedSource, bytes: Vec<u8>) -> Result<Self::Piece, DecodeError> {
        match source.slot {
            SLOT_CWS => Ok(LexicalPiece::Segmenter(SegmenterModel::decode(&bytes)?)),
            SLOT_POS => Ok(LexicalPiece::Tagger(PosModel::decode(&bytes)?)),
            SLOT_NER => Ok(LexicalPiece::Recognizer(NerModel::decode(&bytes)?)),
            _ => unreachable!("unknown lexical model slot"),
        }
    }

    fn store(_source: &NamedSource, piece: Self::Piece, staged: &mut Self::Staged) {
        match piece {
            LexicalPiece::Segmenter(m) => staged.segmenter = Some(m),
            LexicalPiece::Tagger(m) => staged.tagger = Some(m),
            LexicalPiece::Recognizer(m) => staged.recognizer = Some(m),
        }
    }

    fn commit(previous: &Self::Live, staged: Self::Staged) -> Self::Live {
        let segmenter = staged
            .segmenter
            .map(Arc::new)
            .unwrap_or_else(|| Arc::clone(&previous.segmenter));
        let tagger = staged.tagger.map(Arc::new).or_else(|| previous.tagger.clone());
        let recognizer = staged
            .recognizer
            .map(Arc::new)
            .or_else(|| previous.recognizer.clone());
        ModelSet {
            pos_tagging: tagger.is_some(),
            ner: recognizer.is_some(),
            segmenter,
            tagger,
            recognizer,
        }
    }
}

pub struct LexicalAnalyzer {
    coordinator: Arc<Coordinator<LexicalModels>>,
    pool: WorkerPool,
}

impl LexicalAnalyzer {
    /// Cold analyzer: empty segmenter, `Unloaded` until a refresh commits.
    pub fn new(config: &SyncConfig) -> Self {
        Self::with_initial(ModelSet::cold(), Status::Unloaded, config)
    }

    /// Analyzer over already-decoded models; immediately `Ready`.
    pub fn from_models(
        segmenter: SegmenterModel,
        tagger: Option<PosModel>,
        recognizer: Option<NerModel>,
        config: &SyncConfig,
    ) -> Self {
        let tagger = tagger.map(Arc::new);
        let recognizer = recognizer.map(Arc::new);
        let set = ModelSet {
            pos_tagging: tagger.is_some(),
            ner: recognizer.is_some(),
            segmenter: Arc::new(segmenter),
            tagger,
            recognizer,
        };
        Self::with_initial(set, Status::Ready, config)
    }

    /// Analyzer loaded synchronously from a path set (mandatory reload).
    /// Path validation errors surface here; a per-artifact failure leaves
    /// the analyzer constructed but not ready, so check `is_ready`.
    pub fn from_paths(
        cws: &str,
        pos: Option<&str>,
        ner: Option<&str>,
        config: &SyncConfig,
    ) -> Result<Self, SyncError> {
        let analyzer = Self::new(config);
        analyzer.reload(cws, pos, ner)?;
        Ok(analyzer)
    }

    fn with_initial(set: ModelSet, status: Status, config: &SyncConfig) -> Self {
        Self {
            coordinator: Arc::new(Coordinator::new(set, status, config)),
            pool: WorkerPool::new(config.lazy_workers),
        }
    }

    /// Synchronous, mandatory reload of the given model paths.
    pub fn reload(
        &self,
        cws: &str,
        pos: Option<&str>,
        ner: Option<&str>,
    ) -> Result<bool, SyncError> {
        self.coordinator
            .set_request(LexicalRequest::parse(cws, pos, ner)?);
        self.coordinator.refresh(true)
    }

    /// Validates and caches the path set, then refreshes in the background.
    /// Configuration errors surface immediately; cycle failures only via
    /// logs and an unchanged status.
    pub fn lazy(
        &self,
        cws: &str,
        pos: Option<&str>,
        ner: Option<&str>,
    ) -> Result<(), SyncError> {
        self.coordinator
            .set_request(LexicalRequest::parse(cws, pos, ner)?);
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

    /// Snapshot of the committed models, e.g. for batch work over one
    /// consistent set.
    pub fn models(&self) -> Arc<ModelSet> {
        self.coordinator.snapshot()
    }

    /// Segments `text` with the committed segmenter.
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.coordinator.snapshot().segmenter.segment(text)
    }

    /// Tags `words`; `None` when no tagger is committed.
    pub fn tag<S: AsRef<str>>(&self, words: &[S]) -> Option<Vec<String>> {
        let set = self.coordinator.snapshot();
        set.tagger.as_ref().map(|t| t.tag(words))
    }

    /// Labels entities in `words`; `None` when no recognizer is committed.
    pub fn recognize<S: AsRef<str>>(&self, words: &[S]) -> Option<Vec<String>> {
        let set = self.coordinator.snapshot();
        set.recognizer.as_ref().map(|r| r.recognize(words))
    }

    /// Full analysis with whatever artifacts are committed right now.
    pub fn analyze(&self, text: &str) -> Vec<Term> {
        let set = self.coordinator.snapshot();
        let words = set.segmenter.segment(text);
        let tags = set
            .tagger
            .as_ref()
            .filter(|_| set.pos_tagging)
            .map(|t| t.tag(&words));
        let labels = set
            .recognizer
            .as_ref()
            .filter(|_| set.ner)
            .map(|r| r.recognize(&words));
        words
            .into_iter()
            .enumerate()
            .map(|(i, word)| Term {
                word,
                tag: tags.as_ref().map(|t| t[i].clone()),
                entity: labels
                    .as_ref()
                    .map(|l| l[i].clone())
                    .filter(|l| l != OUTSIDE_LABEL),
            })
            .collect()
    }
}
