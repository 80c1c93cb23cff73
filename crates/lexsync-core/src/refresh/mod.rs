//! Refresh coordination: single-flight cycles, concurrent fetch/decode,
//! atomic commit or rollback.
//!
//! A `Coordinator` is generic over an [`ArtifactSet`]: the set names its
//! sources, decodes fetched bytes into typed pieces, and builds the next
//! live set from the previous one plus the staged pieces. Facades compose a
//! coordinator instead of subclassing anything.

mod coordinator;
mod pool;
mod status;

pub use coordinator::{ArtifactSet, Coordinator, NamedSource};
pub use pool::WorkerPool;
pub use status::Status;
