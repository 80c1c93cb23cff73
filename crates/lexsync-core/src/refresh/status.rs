//! Lock-free status flags.
//!
//! Status reads never block and never tear: both cells are plain atomics,
//! polled from arbitrary threads while a refresh runs elsewhere.

use std::sync::atomic::{AtomicU8, Ordering};

/// Externally visible facade status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    /// No artifacts committed yet.
    Unloaded = 0,
    /// A refresh cycle is retrieving sources.
    Fetching = 1,
    /// All fetches resolved; the cycle is committing or rolling back.
    Committing = 2,
    /// Artifacts committed and serving.
    Ready = 3,
}

impl Status {
    pub fn code(self) -> u8 {
        self as u8
    }

    fn from_code(code: u8) -> Status {
        match code {
            1 => Status::Fetching,
            2 => Status::Committing,
            3 => Status::Ready,
            _ => Status::Unloaded,
        }
    }

    pub fn is_transient(self) -> bool {
        matches!(self, Status::Fetching | Status::Committing)
    }
}

pub(crate) struct StatusCell(AtomicU8);

impl StatusCell {
    pub(crate) fn new(status: Status) -> Self {
        Self(AtomicU8::new(status.code()))
    }

    pub(crate) fn load(&self) -> Status {
        Status::from_code(self.0.load(Ordering::SeqCst))
    }

    pub(crate) fn store(&self, status: Status) {
        self.0.store(status.code(), Ordering::SeqCst);
    }
}

/// Internal serialization of refresh cycles; never exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum SyncPhase {
    Idle = 0,
    InProgress = 1,
    Finalizing = 2,
}

pub(crate) struct SyncCell(AtomicU8);

impl SyncCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(SyncPhase::Idle as u8))
    }

    /// Accepts a refresh only from idle; the loser is rejected, never queued.
    pub(crate) fn try_begin(&self) -> bool {
        self.0
            .compare_exchange(
                SyncPhase::Idle as u8,
                SyncPhase::InProgress as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    pub(crate) fn store(&self, phase: SyncPhase) {
        self.0.store(phase as u8, Ordering::SeqCst);
    }
}
