//! Bundled-resource fallback for local sources.
//!
//! When a local model path does not exist on the filesystem, the resolver
//! tries each configured resource directory in order. A path resolved this
//! way is a static packaged resource: read once, never treated as modified.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ResourceResolver {
    dirs: Vec<PathBuf>,
}

impl ResourceResolver {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Resolves `path` against the resource directories, first hit wins.
    /// Absolute paths are not resolved here; they either exist or they don't.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        if Path::new(path).is_absolute() {
            return None;
        }
        self.dirs
            .iter()
            .map(|d| d.join(path))
            .find(|candidate| candidate.is_file())
    }
}
