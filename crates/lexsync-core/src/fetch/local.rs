//! Local filesystem retrieval with bundled-resource fallback.

use crate::error::SyncError;
use crate::resources::ResourceResolver;
use std::path::Path;

/// Reads a local model file. If the path does not exist, the resolver is
/// consulted for a bundled resource before giving up with `SourceNotFound`.
pub fn read_local(path: &str, resolver: &ResourceResolver) -> Result<Vec<u8>, SyncError> {
    let direct = Path::new(path);
    let actual = if direct.exists() {
        direct.to_path_buf()
    } else if let Some(bundled) = resolver.resolve(path) {
        bundled
    } else {
        return Err(SyncError::SourceNotFound(path.to_string()));
    };

    std::fs::read(&actual).map_err(|e| SyncError::transport(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cws.bin");
        fs::write(&path, b"model-bytes").unwrap();
        let bytes = read_local(path.to_str().unwrap(), &ResourceResolver::default()).unwrap();
        assert_eq!(bytes, b"model-bytes");
    }

    #[test]
    fn falls_back_to_bundled_resource() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cws.bin"), b"bundled").unwrap();
        let resolver = ResourceResolver::new(vec![dir.path().to_path_buf()]);
        let bytes = read_local("cws.bin", &resolver).unwrap();
        assert_eq!(bytes, b"bundled");
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let err = read_local("no/such/file.bin", &ResourceResolver::default()).unwrap_err();
        assert!(matches!(err, SyncError::SourceNotFound(_)));
    }
}
