//! Source descriptors: a parsed scheme plus address for one model source.
//!
//! A request may carry multiple `;`-separated paths (custom dictionary
//! shards); each is parsed independently and any bad element fails the whole
//! request before any network or disk activity.

use crate::error::SyncError;

/// Supported source schemes. The set is fixed; anything else is a
/// validation error at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Local,
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Local => "local",
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Scheme::Http | Scheme::Https)
    }
}

/// Lists the supported schemes, e.g. for error messages and the CLI.
pub fn supported_schemes() -> String {
    [Scheme::Local, Scheme::Http, Scheme::Https]
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A parsed source location. Immutable once parsed; the address keeps the
/// caller's original spelling (full URL for remote, path text for local).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    scheme: Scheme,
    address: String,
}

impl SourceDescriptor {
    /// Parses one path string. Absence of a URI scheme means a local file.
    pub fn parse(path: &str) -> Result<Self, SyncError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(SyncError::Validation("empty source path".to_string()));
        }

        match url::Url::parse(trimmed) {
            Ok(u) => match u.scheme() {
                "http" => Ok(Self {
                    scheme: Scheme::Http,
                    address: trimmed.to_string(),
                }),
                "https" => Ok(Self {
                    scheme: Scheme::Https,
                    address: trimmed.to_string(),
                }),
                other => Err(SyncError::Validation(format!(
                    "unsupported scheme `{}` in {} (supported: {})",
                    other,
                    trimmed,
                    supported_schemes()
                ))),
            },
            // No scheme at all: a plain filesystem path.
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self {
                scheme: Scheme::Local,
                address: trimmed.to_string(),
            }),
            Err(e) => Err(SyncError::Validation(format!(
                "cannot parse source path {}: {}",
                trimmed, e
            ))),
        }
    }

    /// Parses a `;`-joined path list. The whole list fails on the first bad
    /// element; empty segments are rejected rather than skipped.
    pub fn parse_list(joined: &str) -> Result<Vec<Self>, SyncError> {
        if joined.trim().is_empty() {
            return Err(SyncError::Validation("empty source path".to_string()));
        }
        joined.split(';').map(Self::parse).collect()
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Last path segment, used for short display names.
    pub fn short_name(&self) -> &str {
        self.address
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.address)
    }
}

impl std::fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_path_is_local() {
        let d = SourceDescriptor::parse("data/models/cws.bin").unwrap();
        assert_eq!(d.scheme(), Scheme::Local);
        assert_eq!(d.address(), "data/models/cws.bin");
        assert!(!d.scheme().is_remote());
    }

    #[test]
    fn absolute_path_is_local() {
        let d = SourceDescriptor::parse("/var/lib/lexsync/pos.bin").unwrap();
        assert_eq!(d.scheme(), Scheme::Local);
    }

    #[test]
    fn http_and_https() {
        let d = SourceDescriptor::parse("http://host/models/cws.bin").unwrap();
        assert_eq!(d.scheme(), Scheme::Http);
        let d = SourceDescriptor::parse("https://host/models/cws.bin").unwrap();
        assert_eq!(d.scheme(), Scheme::Https);
        assert!(d.scheme().is_remote());
    }

    #[test]
    fn empty_path_rejected() {
        assert!(matches!(
            SourceDescriptor::parse(""),
            Err(SyncError::Validation(_))
        ));
        assert!(matches!(
            SourceDescriptor::parse("   "),
            Err(SyncError::Validation(_))
        ));
    }

    #[test]
    fn unsupported_scheme_rejected() {
        let err = SourceDescriptor::parse("ftp://host/dict.bin").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ftp"));
        assert!(msg.contains("local, http, https"));
    }

    #[test]
    fn list_parses_each_path() {
        let list =
            SourceDescriptor::parse_list("dict/a.bin;http://host/b.bin;dict/c.bin").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].scheme(), Scheme::Local);
        assert_eq!(list[1].scheme(), Scheme::Http);
    }

    #[test]
    fn list_fails_fast_on_bad_element() {
        assert!(SourceDescriptor::parse_list("dict/a.bin;ftp://host/b.bin").is_err());
        assert!(SourceDescriptor::parse_list("dict/a.bin;;dict/c.bin").is_err());
        assert!(SourceDescriptor::parse_list("").is_err());
    }

    #[test]
    fn short_name_is_last_segment() {
        let d = SourceDescriptor::parse("http://host/models/cws.bin").unwrap();
        assert_eq!(d.short_name(), "cws.bin");
        let d = SourceDescriptor::parse("cws.bin").unwrap();
        assert_eq!(d.short_name(), "cws.bin");
    }

    #[test]
    fn supported_schemes_lists_all() {
        assert_eq!(supported_schemes(), "local, http, https");
    }
}
