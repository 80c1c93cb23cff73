//! Decoded in-memory artifacts and their binary codecs.
//!
//! Everything behind the decoder boundary: the refresh machinery only knows
//! "bytes in, artifact or `DecodeError` out" and delegates analysis calls to
//! whatever set is currently committed.

pub mod codec;
pub mod dict;
pub mod lexical;

/// One analyzed token: a surface word plus whatever annotations the
/// committed artifact set could produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub word: String,
    /// Part-of-speech tag (or dictionary nature for custom dictionaries).
    pub tag: Option<String>,
    /// Named-entity label, absent when no recognizer is loaded or the word
    /// is not an entity.
    pub entity: Option<String>,
}

impl Term {
    pub fn word(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: None,
            entity: None,
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.word)?;
        if let Some(tag) = &self.tag {
            write!(f, "/{}", tag)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, "[{}]", entity)?;
        }
        Ok(())
    }
}
