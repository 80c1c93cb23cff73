//! Lexical-analysis artifacts: segmenter vocabulary, POS table, NER table.
//!
//! The statistical internals live outside this system; these artifacts
//! honor the decoder contract and provide deterministic analysis: forward
//! maximum matching over the committed vocabulary, table lookups for tags
//! and entity labels.

use super::codec::{ByteReader, ByteWriter, EncodeError};
use crate::error::DecodeError;
use std::collections::{HashMap, HashSet};

const SEGMENTER_MAGIC: &[u8; 4] = b"LXCW";
const POS_MAGIC: &[u8; 4] = b"LXPS";
const NER_MAGIC: &[u8; 4] = b"LXNE";
const CODEC_VERSION: u8 = 1;

/// Word-segmentation artifact: a vocabulary matched longest-first.
#[derive(Debug, Clone, Default)]
pub struct SegmenterModel {
    vocab: HashSet<String>,
    max_chars: usize,
}

impl SegmenterModel {
    /// The empty artifact a cold facade serves until a refresh commits: no
    /// vocabulary, so segmentation degrades to character/alphanumeric runs.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocab: HashSet<String> = words.into_iter().map(Into::into).collect();
        let max_chars = vocab.iter().map(|w| w.chars().count()).max().unwrap_or(0);
        Self { vocab, max_chars }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(bytes);
        r.expect_magic(SEGMENTER_MAGIC)?;
        let version = r.read_u8()?;
        if version != CODEC_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let count = r.read_u32()? as usize;
        let mut vocab = HashSet::with_capacity(count);
        for _ in 0..count {
            vocab.insert(r.read_str()?.to_string());
        }
        let max_chars = vocab.iter().map(|w| w.chars().count()).max().unwrap_or(0);
        Ok(Self { vocab, max_chars })
    }

    /// Save-side of the codec, used by packaging tooling.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut w = ByteWriter::new();
        w.write_magic(SEGMENTER_MAGIC);
        w.write_u8(CODEC_VERSION);
        w.write_u32(self.vocab.len() as u32);
        let mut words: Vec<&String> = self.vocab.iter().collect();
        words.sort();
        for word in words {
            w.write_str(word)?;
        }
        Ok(w.into_bytes())
    }

    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vocab.contains(word)
    }

    /// Forward maximum matching. Whitespace separates tokens; characters
    /// outside the vocabulary come out as single chars, except alphanumeric
    /// runs (product codes, latin words) which stay whole.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            let longest = self.max_chars.min(chars.len() - i);
            let mut matched = 0;
            for len in (1..=longest).rev() {
                let candidate: String = chars[i..i + len].iter().collect();
                if self.vocab.contains(&candidate) {
                    out.push(candidate);
                    matched = len;
                    break;
                }
            }
            if matched > 0 {
                i += matched;
                continue;
            }
            if c.is_ascii_alphanumeric() {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_ascii_alphanumeric() {
                    j += 1;
                }
                out.push(chars[i..j].iter().collect());
                i = j;
            } else {
                out.push(c.to_string());
                i += 1;
            }
        }
        out
    }
}

/// Part-of-speech artifact: word → tag table with a default tag.
#[derive(Debug, Clone)]
pub struct PosModel {
    tags: HashMap<String, String>,
    default_tag: String,
}

impl PosModel {
    pub fn from_pairs<I, S, T>(default_tag: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            tags: pairs
                .into_iter()
                .map(|(w, t)| (w.into(), t.into()))
                .collect(),
            default_tag: default_tag.to_string(),
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(bytes);
        r.expect_magic(POS_MAGIC)?;
        let version = r.read_u8()?;
        if version != CODEC_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let default_tag = r.read_short_str()?.to_string();
        let count = r.read_u32()? as usize;
        let mut tags = HashMap::with_capacity(count);
        for _ in 0..count {
            let word = r.read_str()?.to_string();
            let tag = r.read_short_str()?.to_string();
            tags.insert(word, tag);
        }
        Ok(Self { tags, default_tag })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut w = ByteWriter::new();
        w.write_magic(POS_MAGIC);
        w.write_u8(CODEC_VERSION);
        w.write_short_str(&self.default_tag)?;
        w.write_u32(self.tags.len() as u32);
        let mut pairs: Vec<(&String, &String)> = self.tags.iter().collect();
        pairs.sort();
        for (word, tag) in pairs {
            w.write_str(word)?;
            w.write_short_str(tag)?;
        }
        Ok(w.into_bytes())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tag_of(&self, word: &str) -> &str {
        self.tags
            .get(word)
            .map(String::as_str)
            .unwrap_or(&self.default_tag)
    }

    pub fn tag<S: AsRef<str>>(&self, words: &[S]) -> Vec<String> {
        words
            .iter()
            .map(|w| self.tag_of(w.as_ref()).to_string())
            .collect()
    }
}

/// Named-entity artifact: word → entity label table; `O` means no entity.
#[derive(Debug, Clone, Default)]
pub struct NerModel {
    labels: HashMap<String, String>,
}

pub const OUTSIDE_LABEL: &str = "O";

impl NerModel {
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            labels: pairs
                .into_iter()
                .map(|(w, l)| (w.into(), l.into()))
                .collect(),
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(bytes);
        r.expect_magic(NER_MAGIC)?;
        let version = r.read_u8()?;
        if version != CODEC_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        let count = r.read_u32()? as usize;
        let mut labels = HashMap::with_capacity(count);
        for _ in 0..count {
            let word = r.read_str()?.to_string();
            let label = r.read_short_str()?.to_string();
            labels.insert(word, label);
        }
        Ok(Self { labels })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut w = ByteWriter::new();
        w.write_magic(NER_MAGIC);
        w.write_u8(CODEC_VERSION);
        w.write_u32(self.labels.len() as u32);
        let mut pairs: Vec<(&String, &String)> = self.labels.iter().collect();
        pairs.sort();
        for (word, label) in pairs {
            w.write_str(word)?;
            w.write_short_str(label)?;
        }
        Ok(w.into_bytes())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label_of(&self, word: &str) -> &str {
        self.labels
            .get(word)
            .map(String::as_str)
            .unwrap_or(OUTSIDE_LABEL)
    }

    pub fn recognize<S: AsRef<str>>(&self, words: &[S]) -> Vec<String> {
        words
            .iter()
            .map(|w| self.label_of(w.as_ref()).to_string())
            .collect()
    }
}
