//! Custom-dictionary artifacts: shard codec and the merged lookup trie.
//!
//! A dictionary entry carries its natures (tag + frequency pairs) and a
//! total frequency. Shards decode independently; the trie is
//! rebuilt from the full shard set on commit, later shards overriding
//! earlier ones on duplicate words.

use super::codec::{ByteReader, ByteWriter, EncodeError};
use super::Term;
use crate::error::DecodeError;
use std::collections::HashMap;

const DICT_MAGIC: &[u8; 4] = b"LXDC";
const CODEC_VERSION: u8 = 1;

/// Natures and frequencies for one dictionary word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictAttribute {
    pub total_frequency: u32,
    /// Nature/frequency pairs in dictionary order; the first is primary.
    pub natures: Vec<(String, u32)>,
}

impl DictAttribute {
    pub fn primary_nature(&self) -> Option<&str> {
        self.natures.first().map(|(n, _)| n.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    pub word: String,
    pub attribute: DictAttribute,
}

/// Decodes one dictionary shard into its entries.
pub fn decode_shard(bytes: &[u8]) -> Result<Vec<DictEntry>, DecodeError> {
    let mut r = ByteReader::new(bytes);
    r.expect_magic(DICT_MAGIC)?;
    let version = r.read_u8()?;
    if version != CODEC_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    let count = r.read_u32()? as usize;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let word = r.read_str()?.to_string();
        let total_frequency = r.read_u32()?;
        let nature_count = r.read_u8()? as usize;
        let mut natures = Vec::with_capacity(nature_count);
        for _ in 0..nature_count {
            let nature = r.read_short_str()?.to_string();
            let frequency = r.read_u32()?;
            natures.push((nature, frequency));
        }
        entries.push(DictEntry {
            word,
            attribute: DictAttribute {
                total_frequency,
                natures,
            },
        });
    }
    Ok(entries)
}

/// Save-side of the shard codec, used by the dictionary compiler.
pub fn encode_shard(entries: &[DictEntry]) -> Result<Vec<u8>, EncodeError> {
    let mut w = ByteWriter::new();
    w.write_magic(DICT_MAGIC);
    w.write_u8(CODEC_VERSION);
    w.write_u32(entries.len() as u32);
    for entry in entries {
        w.write_str(&entry.word)?;
        w.write_u32(entry.attribute.total_frequency);
        w.write_u8(
            u8::try_from(entry.attribute.natures.len())
                .map_err(|_| EncodeError(entry.word.clone()))?,
        );
        for (nature, frequency) in &entry.attribute.natures {
            w.write_short_str(nature)?;
            w.write_u32(*frequency);
        }
    }
    Ok(w.into_bytes())
}

/// Merged dictionary with longest-prefix segmentation.
#[derive(Debug, Clone, Default)]
pub struct DictTrie {
    words: HashMap<String, DictAttribute>,
    max_chars: usize,
}

impl DictTrie {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the trie from shards in request order; a word appearing in a
    /// later shard overrides the earlier attribute.
    pub fn from_shards<'a, I>(shards: I) -> Self
    where
        I: IntoIterator<Item = &'a [DictEntry]>,
    {
        let mut words = HashMap::new();
        for shard in shards {
            for entry in shard {
                words.insert(entry.word.clone(), entry.attribute.clone());
            }
        }
        let max_chars = words.keys().map(|w| w.chars().count()).max().unwrap_or(0);
        Self { words, max_chars }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&DictAttribute> {
        self.words.get(word)
    }

    /// Forward maximum matching against the dictionary. Dictionary hits
    /// carry their primary nature; everything else falls through as
    /// single characters or alphanumeric runs.
    pub fn segment(&self, text: &str) -> Vec<Term> {
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
                if let Some(attr) = self.words.get(&candidate) {
                    out.push(Term {
                        word: candidate,
                        tag: attr.primary_nature().map(str::to_string),
                        entity: None,
                    });
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
                out.push(Term::word(chars[i..j].iter().collect::<String>()));
                i = j;
            } else {
                out.push(Term::word(c.to_string()));
                i += 1;
            }
        }
        out
    }
}
