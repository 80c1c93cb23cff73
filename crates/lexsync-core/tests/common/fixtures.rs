//! Model file fixtures built with the library's save-side codecs.

use lexsync_core::artifacts::dict::{encode_shard, DictAttribute, DictEntry};
use lexsync_core::artifacts::lexical::{NerModel, PosModel, SegmenterModel};
use std::path::{Path, PathBuf};

pub fn segmenter_bytes(words: &[&str]) -> Vec<u8> {
    SegmenterModel::from_words(words.iter().copied())
        .to_bytes()
        .expect("encode segmenter")
}

pub fn pos_bytes(default_tag: &str, pairs: &[(&str, &str)]) -> Vec<u8> {
    PosModel::from_pairs(default_tag, pairs.iter().copied())
        .to_bytes()
        .expect("encode pos")
}

pub fn ner_bytes(pairs: &[(&str, &str)]) -> Vec<u8> {
    NerModel::from_pairs(pairs.iter().copied())
        .to_bytes()
        .expect("encode ner")
}

pub fn dict_bytes(entries: &[(&str, &str, u32)]) -> Vec<u8> {
    let entries: Vec<DictEntry> = entries
        .iter()
        .map(|(word, nature, freq)| DictEntry {
            word: word.to_string(),
            attribute: DictAttribute {
                total_frequency: *freq,
                natures: vec![(nature.to_string(), *freq)],
            },
        })
        .collect();
    encode_shard(&entries).expect("encode dict shard")
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}
