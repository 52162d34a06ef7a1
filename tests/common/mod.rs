//! Common test utilities and helpers

use discourse_core::{Datapack, Edu, EduId, RawDatapack};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const UNRELATED: &str = "UNRELATED";

/// Gold-annotated pairs of a small corpus: (source, target, label)
pub fn corpus_pairs() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("ROOT", "a1", "ROOT"),
        ("a1", "a2", "elaboration"),
        ("a2", "a1", UNRELATED),
        ("a1", "a3", "narration"),
        ("ROOT", "a3", UNRELATED),
        ("ROOT", "b1", "ROOT"),
        ("b1", "b2", "contrast"),
        ("b2", "b1", UNRELATED),
    ]
}

/// Two documents: "doc_a" spans two sentences, "doc_b" one
pub fn corpus_edus() -> Vec<Edu> {
    vec![
        Edu::new("a1", 1, "a_s1", "doc_a").with_text("The storm hit at night."),
        Edu::new("a2", 2, "a_s1", "doc_a").with_text("which flooded the valley."),
        Edu::new("a3", 3, "a_s2", "doc_a").with_text("Then the rain stopped."),
        Edu::new("b1", 1, "b_s1", "doc_b").with_text("Prices rose"),
        Edu::new("b2", 2, "b_s1", "doc_b").with_text("but sales held."),
    ]
}

pub fn corpus_raw() -> RawDatapack {
    let pairs = corpus_pairs();
    RawDatapack {
        edus: corpus_edus(),
        pairings: pairs.iter().map(|(s, t, _)| (EduId::from(*s), EduId::from(*t))).collect(),
        data: Vec::new(),
        gold: pairs.iter().map(|(_, _, l)| l.to_string()).collect(),
    }
}

pub fn corpus() -> Datapack {
    Datapack::from_raw(corpus_raw()).expect("Failed to build test corpus")
}

/// Write the corpus as JSON into a temporary directory
pub fn write_corpus(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("corpus.json");
    let json = serde_json::to_string_pretty(&corpus_raw()).expect("Failed to serialize corpus");
    std::fs::write(&path, json).expect("Failed to write corpus");
    path
}

/// Files left in a directory, sorted by name
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| e.expect("Failed to read entry").file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
