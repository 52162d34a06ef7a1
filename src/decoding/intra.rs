//! Helpers for intra/inter-sentential decoding

use crate::types::{Candidate, Edu};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A sentence, qualified by its document: sentence ids are only unique
/// within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentence {
    pub grouping: String,
    pub subgrouping: String,
}

impl Sentence {
    pub fn new(grouping: impl Into<String>, subgrouping: impl Into<String>) -> Self {
        Self {
            grouping: grouping.into(),
            subgrouping: subgrouping.into(),
        }
    }

    pub fn of(edu: &Edu) -> Self {
        Self::new(edu.grouping.clone(), edu.subgrouping.clone())
    }

    pub fn contains(&self, edu: &Edu) -> bool {
        edu.grouping == self.grouping && edu.subgrouping == self.subgrouping
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.grouping, self.subgrouping)
    }
}

/// Sentences in document order.
///
/// Each sentence appears once, at the position of its first EDU, so the
/// sentences partition the EDUs of every document with no overlap and no gap.
pub fn subgroupings(sorted_edus: &[Arc<Edu>]) -> Vec<Sentence> {
    let mut seen = HashSet::new();
    sorted_edus
        .iter()
        .filter(|edu| !edu.is_root())
        .map(|edu| Sentence::of(edu))
        .filter(|sentence| seen.insert(sentence.clone()))
        .collect()
}

/// Candidates local to one sentence: the target lies in it and the source
/// lies in it too or is the fake root
pub fn select_subgrouping(candidates: &[Candidate], sentence: &Sentence) -> Vec<Candidate> {
    candidates
        .iter()
        .filter(|c| sentence.contains(&c.target) && (c.source.is_root() || sentence.contains(&c.source)))
        .cloned()
        .collect()
}
