//! Distance-based candidate pruning
//!
//! Drops candidates whose EDUs lie further apart than any gold edge of the
//! same direction. The bound is the maximum over *all* labels for the
//! direction, not the bound of the candidate's own label; existing
//! configurations were tuned against this looser filter.

use crate::datapack::Datapack;
use crate::types::Candidate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Longest gold edge per label, as `(max_left, max_right)` in EDU-index units
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxDistTable(pub BTreeMap<String, (usize, usize)>);

impl MaxDistTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, max_left: usize, max_right: usize) {
        self.0.insert(label.into(), (max_left, max_right));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest left bound over all labels
    pub fn max_left(&self) -> Option<usize> {
        self.0.values().map(|(left, _)| *left).max()
    }

    /// Largest right bound over all labels
    pub fn max_right(&self) -> Option<usize> {
        self.0.values().map(|(_, right)| *right).max()
    }
}

impl FromIterator<(String, (usize, usize))> for MaxDistTable {
    fn from_iter<I: IntoIterator<Item = (String, (usize, usize))>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Receives pruning diagnostics
pub trait DiagnosticsSink: Send + Sync {
    fn pruned(&self, removed: usize, total: usize);
}

/// Logs pruning diagnostics through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn pruned(&self, removed: usize, total: usize) {
        info!("pruned {} / {} edges", removed, total);
    }
}

/// Remove candidates spanning more EDUs than the table allows.
///
/// Without a table the candidates pass through untouched and the sink is
/// not called.
pub fn prune_by_distance(
    dpack: &Datapack,
    candidates: Vec<Candidate>,
    max_dist: Option<&MaxDistTable>,
    sink: &dyn DiagnosticsSink,
) -> Vec<Candidate> {
    let table = match max_dist {
        Some(table) if !table.is_empty() => table,
        _ => return candidates,
    };
    let dist_max_left = table.max_left().unwrap_or(usize::MAX);
    let dist_max_right = table.max_right().unwrap_or(usize::MAX);
    let edu_idx = dpack.edu_positions();

    let total = candidates.len();
    let surviving: Vec<Candidate> = candidates
        .into_iter()
        .filter(|cand| {
            let (Some(&idx1), Some(&idx2)) = (edu_idx.get(&cand.source.id), edu_idx.get(&cand.target.id)) else {
                return true;
            };
            if idx1 < idx2 {
                idx2 - idx1 <= dist_max_right
            } else {
                idx1 - idx2 <= dist_max_left
            }
        })
        .collect();

    sink.pruned(total - surviving.len(), total);
    surviving
}
