//! Datapacks: EDU pairs with their features and gold targets
//!
//! A datapack is the well-formed unit every decoding step works over: the
//! ordered list of EDU pairings, one feature row and one target per pairing,
//! and the label list the targets index into.
//!
//! Targets are label numbers in the labelling view and `1`/`-1` in the
//! attachment view (see [`views`]). A datapack built with [`Datapack::new`]
//! starts in the labelling view.

pub mod views;

use crate::error::{DecoderError, Result};
use crate::types::{Edu, EduId, FAKE_ROOT_ID, UNKNOWN, UNRELATED};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Dense feature vector for one EDU pair
pub type FeatureRow = Vec<f64>;

/// Datapacks keyed by document identifier
pub type Multipack = BTreeMap<String, Datapack>;

/// Serialized form of a datapack, as produced by the feature extraction step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDatapack {
    pub edus: Vec<Edu>,

    /// Ordered (source, target) EDU id pairs
    pub pairings: Vec<(EduId, EduId)>,

    /// One feature row per pairing (may be omitted for oracle-only use)
    #[serde(default)]
    pub data: Vec<FeatureRow>,

    /// Gold label per pairing (`UNRELATED` when not attached)
    pub gold: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Datapack {
    edus: Vec<Arc<Edu>>,
    pairings: Vec<(Arc<Edu>, Arc<Edu>)>,
    data: Vec<FeatureRow>,
    target: Vec<i64>,
    labels: Vec<String>,
}

impl Datapack {
    /// Build a datapack from EDUs, pairings, features and gold labels.
    ///
    /// The reserved labels are always present in the label list. A fake root
    /// is added when a pairing refers to it and no EDU provides it.
    pub fn new(
        edus: Vec<Edu>,
        pairings: Vec<(EduId, EduId)>,
        data: Vec<FeatureRow>,
        gold: Vec<String>,
    ) -> Result<Self> {
        let data = if data.is_empty() {
            vec![FeatureRow::new(); pairings.len()]
        } else {
            data
        };
        if data.len() != pairings.len() || gold.len() != pairings.len() {
            return Err(DecoderError::Datapack(format!(
                "{} pairings but {} feature rows and {} gold labels",
                pairings.len(),
                data.len(),
                gold.len()
            )));
        }

        let mut by_id: HashMap<EduId, Arc<Edu>> = HashMap::new();
        let mut all_edus = Vec::with_capacity(edus.len() + 1);
        for edu in edus {
            if by_id.contains_key(&edu.id) {
                return Err(DecoderError::Datapack(format!("duplicate EDU id {}", edu.id)));
            }
            let edu = Arc::new(edu);
            by_id.insert(edu.id.clone(), edu.clone());
            all_edus.push(edu);
        }
        let root_id = EduId::from(FAKE_ROOT_ID);
        if !by_id.contains_key(&root_id) && pairings.iter().any(|(a, b)| *a == root_id || *b == root_id) {
            let root = Arc::new(Edu::fake_root());
            by_id.insert(root_id, root.clone());
            all_edus.insert(0, root);
        }

        let resolve = |id: &EduId| {
            by_id
                .get(id)
                .cloned()
                .ok_or_else(|| DecoderError::Datapack(format!("pairing refers to unknown EDU {}", id)))
        };
        let pairings = pairings
            .iter()
            .map(|(a, b)| Ok((resolve(a)?, resolve(b)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut labels = vec![UNKNOWN.to_string(), UNRELATED.to_string()];
        for label in &gold {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        let target = gold
            .iter()
            .map(|l| labels.iter().position(|x| x == l).map(|i| i as i64))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| DecoderError::Datapack("gold label missing from label list".into()))?;

        Ok(Self {
            edus: all_edus,
            pairings,
            data,
            target,
            labels,
        })
    }

    pub fn from_raw(raw: RawDatapack) -> Result<Self> {
        Self::new(raw.edus, raw.pairings, raw.data, raw.gold)
    }

    /// Load a datapack from its JSON serialized form
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let raw: RawDatapack = serde_json::from_str(&content)?;
        let dpack = Self::from_raw(raw)?;
        debug!("Loaded datapack with {} pairings from {:?}", dpack.len(), path);
        Ok(dpack)
    }

    /// Copy of this datapack with different targets (same pairings)
    pub(crate) fn with_target(&self, target: Vec<i64>) -> Self {
        debug_assert_eq!(target.len(), self.pairings.len());
        Self {
            target,
            ..self.clone()
        }
    }

    pub(crate) fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn edus(&self) -> &[Arc<Edu>] {
        &self.edus
    }

    pub fn pairings(&self) -> &[(Arc<Edu>, Arc<Edu>)] {
        &self.pairings
    }

    pub fn data(&self) -> &[FeatureRow] {
        &self.data
    }

    pub fn target(&self) -> &[i64] {
        &self.target
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    /// Number of a label in the label list
    pub fn label_number(&self, label: &str) -> Result<i64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| i as i64)
            .ok_or_else(|| DecoderError::UnknownLabel(label.to_string()))
    }

    /// Label for a label number
    pub fn get_label(&self, number: i64) -> Result<&str> {
        usize::try_from(number)
            .ok()
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
            .ok_or_else(|| DecoderError::UnknownLabel(format!("label number {}", number)))
    }

    /// Non-root EDUs of this datapack, ordered by position
    pub fn sorted_edus(&self) -> Vec<Arc<Edu>> {
        let mut edus: Vec<_> = self.edus.iter().filter(|e| !e.is_root()).cloned().collect();
        edus.sort_by(|a, b| (a.grouping.as_str(), a.position).cmp(&(b.grouping.as_str(), b.position)));
        edus
    }

    /// Rank of each EDU within its document by position (the fake root is 0)
    pub fn edu_positions(&self) -> HashMap<EduId, usize> {
        let mut positions = HashMap::new();
        let mut rank_in_doc: HashMap<&str, usize> = HashMap::new();
        for edu in self.sorted_edus().iter() {
            let rank = rank_in_doc.entry(edu.grouping.as_str()).or_insert(0);
            *rank += 1;
            positions.insert(edu.id.clone(), *rank);
        }
        positions.insert(EduId::from(FAKE_ROOT_ID), 0);
        positions
    }

    /// Pairing indices grouped by document (the document of the target EDU)
    pub fn groupings(&self) -> BTreeMap<String, Vec<usize>> {
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, (_, target)) in self.pairings.iter().enumerate() {
            groups.entry(target.grouping.clone()).or_default().push(i);
        }
        groups
    }

    /// Sub-datapack restricted to the given pairing indices.
    ///
    /// Keeps every EDU of the documents those pairings belong to, plus the
    /// fake root if it is referenced.
    pub fn selected(&self, indices: &[usize]) -> Result<Self> {
        if let Some(bad) = indices.iter().find(|&&i| i >= self.pairings.len()) {
            return Err(DecoderError::Datapack(format!(
                "pairing index {} out of range ({} pairings)",
                bad,
                self.pairings.len()
            )));
        }
        let pairings: Vec<_> = indices.iter().map(|&i| self.pairings[i].clone()).collect();
        let docs: BTreeSet<&str> = pairings.iter().map(|(_, t)| t.grouping.as_str()).collect();
        let uses_root = pairings.iter().any(|(s, t)| s.is_root() || t.is_root());
        let edus = self
            .edus
            .iter()
            .filter(|e| if e.is_root() { uses_root } else { docs.contains(e.grouping.as_str()) })
            .cloned()
            .collect();

        Ok(Self {
            edus,
            pairings,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
            target: indices.iter().map(|&i| self.target[i]).collect(),
            labels: self.labels.clone(),
        })
    }

    /// Split into one datapack per document
    pub fn to_multipack(&self) -> Result<Multipack> {
        self.groupings()
            .into_iter()
            .map(|(doc, indices)| Ok((doc, self.selected(&indices)?)))
            .collect()
    }

}
