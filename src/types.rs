//! Core data types for the discourse decoder
//!
//! Defines elementary discourse units (EDUs), the scored candidate edges the
//! structural decoders consume, and the predictions they return. EDUs are
//! shared as `Arc<Edu>` between datapacks and candidate sets; candidates and
//! predictions are plain values that are filtered or rebuilt, never mutated
//! in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Gold label of a pair that is not attached
pub const UNRELATED: &str = "UNRELATED";

/// Placeholder label for an attached pair whose relation is not known yet
pub const UNKNOWN: &str = "__UNK__";

/// Label given to edges leaving the fake root
pub const ROOT_LABEL: &str = "ROOT";

/// Identifier of the fake root EDU
pub const FAKE_ROOT_ID: &str = "ROOT";

/// Stable identifier of an EDU
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EduId(pub String);

impl EduId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EduId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EduId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for EduId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Elementary discourse unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edu {
    pub id: EduId,

    /// Raw text, only used for diagnostics
    #[serde(default)]
    pub text: String,

    /// Ordinal position within the document (the fake root sits at 0)
    pub position: usize,

    /// Sentence-level grouping this EDU belongs to
    pub subgrouping: String,

    /// Document this EDU belongs to
    pub grouping: String,
}

impl Edu {
    pub fn new(
        id: impl Into<EduId>,
        position: usize,
        subgrouping: impl Into<String>,
        grouping: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            position,
            subgrouping: subgrouping.into(),
            grouping: grouping.into(),
        }
    }

    /// The fake root EDU, shared by every document of a datapack
    pub fn fake_root() -> Self {
        Self {
            id: EduId::from(FAKE_ROOT_ID),
            text: String::new(),
            position: 0,
            subgrouping: FAKE_ROOT_ID.to_string(),
            grouping: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn is_root(&self) -> bool {
        self.id.as_str() == FAKE_ROOT_ID
    }
}

/// How to do decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecodingMode {
    /// Predict attachment and relations together
    #[default]
    Joint,

    /// Predict attachment, then independently label the resulting graph
    PostLabel,
}

impl fmt::Display for DecodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodingMode::Joint => write!(f, "joint"),
            DecodingMode::PostLabel => write!(f, "post_label"),
        }
    }
}

/// Scored, labelled, directed EDU pair proposed to a structural decoder
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub source: Arc<Edu>,
    pub target: Arc<Edu>,
    pub score: f64,
    pub label: String,
}

impl Candidate {
    pub fn new(source: Arc<Edu>, target: Arc<Edu>, score: f64, label: impl Into<String>) -> Self {
        Self {
            source,
            target,
            score,
            label: label.into(),
        }
    }

    /// Edge accepting this candidate with its proposed label
    pub fn to_edge(&self) -> Edge {
        Edge::new(self.source.id.clone(), self.target.id.clone(), self.label.clone())
    }
}

/// Accepted edge of a prediction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: EduId,
    pub target: EduId,
    pub label: String,
}

impl Edge {
    pub fn new(source: impl Into<EduId>, target: impl Into<EduId>, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
        }
    }
}

/// Ordered collection of accepted edges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prediction(Vec<Edge>);

impl Prediction {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self(edges)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if every edge still carries the unknown placeholder
    pub fn is_unlabelled(&self) -> bool {
        self.0.iter().all(|e| e.label == UNKNOWN)
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.0
    }
}

impl FromIterator<Edge> for Prediction {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Prediction {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_root() {
        let root = Edu::fake_root();
        assert!(root.is_root());
        assert_eq!(root.position, 0);
        assert!(!Edu::new("d1_1", 1, "s1", "d1").is_root());
    }

    #[test]
    fn test_decoding_mode_serialization() {
        let json = serde_json::to_string(&DecodingMode::PostLabel).unwrap();
        assert_eq!(json, "\"post_label\"");
        assert_eq!(DecodingMode::default(), DecodingMode::Joint);
        assert_eq!(DecodingMode::PostLabel.to_string(), "post_label");
    }

    #[test]
    fn test_prediction_unlabelled() {
        let pred = Prediction::new(vec![Edge::new("a", "b", UNKNOWN), Edge::new("b", "c", UNKNOWN)]);
        assert!(pred.is_unlabelled());

        let pred = Prediction::new(vec![Edge::new("a", "b", UNKNOWN), Edge::new("b", "c", "elab")]);
        assert!(!pred.is_unlabelled());
    }

    #[test]
    fn test_candidate_to_edge() {
        let a = Arc::new(Edu::new("a", 1, "s1", "d"));
        let b = Arc::new(Edu::new("b", 2, "s1", "d"));
        let cand = Candidate::new(a, b, 0.4, "elab");
        assert_eq!(cand.to_edge(), Edge::new("a", "b", "elab"));
    }
}
