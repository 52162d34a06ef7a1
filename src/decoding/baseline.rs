//! Reference structural decoders
//!
//! Simple decoders used by the command line tool and in tests. They make no
//! attempt at producing well-formed trees; real structural decoders plug in
//! through the same traits.

use super::interface::{Decoder, IntraInterDecoder};
use super::intra::Sentence;
use crate::error::Result;
use crate::types::{Candidate, Edge, Edu, EduId, Prediction, FAKE_ROOT_ID};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Keep every candidate whose score exceeds a threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocalDecoder {
    pub threshold: f64,
}

impl LocalDecoder {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Decoder for LocalDecoder {
    fn decode(&self, candidates: &[Candidate]) -> Result<Vec<Prediction>> {
        let prediction = candidates
            .iter()
            .filter(|c| c.score > self.threshold)
            .map(Candidate::to_edge)
            .collect();
        Ok(vec![prediction])
    }
}

/// Attach every EDU to the one right before it, and the first to the root
#[derive(Debug, Clone, Copy, Default)]
pub struct LastDecoder;

impl Decoder for LastDecoder {
    fn decode(&self, candidates: &[Candidate]) -> Result<Vec<Prediction>> {
        let by_pair: HashMap<_, _> = candidates
            .iter()
            .map(|c| ((c.source.id.clone(), c.target.id.clone()), c))
            .collect();

        let mut edus: Vec<&Arc<Edu>> = candidates
            .iter()
            .flat_map(|c| [&c.source, &c.target])
            .filter(|e| !e.is_root())
            .collect();
        edus.sort_by(|a, b| (a.grouping.as_str(), a.position).cmp(&(b.grouping.as_str(), b.position)));
        edus.dedup_by(|a, b| a.id == b.id);

        let mut edges = Vec::new();
        let mut previous: Option<&Arc<Edu>> = None;
        for edu in edus {
            let parent = match previous {
                Some(prev) if prev.grouping == edu.grouping => prev.id.clone(),
                _ => EduId::from(FAKE_ROOT_ID),
            };
            if let Some(cand) = by_pair.get(&(parent.clone(), edu.id.clone())) {
                edges.push(cand.to_edge());
            }
            previous = Some(edu);
        }
        Ok(vec![Prediction::new(edges)])
    }
}

/// Two-phase adapter over a whole-structure decoder.
///
/// Sentences are decoded by the inner decoder. The document keeps the first
/// parse of every sentence and adds what the inner decoder picks among the
/// candidates that cross sentence boundaries.
#[derive(Debug, Clone)]
pub struct SentenceComposer<D> {
    inner: D,
}

impl<D: Decoder> SentenceComposer<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: Decoder> IntraInterDecoder for SentenceComposer<D> {
    fn decode_sentence(&self, candidates: &[Candidate]) -> Result<Vec<Prediction>> {
        self.inner.decode(candidates)
    }

    fn decode_document(
        &self,
        candidates: &[Candidate],
        sentence_parses: &[Vec<Prediction>],
    ) -> Result<Vec<Prediction>> {
        let mut edges: Vec<Edge> = sentence_parses
            .iter()
            .filter_map(|parses| parses.first())
            .flat_map(|p| p.iter().cloned())
            .collect();

        let crossing: Vec<Candidate> = candidates
            .iter()
            .filter(|c| !c.source.is_root() && !Sentence::of(&c.source).contains(&c.target))
            .cloned()
            .collect();
        let inter = self.inner.decode(&crossing)?;
        if let Some(best) = inter.into_iter().next() {
            edges.extend(best.into_edges());
        }
        Ok(vec![Prediction::new(edges)])
    }
}
