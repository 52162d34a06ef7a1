//! Capability contract of structural decoders
//!
//! A structural decoder turns a scored candidate set into one or more
//! coherent predictions. Whether it also supports sentence-then-document
//! decoding is fixed when the [`StructuralDecoder`] value is built, so the
//! dispatcher matches on it instead of probing the decoder at call time.

use crate::error::Result;
use crate::types::{Candidate, Prediction};
use std::sync::Arc;

/// Whole-structure decoding
pub trait Decoder: Send + Sync {
    /// Alternative predictions, best first according to the decoder
    fn decode(&self, candidates: &[Candidate]) -> Result<Vec<Prediction>>;
}

/// Two-phase decoding: sentences first, then the document
pub trait IntraInterDecoder: Send + Sync {
    /// Decode the candidates local to one sentence
    fn decode_sentence(&self, candidates: &[Candidate]) -> Result<Vec<Prediction>>;

    /// Compose the sentence parses (in sentence order) into a document
    /// structure, using the document-level candidates for what is left
    fn decode_document(
        &self,
        candidates: &[Candidate],
        sentence_parses: &[Vec<Prediction>],
    ) -> Result<Vec<Prediction>>;
}

#[derive(Clone)]
pub enum StructuralDecoder {
    WholeOnly(Arc<dyn Decoder>),
    SentenceAndWhole(Arc<dyn IntraInterDecoder>),
}

impl StructuralDecoder {
    pub fn whole<D: Decoder + 'static>(decoder: D) -> Self {
        StructuralDecoder::WholeOnly(Arc::new(decoder))
    }

    pub fn intra_inter<D: IntraInterDecoder + 'static>(decoder: D) -> Self {
        StructuralDecoder::SentenceAndWhole(Arc::new(decoder))
    }

    pub fn is_two_phase(&self) -> bool {
        matches!(self, StructuralDecoder::SentenceAndWhole(_))
    }
}

impl std::fmt::Debug for StructuralDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructuralDecoder::WholeOnly(_) => write!(f, "StructuralDecoder::WholeOnly"),
            StructuralDecoder::SentenceAndWhole(_) => write!(f, "StructuralDecoder::SentenceAndWhole"),
        }
    }
}
