//! Decode-and-score over the test documents of one fold

use super::score::{best_prediction, score_prediction, Count};
use crate::datapack::Datapack;
use crate::decoding::{decode, MaxDistTable, StructuralDecoder};
use crate::error::Result;
use crate::learning::Models;
use crate::types::DecodingMode;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Score of one decoded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentScore {
    pub document: String,
    pub count: Count,
}

/// Decode a single document and score its best prediction
pub fn decode_and_score(
    dpack: &Datapack,
    models: &Models,
    decoder: &StructuralDecoder,
    mode: DecodingMode,
    max_dist: Option<&MaxDistTable>,
) -> Result<Count> {
    let predictions = decode(dpack, models, decoder, mode, max_dist)?;
    let best = best_prediction(dpack, &predictions)?;
    score_prediction(dpack, best)
}

/// Decode and score every document of a test datapack, in document order
pub fn decode_fold(
    test_pack: &Datapack,
    models: &Models,
    decoder: &StructuralDecoder,
    mode: DecodingMode,
    max_dist: Option<&MaxDistTable>,
) -> Result<Vec<DocumentScore>> {
    let mut scores = Vec::new();
    for (document, indices) in test_pack.groupings() {
        info!("decoding on file: {}", document);
        let onepack = test_pack.selected(&indices)?;
        let count = decode_and_score(&onepack, models, decoder, mode, max_dist)?;
        scores.push(DocumentScore { document, count });
    }
    Ok(scores)
}
