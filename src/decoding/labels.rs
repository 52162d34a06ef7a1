//! Post-labelling of structural predictions

use super::combine::predict_relate;
use crate::datapack::Datapack;
use crate::error::{DecoderError, Result};
use crate::learning::Team;
use crate::types::{DecodingMode, Edge, EduId, Prediction, UNKNOWN};
use std::collections::HashMap;

/// Predict labels for the edges of already decoded predictions.
///
/// The best relation label of every pairing is computed once, then applied
/// to each prediction. With `clobber` every edge gets the predicted label;
/// without it, only edges still labelled `UNKNOWN` do.
pub fn add_labels(
    dpack: &Datapack,
    team: &Team,
    predictions: &[Prediction],
    clobber: bool,
) -> Result<Vec<Prediction>> {
    let relate_pack = dpack.for_labelling();
    let (_, relate_labels) = predict_relate(&relate_pack, &team.relate)?;
    let label_dict: HashMap<(&EduId, &EduId), &str> = dpack
        .pairings()
        .iter()
        .zip(&relate_labels)
        .map(|((edu1, edu2), label)| ((&edu1.id, &edu2.id), label.as_str()))
        .collect();

    let update = |edge: &Edge| -> Result<Edge> {
        if !(clobber || edge.label == UNKNOWN) {
            return Ok(edge.clone());
        }
        let label = label_dict.get(&(&edge.source, &edge.target)).ok_or_else(|| {
            DecoderError::Datapack(format!(
                "predicted edge {} -> {} is not a pairing of the datapack",
                edge.source, edge.target
            ))
        })?;
        Ok(Edge::new(edge.source.clone(), edge.target.clone(), *label))
    };

    predictions
        .iter()
        .map(|pred| pred.iter().map(update).collect::<Result<Prediction>>())
        .collect()
}

/// Apply [`add_labels`] in post-label mode; return the predictions as they
/// are otherwise
pub fn maybe_post_label(
    dpack: &Datapack,
    team: &Team,
    predictions: Vec<Prediction>,
    mode: DecodingMode,
    clobber: bool,
) -> Result<Vec<Prediction>> {
    match mode {
        DecodingMode::PostLabel => add_labels(dpack, team, &predictions, clobber),
        DecodingMode::Joint => Ok(predictions),
    }
}
