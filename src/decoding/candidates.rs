//! Candidate construction for a datapack fragment

use super::combine::{combine_probs, predict_attach};
use super::prune::{prune_by_distance, DiagnosticsSink, MaxDistTable};
use crate::datapack::Datapack;
use crate::error::{DecoderError, Result};
use crate::learning::Team;
use crate::types::{Candidate, DecodingMode, UNKNOWN};
use tracing::debug;

/// Extract candidate links (scores and proposed labels for each EDU pair)
/// from the models for all pairings in the datapack.
///
/// In joint mode both models must be able to predict probabilities. In
/// post-label mode only the attachment score is used and every candidate
/// carries the `UNKNOWN` placeholder. Candidates are then pruned by distance
/// if a table is given.
pub fn build_candidates(
    dpack: &Datapack,
    team: &Team,
    mode: DecodingMode,
    max_dist: Option<&MaxDistTable>,
    sink: &dyn DiagnosticsSink,
) -> Result<Vec<Candidate>> {
    let candidates = match mode {
        DecodingMode::Joint => {
            if !team.attach.can_predict_proba() {
                return Err(DecoderError::Capability(
                    "attachment model does not know how to predict probabilities; \
                     it should only be used in post labelling mode"
                        .into(),
                ));
            }
            if !team.relate.can_predict_proba() {
                return Err(DecoderError::Capability(
                    "relation labelling model does not know how to predict probabilities".into(),
                ));
            }
            combine_probs(dpack, team)?
        }
        DecodingMode::PostLabel => {
            let attach_pack = dpack.for_attachment()?;
            let confidence = predict_attach(&attach_pack, &team.attach)?;
            attach_pack
                .pairings()
                .iter()
                .zip(confidence)
                .map(|((edu1, edu2), conf)| Candidate::new(edu1.clone(), edu2.clone(), conf, UNKNOWN))
                .collect()
        }
    };
    debug!("Built {} candidates in {} mode", candidates.len(), mode);

    Ok(prune_by_distance(dpack, candidates, max_dist, sink))
}
