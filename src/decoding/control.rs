//! Central interface to the structural decoders
//!
//! [`decode`] picks the protocol from the decoder's declared capabilities:
//! a whole-structure decoder gets a single pass over the document, a decoder
//! that can also decode sentences gets the two-phase intra/inter protocol.

use super::candidates::build_candidates;
use super::interface::{Decoder, IntraInterDecoder, StructuralDecoder};
use super::intra::{select_subgrouping, subgroupings};
use super::labels::maybe_post_label;
use super::prune::{DiagnosticsSink, MaxDistTable, TracingSink};
use crate::datapack::Datapack;
use crate::error::{DecoderError, Result};
use crate::learning::{IntraInterPair, Models, Team};
use crate::types::{DecodingMode, Prediction};
use tracing::{debug, trace};

fn ensure_nonempty(predictions: Vec<Prediction>, phase: &str) -> Result<Vec<Prediction>> {
    if predictions.is_empty() {
        return Err(DecoderError::EmptyPrediction(format!("{} decode returned nothing", phase)));
    }
    Ok(predictions)
}

/// Decode every pairing of the datapack, predicting relations too if the
/// models allow it.
///
/// Pruning diagnostics go to `tracing`; use [`decode_with_sink`] to collect
/// them elsewhere.
pub fn decode(
    dpack: &Datapack,
    models: &Models,
    decoder: &StructuralDecoder,
    mode: DecodingMode,
    max_dist: Option<&MaxDistTable>,
) -> Result<Vec<Prediction>> {
    decode_with_sink(dpack, models, decoder, mode, max_dist, &TracingSink)
}

pub fn decode_with_sink(
    dpack: &Datapack,
    models: &Models,
    decoder: &StructuralDecoder,
    mode: DecodingMode,
    max_dist: Option<&MaxDistTable>,
    sink: &dyn DiagnosticsSink,
) -> Result<Vec<Prediction>> {
    match decoder {
        StructuralDecoder::WholeOnly(decoder) => {
            let team = match models {
                Models::Uniform(team) => team,
                Models::Split(_) => {
                    return Err(DecoderError::Capability(
                        "intra/inter models given to a decoder without sentence-level decoding".into(),
                    ))
                }
            };
            decode_vanilla(dpack, team, decoder.as_ref(), mode, max_dist, sink)
        }
        StructuralDecoder::SentenceAndWhole(decoder) => {
            decode_intra_inter(dpack, &models.intra_inter(), decoder.as_ref(), mode, sink)
        }
    }
}

/// Single pass: candidates over the whole datapack, one decoder call,
/// post-labelling with clobbering
pub fn decode_vanilla(
    dpack: &Datapack,
    team: &Team,
    decoder: &dyn Decoder,
    mode: DecodingMode,
    max_dist: Option<&MaxDistTable>,
    sink: &dyn DiagnosticsSink,
) -> Result<Vec<Prediction>> {
    let cands = build_candidates(dpack, team, mode, max_dist, sink)?;
    let predictions = ensure_nonempty(decoder.decode(&cands)?, "document")?;
    maybe_post_label(dpack, team, predictions, mode, true)
}

/// Two-phase decoding: each sentence is decoded and labelled on its own,
/// then the document decoder composes the sentence parses. Document-level
/// labelling never overwrites a label set during the sentence phase.
///
/// Distance pruning does not apply here.
pub fn decode_intra_inter(
    dpack: &Datapack,
    teams: &IntraInterPair<Team>,
    decoder: &dyn IntraInterDecoder,
    mode: DecodingMode,
    sink: &dyn DiagnosticsSink,
) -> Result<Vec<Prediction>> {
    let dpacks = if teams.intra.attach.is_oracle() {
        // the intra-sentential oracle needs gold sentence roots
        IntraInterPair::new(dpack.for_intra()?, dpack.clone())
    } else {
        IntraInterPair::new(dpack.clone(), dpack.clone())
    };

    let cands = IntraInterPair::new((&dpacks.intra, &teams.intra), (&dpacks.inter, &teams.inter))
        .try_map(|(phase_pack, team)| build_candidates(phase_pack, team, mode, None, sink))?;

    let sentences = subgroupings(&dpack.sorted_edus());
    debug!("Decoding {} sentences before the document", sentences.len());

    let mut sent_parses = Vec::with_capacity(sentences.len());
    for sentence in &sentences {
        let mini_cands = select_subgrouping(&cands.intra, sentence);
        trace!("sentence {}: {} candidates", sentence, mini_cands.len());
        let sent_predictions = ensure_nonempty(decoder.decode_sentence(&mini_cands)?, "sentence")?;
        sent_parses.push(maybe_post_label(&dpacks.intra, &teams.intra, sent_predictions, mode, true)?);
    }

    let doc_predictions = ensure_nonempty(decoder.decode_document(&cands.inter, &sent_parses)?, "document")?;
    maybe_post_label(&dpacks.inter, &teams.inter, doc_predictions, mode, false)
}
