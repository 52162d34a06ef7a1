//! Probability combination
//!
//! Turns attachment and relation model outputs into one scored, labelled
//! candidate per EDU pair. The combined score is the plain product of the
//! attachment and relation scores.

use crate::datapack::views::ATTACHED;
use crate::datapack::Datapack;
use crate::error::{DecoderError, Result};
use crate::learning::{Model, Team};
use crate::types::{Candidate, UNKNOWN, UNRELATED};
use tracing::trace;

fn check_len<T>(what: &str, values: &[T], dpack: &Datapack) -> Result<()> {
    if values.len() != dpack.len() {
        return Err(DecoderError::Datapack(format!(
            "{} returned {} values for {} pairings",
            what,
            values.len(),
            dpack.len()
        )));
    }
    Ok(())
}

/// Attachment score per pairing of an attachment-view datapack.
///
/// Probabilities for the oracle and fitted models, raw decision values for
/// confidence-only models.
pub fn predict_attach(attach_pack: &Datapack, model: &Model) -> Result<Vec<f64>> {
    let scores = match model {
        Model::Oracle => attach_pack
            .target()
            .iter()
            .map(|&t| if t == ATTACHED { 1.0 } else { 0.0 })
            .collect(),
        Model::Fitted(clf) => {
            let attach_idx = clf.classes().iter().position(|&c| c == ATTACHED).ok_or_else(|| {
                DecoderError::Capability("attachment model has no attached class (1)".into())
            })?;
            let probs = clf.predict_proba(attach_pack.data())?;
            check_len("attachment model", &probs, attach_pack)?;
            probs
                .iter()
                .map(|row| {
                    row.get(attach_idx).copied().ok_or_else(|| {
                        DecoderError::Datapack("probability row shorter than class list".into())
                    })
                })
                .collect::<Result<Vec<_>>>()?
        }
        Model::Confidence(clf) => clf.decision_function(attach_pack.data())?,
    };
    check_len("attachment model", &scores, attach_pack)?;
    Ok(scores)
}

/// Probability of the best relation label per pairing, with that label.
///
/// The oracle scores every pair 1.0 and returns the gold label, except that
/// gold `UNRELATED` becomes `UNKNOWN`, so it cannot cut an edge an attachment
/// model decided to keep.
pub fn predict_relate(relate_pack: &Datapack, model: &Model) -> Result<(Vec<f64>, Vec<String>)> {
    let (probs, numbers) = match model {
        Model::Oracle => {
            let unrelated = relate_pack.label_number(UNRELATED)?;
            let unknown = relate_pack.label_number(UNKNOWN)?;
            let numbers: Vec<i64> = relate_pack
                .target()
                .iter()
                .map(|&t| if t == unrelated { unknown } else { t })
                .collect();
            (vec![1.0; numbers.len()], numbers)
        }
        Model::Fitted(clf) => {
            let all_probs = clf.predict_proba(relate_pack.data())?;
            let probs: Vec<f64> = all_probs
                .iter()
                .map(|row| row.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
                .collect();
            (probs, clf.predict(relate_pack.data())?)
        }
        Model::Confidence(_) => {
            return Err(DecoderError::Capability(
                "tried to use a non-probability model for relations".into(),
            ))
        }
    };
    check_len("relation model", &probs, relate_pack)?;
    check_len("relation model", &numbers, relate_pack)?;

    let labels = numbers
        .iter()
        .map(|&n| relate_pack.get_label(n).map(str::to_string))
        .collect::<Result<Vec<_>>>()?;
    Ok((probs, labels))
}

/// One candidate per pairing, scored by attachment × relation probability
pub fn combine_probs(dpack: &Datapack, team: &Team) -> Result<Vec<Candidate>> {
    let attach_pack = dpack.for_attachment()?;
    let relate_pack = dpack.for_labelling();
    let attach_probs = predict_attach(&attach_pack, &team.attach)?;
    let (relate_probs, relate_labels) = predict_relate(&relate_pack, &team.relate)?;

    let candidates = dpack
        .pairings()
        .iter()
        .zip(attach_probs)
        .zip(relate_probs)
        .zip(relate_labels)
        .map(|((((edu1, edu2), a_prob), r_prob), label)| {
            let prob = a_prob * r_prob;
            trace!(
                edu1 = %edu1.id,
                edu2 = %edu2.id,
                attach = a_prob,
                relate = r_prob,
                label = %label,
                combined = prob,
                "DECODE"
            );
            Candidate::new(edu1.clone(), edu2.clone(), prob, label)
        })
        .collect();
    Ok(candidates)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::datapack::tests::two_doc_pack;
    use crate::datapack::FeatureRow;
    use crate::learning::{ClassId, ConfidenceClassifier, ProbabilisticClassifier};
    use std::sync::Arc;

    /// Returns the same probability vector for every row
    pub(crate) struct FixedProba {
        pub classes: Vec<ClassId>,
        pub proba: Vec<f64>,
    }

    impl ProbabilisticClassifier for FixedProba {
        fn classes(&self) -> &[ClassId] {
            &self.classes
        }

        fn predict_proba(&self, data: &[FeatureRow]) -> Result<Vec<Vec<f64>>> {
            Ok(vec![self.proba.clone(); data.len()])
        }

        fn predict(&self, data: &[FeatureRow]) -> Result<Vec<ClassId>> {
            let best = self
                .proba
                .iter()
                .enumerate()
                .fold(0, |b, (i, p)| if *p > self.proba[b] { i } else { b });
            Ok(vec![self.classes[best]; data.len()])
        }
    }

    pub(crate) struct FixedConfidence(pub f64);

    impl ConfidenceClassifier for FixedConfidence {
        fn decision_function(&self, data: &[FeatureRow]) -> Result<Vec<f64>> {
            Ok(vec![self.0; data.len()])
        }
    }

    #[test]
    fn test_oracle_scores_are_binary() {
        let dpack = two_doc_pack();
        let cands = combine_probs(&dpack, &Team::oracle()).unwrap();
        assert_eq!(cands.len(), dpack.len());
        let scores: Vec<f64> = cands.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_oracle_relate_remaps_unrelated() {
        let dpack = two_doc_pack();
        let (probs, labels) = predict_relate(&dpack, &Model::Oracle).unwrap();
        assert!(probs.iter().all(|&p| p == 1.0));
        assert_eq!(labels[2], UNKNOWN);
        assert_eq!(labels[1], "elaboration");
        assert!(!labels.iter().any(|l| l == UNRELATED));
    }

    #[test]
    fn test_fitted_scores_multiply() {
        let dpack = two_doc_pack();
        let elaboration = dpack.label_number("elaboration").unwrap();
        let narration = dpack.label_number("narration").unwrap();
        let team = Team::new(
            Model::Fitted(Arc::new(FixedProba {
                classes: vec![-1, 1],
                proba: vec![0.2, 0.8],
            })),
            Model::Fitted(Arc::new(FixedProba {
                classes: vec![elaboration, narration],
                proba: vec![0.25, 0.75],
            })),
        );
        let cands = combine_probs(&dpack, &team).unwrap();
        for cand in &cands {
            assert!((cand.score - 0.6).abs() < 1e-9);
            assert_eq!(cand.label, "narration");
        }
    }

    #[test]
    fn test_confidence_attach_uses_decision_value() {
        let dpack = two_doc_pack().for_attachment().unwrap();
        let scores = predict_attach(&dpack, &Model::Confidence(Arc::new(FixedConfidence(-2.5)))).unwrap();
        assert!(scores.iter().all(|&s| s == -2.5));
    }

    #[test]
    fn test_confidence_relate_is_capability_error() {
        let dpack = two_doc_pack();
        let result = predict_relate(&dpack, &Model::Confidence(Arc::new(FixedConfidence(1.0))));
        assert!(matches!(result, Err(DecoderError::Capability(_))));
    }

    #[test]
    fn test_attach_model_without_attached_class() {
        let dpack = two_doc_pack().for_attachment().unwrap();
        let model = Model::Fitted(Arc::new(FixedProba {
            classes: vec![-1, 0],
            proba: vec![0.5, 0.5],
        }));
        assert!(matches!(predict_attach(&dpack, &model), Err(DecoderError::Capability(_))));
    }
}
