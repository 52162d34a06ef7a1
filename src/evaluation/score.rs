//! Scoring predictions against the gold and picking the best one

use crate::datapack::Datapack;
use crate::error::{DecoderError, Result};
use crate::types::{EduId, Prediction, UNRELATED};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Raw counts for one prediction (or the sum over several)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    /// Predicted edges that are attached in the gold
    pub tpos_attach: usize,

    /// Predicted edges that also carry the gold label
    pub tpos_label: usize,

    /// Predicted edges (true and false positives)
    pub tpos_fpos: usize,

    /// Gold edges (true positives and false negatives)
    pub tpos_fneg: usize,
}

impl Add for Count {
    type Output = Count;

    fn add(self, other: Count) -> Count {
        Count {
            tpos_attach: self.tpos_attach + other.tpos_attach,
            tpos_label: self.tpos_label + other.tpos_label,
            tpos_fpos: self.tpos_fpos + other.tpos_fpos,
            tpos_fneg: self.tpos_fneg + other.tpos_fneg,
        }
    }
}

impl AddAssign for Count {
    fn add_assign(&mut self, other: Count) {
        *self = *self + other;
    }
}

impl Sum for Count {
    fn sum<I: Iterator<Item = Count>>(iter: I) -> Count {
        iter.fold(Count::default(), Add::add)
    }
}

/// Count correct attachments and labels of a prediction.
///
/// Predicted edges that are not pairings of the datapack count as false
/// positives.
pub fn score_prediction(dpack: &Datapack, prediction: &Prediction) -> Result<Count> {
    let unrelated = dpack.label_number(UNRELATED)?;
    let gold: HashMap<(&EduId, &EduId), &str> = dpack
        .pairings()
        .iter()
        .zip(dpack.target())
        .filter(|(_, t)| **t != unrelated)
        .map(|((s, t), &lbl)| Ok(((&s.id, &t.id), dpack.get_label(lbl)?)))
        .collect::<Result<_>>()?;

    let mut count = Count {
        tpos_fpos: prediction.len(),
        tpos_fneg: gold.len(),
        ..Count::default()
    };
    for edge in prediction {
        if let Some(gold_label) = gold.get(&(&edge.source, &edge.target)) {
            count.tpos_attach += 1;
            if edge.label == *gold_label {
                count.tpos_label += 1;
            }
        }
    }
    Ok(count)
}

/// Best prediction against the gold, counting correct labels (recall-centric).
///
/// When no prediction carries any real label (attachment-only decoding)
/// correct attachments are counted instead. Ties go to the earliest
/// prediction.
pub fn best_prediction<'a>(dpack: &Datapack, predictions: &'a [Prediction]) -> Result<&'a Prediction> {
    let attach_only = predictions.iter().all(Prediction::is_unlabelled);
    let mut best: Option<(&Prediction, usize)> = None;
    for prediction in predictions {
        let count = score_prediction(dpack, prediction)?;
        let key = if attach_only { count.tpos_attach } else { count.tpos_label };
        if best.map_or(true, |(_, best_key)| key > best_key) {
            best = Some((prediction, key));
        }
    }
    best.map(|(p, _)| p)
        .ok_or_else(|| DecoderError::EmptyPrediction("no prediction to select from".into()))
}

/// The decoder's own favourite: its first prediction
pub fn select_first(predictions: &[Prediction]) -> Result<&Prediction> {
    predictions
        .first()
        .ok_or_else(|| DecoderError::EmptyPrediction("decoder must make at least one prediction".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapack::tests::two_doc_pack;
    use crate::types::{Edge, UNKNOWN};

    fn prediction(edges: &[(&str, &str, &str)]) -> Prediction {
        edges.iter().map(|(a, b, l)| Edge::new(*a, *b, *l)).collect()
    }

    #[test]
    fn test_score_prediction() {
        let dpack = two_doc_pack();
        let pred = prediction(&[
            ("d1_1", "d1_2", "elaboration"),
            ("d1_1", "d1_3", "contrast"),
            ("d1_2", "d1_1", "elaboration"),
        ]);
        let count = score_prediction(&dpack, &pred).unwrap();
        assert_eq!(
            count,
            Count {
                tpos_attach: 2,
                tpos_label: 1,
                tpos_fpos: 3,
                tpos_fneg: 5,
            }
        );
    }

    #[test]
    fn test_best_prefers_more_correct_labels() {
        let dpack = two_doc_pack();
        let p1 = prediction(&[("d1_1", "d1_2", "elaboration"), ("d1_1", "d1_3", "narration")]);
        let p2 = prediction(&[
            ("d1_1", "d1_2", "elaboration"),
            ("d1_1", "d1_3", "narration"),
            ("d2_1", "d2_2", "contrast"),
        ]);
        let preds = vec![p1, p2.clone()];
        assert_eq!(best_prediction(&dpack, &preds).unwrap(), &p2);
    }

    #[test]
    fn test_best_ties_go_to_first() {
        let dpack = two_doc_pack();
        let p1 = prediction(&[("d1_1", "d1_2", "elaboration"), ("d1_1", "d1_3", "narration")]);
        let p2 = prediction(&[("d2_1", "d2_2", "contrast"), ("ROOT", "d1_1", "ROOT")]);
        let preds = vec![p1.clone(), p2];
        assert!(std::ptr::eq(best_prediction(&dpack, &preds).unwrap(), &preds[0]));
        assert_eq!(best_prediction(&dpack, &preds).unwrap(), &p1);
    }

    #[test]
    fn test_best_on_unlabelled_predictions_counts_attachments() {
        let dpack = two_doc_pack();
        let p1 = prediction(&[("d1_2", "d1_1", UNKNOWN), ("d1_1", "d1_2", UNKNOWN)]);
        let p2 = prediction(&[("d1_1", "d1_2", UNKNOWN), ("d2_1", "d2_2", UNKNOWN)]);
        let preds = vec![p1, p2.clone()];
        assert_eq!(best_prediction(&dpack, &preds).unwrap(), &p2);
    }

    #[test]
    fn test_best_on_empty_list() {
        let dpack = two_doc_pack();
        assert!(matches!(best_prediction(&dpack, &[]), Err(DecoderError::EmptyPrediction(_))));
        assert!(select_first(&[]).is_err());
    }

    #[test]
    fn test_counts_sum() {
        let a = Count {
            tpos_attach: 1,
            tpos_label: 1,
            tpos_fpos: 2,
            tpos_fneg: 3,
        };
        let total: Count = vec![a, a].into_iter().sum();
        assert_eq!(total.tpos_fneg, 6);
        assert_eq!(total.tpos_label, 2);
    }
}
