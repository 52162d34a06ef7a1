//! Evaluation of decoded structures against the gold
//!
//! - **score**: per-prediction counts and best-prediction selection
//! - **fold**: decode-and-score over the test documents of a fold

pub mod fold;
pub mod score;

pub use fold::{decode_and_score, decode_fold, DocumentScore};
pub use score::{best_prediction, score_prediction, select_first, Count};
