//! Models used to score EDU pairs
//!
//! A model is either a fitted classifier that outputs class probabilities, a
//! classifier that only outputs a confidence value, or the oracle, which
//! reads the gold target instead of predicting. Callers match on [`Model`]
//! rather than probing for capabilities.
//!
//! Models are created once per fold and shared read-only across every
//! document of that fold, hence the `Send + Sync` bounds.

pub mod linear;

pub use linear::LinearClassifier;

use crate::datapack::FeatureRow;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Class identifier: `1`/`-1` for attachment, a label number for relations
pub type ClassId = i64;

/// Classifier able to output a probability distribution over its classes
pub trait ProbabilisticClassifier: Send + Sync {
    /// Classes in the column order of [`predict_proba`](Self::predict_proba)
    fn classes(&self) -> &[ClassId];

    /// One probability vector per row
    fn predict_proba(&self, data: &[FeatureRow]) -> Result<Vec<Vec<f64>>>;

    /// Most likely class per row
    fn predict(&self, data: &[FeatureRow]) -> Result<Vec<ClassId>>;
}

/// Classifier that only outputs a scalar decision value per row
pub trait ConfidenceClassifier: Send + Sync {
    fn decision_function(&self, data: &[FeatureRow]) -> Result<Vec<f64>>;
}

#[derive(Clone)]
pub enum Model {
    /// Look up the gold target instead of predicting
    Oracle,
    Fitted(Arc<dyn ProbabilisticClassifier>),
    Confidence(Arc<dyn ConfidenceClassifier>),
}

impl Model {
    /// Whether the model can provide probabilities (the oracle can)
    pub fn can_predict_proba(&self) -> bool {
        !matches!(self, Model::Confidence(_))
    }

    pub fn is_oracle(&self) -> bool {
        matches!(self, Model::Oracle)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Model::Oracle => "oracle",
            Model::Fitted(_) => "fitted",
            Model::Confidence(_) => "confidence",
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Model::{}", self.kind())
    }
}

/// Attachment and relation models used together
#[derive(Debug, Clone)]
pub struct Team {
    pub attach: Model,
    pub relate: Model,
}

impl Team {
    pub fn new(attach: Model, relate: Model) -> Self {
        Self { attach, relate }
    }

    /// Team made of two oracles
    pub fn oracle() -> Self {
        Self::new(Model::Oracle, Model::Oracle)
    }
}

/// Sentence-local and document-global halves of the same structure
#[derive(Debug, Clone, PartialEq)]
pub struct IntraInterPair<T> {
    pub intra: T,
    pub inter: T,
}

impl<T> IntraInterPair<T> {
    pub fn new(intra: T, inter: T) -> Self {
        Self { intra, inter }
    }

    /// Apply the same fallible operation to both halves
    pub fn try_map<U, F>(self, mut f: F) -> Result<IntraInterPair<U>>
    where
        F: FnMut(T) -> Result<U>,
    {
        Ok(IntraInterPair {
            intra: f(self.intra)?,
            inter: f(self.inter)?,
        })
    }
}

/// Models handed to the decode dispatcher
#[derive(Debug, Clone)]
pub enum Models {
    /// One team for every decoding phase
    Uniform(Team),

    /// Separate teams for the sentence and document phases
    Split(IntraInterPair<Team>),
}

impl Models {
    /// Teams for the two-phase protocol (a uniform team serves both phases)
    pub fn intra_inter(&self) -> IntraInterPair<Team> {
        match self {
            Models::Uniform(team) => IntraInterPair::new(team.clone(), team.clone()),
            Models::Split(pair) => pair.clone(),
        }
    }
}

impl From<Team> for Models {
    fn from(team: Team) -> Self {
        Models::Uniform(team)
    }
}
