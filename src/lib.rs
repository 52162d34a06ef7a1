//! Discourse decoder - structured prediction over discourse units
//!
//! Given a document segmented into elementary discourse units (EDUs) and
//! per-pair classifier scores, build a scored candidate graph over EDU pairs,
//! hand it to a structural decoder and relabel the resulting structures.
//!
//! # Architecture
//!
//! The crate is organized into several layers:
//! - **Types**: EDUs, candidates, edges and predictions
//! - **Datapack**: EDU pairings with features, gold targets and their views
//! - **Learning**: attachment/relation models (oracle or fitted)
//! - **Decoding**: candidate construction, pruning, decoding protocols
//! - **Evaluation**: counts against the gold and best-prediction selection
//! - **Harness**: per-document jobs on a worker pool and output assembly
//!
//! # Example
//!
//! ```ignore
//! use discourse_core::{decode, Datapack, DecodingMode, LocalDecoder, Models, StructuralDecoder, Team};
//!
//! fn main() -> discourse_core::Result<()> {
//!     let dpack = Datapack::from_json_file("corpus.json".as_ref())?;
//!     let decoder = StructuralDecoder::whole(LocalDecoder::new(0.5));
//!     let models = Models::from(Team::oracle());
//!
//!     let predictions = decode(&dpack, &models, &decoder, DecodingMode::Joint, None)?;
//!     println!("{} edges", predictions[0].len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod datapack;
pub mod decoding;
pub mod error;
pub mod evaluation;
pub mod harness;
pub mod learning;
pub mod types;

// Re-export commonly used types
pub use config::{DecodeConfig, DecoderChoice};
pub use datapack::{Datapack, Multipack, RawDatapack};
pub use decoding::{
    decode, Decoder, IntraInterDecoder, LastDecoder, LocalDecoder, MaxDistTable, SentenceComposer,
    StructuralDecoder,
};
pub use error::{DecoderError, Result};
pub use evaluation::{decode_fold, Count};
pub use harness::{decode_to_file, DecodeContext, JobRunner};
pub use learning::{IntraInterPair, LinearClassifier, Model, Models, Team};
pub use types::{Candidate, DecodingMode, Edge, Edu, EduId, Prediction};
