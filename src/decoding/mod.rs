//! Decoding control engine
//!
//! Scores EDU pairs into candidates, prunes them, hands them to a structural
//! decoder and relabels what comes back.
//!
//! # Architecture
//!
//! - **combine**: attachment × relation probability per pair
//! - **prune**: distance filter with an injected diagnostics sink
//! - **candidates**: joint vs post-label candidate construction
//! - **control**: single-pass and sentence-then-document protocols
//! - **labels**: post-labelling with a clobber policy
//! - **interface**: capability contract for structural decoders
//! - **baseline**: reference decoders

pub mod baseline;
pub mod candidates;
pub mod combine;
pub mod control;
pub mod interface;
pub mod intra;
pub mod labels;
pub mod prune;

pub use baseline::{LastDecoder, LocalDecoder, SentenceComposer};
pub use candidates::build_candidates;
pub use combine::{combine_probs, predict_attach, predict_relate};
pub use control::{decode, decode_intra_inter, decode_vanilla, decode_with_sink};
pub use interface::{Decoder, IntraInterDecoder, StructuralDecoder};
pub use intra::{select_subgrouping, subgroupings, Sentence};
pub use labels::{add_labels, maybe_post_label};
pub use prune::{prune_by_distance, DiagnosticsSink, MaxDistTable, TracingSink};
