//! Document-level decode harness
//!
//! Splits a multi-document collection into one decode job per document,
//! runs the jobs on a worker pool and assembles their outputs into a single
//! file in a deterministic order.

pub mod jobs;
pub mod output;

pub use jobs::{decode_to_file, jobs, DecodeContext, DecodeJob, JobReport, JobRunner};
pub use output::{
    concatenate_outputs, read_predictions_output, remove_stale_outputs, render_predictions, tmp_output_filename,
    write_predictions_output,
};
