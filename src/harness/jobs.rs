//! Per-document decode jobs and the worker pool that runs them
//!
//! A job is a plain value (document id, datapack, temporary output path).
//! Everything shared between jobs lives in a read-only [`DecodeContext`]
//! behind an `Arc`, so jobs can run on any number of blocking workers
//! without synchronization.

use super::output::{concatenate_outputs, remove_stale_outputs, tmp_output_filename, write_predictions_output};
use crate::datapack::{Datapack, Multipack};
use crate::decoding::{decode, MaxDistTable, StructuralDecoder};
use crate::error::{DecoderError, Result};
use crate::evaluation::select_first;
use crate::learning::Models;
use crate::types::DecodingMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// Read-only inputs shared by every job of a run
#[derive(Debug, Clone)]
pub struct DecodeContext {
    pub models: Models,
    pub decoder: StructuralDecoder,
    pub mode: DecodingMode,
    pub max_dist: Option<MaxDistTable>,
}

/// Decoding of a single document into its own temporary file
#[derive(Debug, Clone)]
pub struct DecodeJob {
    pub document: String,
    pub dpack: Datapack,
    pub output_path: PathBuf,
}

/// What a finished job produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub document: String,
    pub output_path: PathBuf,
    pub edges: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl DecodeJob {
    /// Decode the document and write the decoder's first prediction.
    ///
    /// Nothing is written unless decoding succeeds.
    pub fn run(&self, ctx: &DecodeContext) -> Result<JobReport> {
        let started_at = Utc::now();
        let predictions = decode(&self.dpack, &ctx.models, &ctx.decoder, ctx.mode, ctx.max_dist.as_ref())?;
        // we trust the decoder to select what it thinks is its best prediction
        let first = select_first(&predictions)?;
        write_predictions_output(&self.dpack, first, &self.output_path)?;

        debug!("Decoded {} ({} edges)", self.document, first.len());
        Ok(JobReport {
            document: self.document.clone(),
            output_path: self.output_path.clone(),
            edges: first.len(),
            started_at,
            completed_at: Utc::now(),
        })
    }
}

/// One job per document of the multipack, after clearing temporaries left
/// over from a previous run for the same output
pub fn jobs(mpack: &Multipack, output_path: &Path) -> Result<Vec<DecodeJob>> {
    remove_stale_outputs(mpack.keys().map(String::as_str), output_path)?;
    Ok(mpack
        .iter()
        .map(|(document, dpack)| DecodeJob {
            document: document.clone(),
            dpack: dpack.clone(),
            output_path: tmp_output_filename(output_path, document),
        })
        .collect())
}

/// Runs decode jobs on a bounded pool of blocking workers
#[derive(Debug, Clone)]
pub struct JobRunner {
    workers: usize,
}

impl JobRunner {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every job to completion.
    ///
    /// Reports come back in job order. All jobs are awaited even when one
    /// fails; the first failure is then returned.
    pub async fn run(&self, jobs: Vec<DecodeJob>, ctx: Arc<DecodeContext>) -> Result<Vec<JobReport>> {
        info!("Running {} decode jobs on {} workers", jobs.len(), self.workers);
        let semaphore = Arc::new(Semaphore::new(self.workers));

        let mut handles = Vec::with_capacity(jobs.len());
        for job in jobs {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| DecoderError::Job(format!("worker pool closed: {}", e)))?;
            let ctx = ctx.clone();
            let document = job.document.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let result = job.run(&ctx);
                drop(permit);
                result
            });
            handles.push((document, handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        let mut first_error = None;
        for (document, handle) in handles {
            let outcome = handle.await.map_err(|e| {
                error!("Tokio spawn_blocking failed: {}", e);
                DecoderError::Job(format!("job for {} did not complete: {}", document, e))
            });
            match outcome.and_then(|r| r) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("Decoding {} failed: {}", document, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }
}

/// Decode every document of the multipack into `output_path`.
///
/// Documents are decoded in parallel, each into its own temporary file, and
/// concatenated in document-id order. If any document fails, or the
/// concatenation does, every temporary and any partial output are removed.
pub async fn decode_to_file(
    mpack: &Multipack,
    ctx: Arc<DecodeContext>,
    runner: &JobRunner,
    output_path: &Path,
) -> Result<Vec<JobReport>> {
    let jobs = jobs(mpack, output_path)?;
    let documents = || mpack.keys().map(String::as_str);

    let reports = match runner.run(jobs, ctx).await {
        Ok(reports) => reports,
        Err(e) => {
            discard_outputs(documents(), output_path, false);
            return Err(e);
        }
    };
    if let Err(e) = concatenate_outputs(documents(), output_path) {
        error!("Concatenating outputs into {:?} failed: {}", output_path, e);
        discard_outputs(documents(), output_path, true);
        return Err(e);
    }
    info!("Wrote {} documents to {:?}", reports.len(), output_path);
    Ok(reports)
}

/// Best-effort removal of the temporaries of a failed run, and of the final
/// output when it may have been partially written
fn discard_outputs<'a>(documents: impl IntoIterator<Item = &'a str>, output_path: &Path, partial_output: bool) {
    let mut paths: Vec<PathBuf> = documents
        .into_iter()
        .map(|d| tmp_output_filename(output_path, d))
        .collect();
    if partial_output {
        paths.push(output_path.to_path_buf());
    }
    for path in paths.iter().filter(|p| p.is_file()) {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove {:?}: {}", path, e);
        }
    }
}
