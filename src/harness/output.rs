//! Per-document prediction output and its concatenation
//!
//! Every document is written to its own temporary file next to the final
//! output, named `_<output basename>.<document id>`. Once all documents are
//! done the temporaries are concatenated in document-id order, which fixes
//! the offsets of every document in the final file.

use crate::datapack::Datapack;
use crate::error::{DecoderError, Result};
use crate::types::{Edge, EduId, Prediction, UNRELATED};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Temporary file name for one document's segment of the output
pub fn tmp_output_filename(output_path: &Path, document: &str) -> PathBuf {
    let basename = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("_{}.{}", basename, document);
    match output_path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// One line per pairing of the datapack: `source\ttarget\tlabel`, with
/// `UNRELATED` for pairs the prediction leaves out
pub fn render_predictions(dpack: &Datapack, prediction: &Prediction) -> String {
    let predicted: HashMap<(&EduId, &EduId), &str> = prediction
        .iter()
        .map(|e| ((&e.source, &e.target), e.label.as_str()))
        .collect();

    let mut out = String::new();
    for (edu1, edu2) in dpack.pairings() {
        let label = predicted.get(&(&edu1.id, &edu2.id)).copied().unwrap_or(UNRELATED);
        out.push_str(&format!("{}\t{}\t{}\n", edu1.id, edu2.id, label));
    }
    out
}

/// Write a prediction for a datapack.
///
/// The content is rendered before the file is created, and a failed write
/// removes what was written, so a file either holds the full document or
/// does not exist.
pub fn write_predictions_output(dpack: &Datapack, prediction: &Prediction, path: &Path) -> Result<()> {
    let content = render_predictions(dpack, prediction);
    if let Err(e) = fs::write(path, content) {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }
    Ok(())
}

/// Read back the edges of a prediction file (pairs labelled `UNRELATED`
/// are not edges)
pub fn read_predictions_output(path: &Path) -> Result<Vec<Edge>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            match fields.as_slice() {
                [_, _, label] if *label == UNRELATED => None,
                [source, target, label] => Some(Ok(Edge::new(*source, *target, *label))),
                _ => Some(Err(DecoderError::Other(format!("malformed prediction line: {:?}", line)))),
            }
        })
        .collect()
}

/// Remove temporaries left behind by a previous run for the same output
pub fn remove_stale_outputs<'a>(
    documents: impl IntoIterator<Item = &'a str>,
    output_path: &Path,
) -> Result<()> {
    for document in documents {
        let tmp = tmp_output_filename(output_path, document);
        if tmp.exists() {
            warn!("Removing stale temporary output {:?}", tmp);
            fs::remove_file(&tmp)?;
        }
    }
    Ok(())
}

/// Concatenate the per-document temporaries (sorted by document id) into
/// the final output, then delete them
pub fn concatenate_outputs<'a>(
    documents: impl IntoIterator<Item = &'a str>,
    output_path: &Path,
) -> Result<()> {
    let mut documents: Vec<&str> = documents.into_iter().collect();
    documents.sort_unstable();
    let tmpfiles: Vec<PathBuf> = documents
        .iter()
        .map(|d| tmp_output_filename(output_path, d))
        .collect();

    let mut file_out = BufWriter::new(File::create(output_path)?);
    for tfile in &tmpfiles {
        let bytes = fs::read(tfile)?;
        file_out.write_all(&bytes)?;
    }
    file_out.flush()?;

    for tfile in &tmpfiles {
        fs::remove_file(tfile)?;
    }
    debug!("Concatenated {} documents into {:?}", tmpfiles.len(), output_path);
    Ok(())
}
