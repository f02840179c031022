//! Result packaging: bundle the original PDF and the generated description
//! into one downloadable zip.
//!
//! Entry names are deterministic functions of provider, model, mode, and the
//! original filename — no timestamps, no randomness. Two identical requests
//! produce identically named entries, which keeps downstream tooling (and
//! tests) simple. The archive always has exactly two entries.

use crate::document::Document;
use crate::error::AnalyzeError;
use crate::output::AnalysisResult;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// The final deliverable: a two-entry deflated zip held in memory.
#[derive(Debug, Clone)]
pub struct ResultArchive {
    /// The zip file bytes.
    pub bytes: Vec<u8>,
    /// Deterministic suggested download name, e.g.
    /// `pdf_lesson_anthropic_sonnet4.zip`.
    pub file_name: String,
    /// Name of the entry holding the original PDF.
    pub original_entry: String,
    /// Name of the entry holding the description text.
    pub description_entry: String,
}

/// Bundle the original document and the generated description.
///
/// The original bytes go in unchanged under `original_{filename}`; the
/// description goes in UTF-8-encoded under a name derived from provider,
/// model, mode, and the filename stem. The only failure mode is an I/O
/// error while writing the in-memory zip.
pub fn package(document: &Document, result: &AnalysisResult) -> Result<ResultArchive, AnalyzeError> {
    let original_entry = format!("original_{}", document.name);
    let description_entry = description_entry_name(result, document.stem());

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        zip.start_file(&original_entry, options)
            .map_err(|e| archive_failed("add original entry", e))?;
        zip.write_all(&document.bytes)
            .map_err(|e| archive_failed("write original bytes", e))?;

        zip.start_file(&description_entry, options)
            .map_err(|e| archive_failed("add description entry", e))?;
        zip.write_all(result.description.as_bytes())
            .map_err(|e| archive_failed("write description text", e))?;

        zip.finish()
            .map_err(|e| archive_failed("finalise archive", e))?;
    }

    debug!(
        "Packaged archive: {} bytes, entries '{}' + '{}'",
        buffer.len(),
        original_entry,
        description_entry
    );

    Ok(ResultArchive {
        bytes: buffer,
        file_name: archive_file_name(result),
        original_entry,
        description_entry,
    })
}

/// Description entry name:
/// `description_{provider}[_{model}][_lesson]_{stem}.txt`.
fn description_entry_name(result: &AnalysisResult, stem: &str) -> String {
    let mode_suffix = match result.mode {
        crate::config::AnalysisMode::Discourse => "_lesson",
        crate::config::AnalysisMode::Standard => "",
    };
    match result.model.as_deref() {
        Some(model) => format!(
            "description_{}_{}{}_{}.txt",
            result.provider, model, mode_suffix, stem
        ),
        None => format!("description_{}{}_{}.txt", result.provider, mode_suffix, stem),
    }
}

/// Deterministic suggested download name for the whole archive.
fn archive_file_name(result: &AnalysisResult) -> String {
    let mode = match result.mode {
        crate::config::AnalysisMode::Discourse => "lesson",
        crate::config::AnalysisMode::Standard => "analysis",
    };
    match result.model.as_deref() {
        Some(model) => format!("pdf_{}_{}_{}.zip", mode, result.provider, model),
        None => format!("pdf_{}_{}.zip", mode, result.provider),
    }
}

fn archive_failed(step: &str, err: impl std::fmt::Display) -> AnalyzeError {
    AnalyzeError::ArchiveFailed {
        detail: format!("{step}: {err}"),
    }
}
