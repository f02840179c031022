//! Output types: the generated description and the bundle returned to the
//! caller.

use crate::archive::ResultArchive;
use crate::config::AnalysisMode;
use crate::estimate::TokenEstimate;
use serde::{Deserialize, Serialize};

/// Number of characters shown in the human-readable preview.
pub const PREVIEW_CHARS: usize = 2000;

/// The generated description. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The full description or lesson text.
    pub description: String,
    /// Provider that produced it, e.g. `"anthropic"`.
    pub provider: String,
    /// Filename-safe model tag, when the model is known.
    pub model: Option<String>,
    /// Mode the description was generated in.
    pub mode: AnalysisMode,
}

/// Everything one analysis request hands back to the caller.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    /// The generated description with its provenance.
    pub result: AnalysisResult,
    /// Downloadable archive: original PDF + description text.
    pub archive: ResultArchive,
    /// Advisory token figures; `None` when the page count is unknown
    /// (unparseable PDF analysed on the native path).
    pub estimate: Option<TokenEstimate>,
    /// First [`PREVIEW_CHARS`] characters of the description, for display.
    pub preview: String,
}

/// Truncate a description to the preview length on a character boundary.
///
/// Appends `...` only when something was actually cut.
pub fn preview(description: &str) -> String {
    match description.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &description[..idx]),
        None => description.to_string(),
    }
}
