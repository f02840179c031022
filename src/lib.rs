//! # pdf-descriptor
//!
//! Describe PDF documents with LLMs: a page-by-page description or a
//! narrated technical lesson, packaged with the original file for download.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Ingest    wrap bytes, extract per-page text, enforce limits
//!  ├─ 2. Prompt    fixed per-mode template + optional user context
//!  ├─ 3. Dispatch  one call to Anthropic (native PDF) or OpenAI (text-only)
//!  ├─ 4. Estimate  advisory token figures from the page count
//!  └─ 5. Package   zip: original PDF + description, deterministic names
//! ```
//!
//! One request makes exactly one outbound API call. There is no retry, no
//! streaming, and no state shared across requests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_descriptor::{analyze, AnalysisConfig, Document};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key auto-detected from ANTHROPIC_API_KEY
//!     let bytes = std::fs::read("report.pdf")?;
//!     let document = Document::load("report.pdf", bytes);
//!     let output = analyze(&document, &AnalysisConfig::default()).await?;
//!     println!("{}", output.preview);
//!     std::fs::write(&output.archive.file_name, &output.archive.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Choosing a Provider
//!
//! | Provider | Input | Models |
//! |----------|-------|--------|
//! | `anthropic` (default) | the PDF itself, as a native document attachment | five Claude models, Haiku 3.5 (cheapest) to Opus 4 (most capable) |
//! | `openai` | extracted text interpolated into the prompt | `gpt-4o`, fixed |
//!
//! The native path reads page images as well as text, so it handles charts,
//! tables, and scanned content; the text-only path needs a PDF with an
//! extractable text layer. Documents on the native path must be at most
//! 32 MiB and 100 pages — the provider's own limits, enforced locally.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfdesc` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-descriptor = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod archive;
pub mod config;
pub mod document;
pub mod error;
pub mod estimate;
pub mod output;
pub mod prompts;
pub mod provider;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_sync};
pub use archive::ResultArchive;
pub use config::{AnalysisConfig, AnalysisConfigBuilder, AnalysisMode, OutputLanguage};
pub use document::{Document, MAX_DOCUMENT_BYTES, MAX_PAGES};
pub use error::AnalyzeError;
pub use estimate::{estimate, TokenEstimate};
pub use output::{AnalysisOutput, AnalysisResult, PREVIEW_CHARS};
pub use prompts::build_prompt;
pub use provider::{
    AnthropicProvider, ClaudeModel, GenerationRequest, OpenAiProvider, Provider, ProviderKind,
};
