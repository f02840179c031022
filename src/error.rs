//! Error types for the pdf-descriptor library.
//!
//! A single [`AnalyzeError`] enum covers every failure mode because one
//! analysis request is a single linear pass: each step either succeeds or
//! terminates the request. There are no partial results to report alongside
//! an error.
//!
//! The taxonomy keeps four user-facing conditions distinct:
//!
//! * validation failures ([`DocumentTooLarge`](AnalyzeError::DocumentTooLarge),
//!   [`TooManyPages`](AnalyzeError::TooManyPages)) — the file itself is out
//!   of bounds; the user must resubmit a conforming one.
//! * [`ParseFailed`](AnalyzeError::ParseFailed) — the PDF byte stream could
//!   not be read; blocks only the text-only provider path.
//! * [`RateLimited`](AnalyzeError::RateLimited) — the provider is throttling;
//!   retry later. Never retried automatically.
//! * [`Provider`](AnalyzeError::Provider) — every other remote failure
//!   (auth, malformed request, network, 5xx) with the upstream message
//!   passed through verbatim.

use thiserror::Error;

/// All errors returned by the pdf-descriptor library.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// Document exceeds the 32 MiB provider upload limit.
    #[error(
        "Document is {size_bytes} bytes, above the {limit_bytes}-byte (32 MiB) limit.\n\
         Compress or split the PDF and retry."
    )]
    DocumentTooLarge { size_bytes: u64, limit_bytes: u64 },

    /// Document exceeds the 100-page provider limit.
    #[error(
        "Document has {pages} pages, above the {limit}-page limit.\n\
         Split the PDF and analyse the parts separately."
    )]
    TooManyPages { pages: usize, limit: usize },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The byte stream is not a readable PDF; text extraction failed.
    #[error("Could not extract text from '{name}': {detail}")]
    ParseFailed { name: String, detail: String },

    // ── Provider errors ───────────────────────────────────────────────────
    /// No API key was supplied and none was found in the environment.
    #[error("No API key for provider '{provider}'.\n{hint}")]
    MissingApiKey { provider: String, hint: String },

    /// Remote API returned HTTP 429 — retry later.
    ///
    /// Check `retry_after_secs` for a server-specified delay. This error is
    /// surfaced distinctly so callers can advise the user; the library never
    /// retries on its own.
    #[error("Rate limit reached for provider '{provider}'. Please try again in a moment.")]
    RateLimited {
        provider: String,
        retry_after_secs: Option<u64>,
    },

    /// Any other remote failure: auth, malformed request, network, 5xx.
    #[error("Error calling {provider} API: {message}")]
    Provider { provider: String, message: String },

    // ── Packaging errors ──────────────────────────────────────────────────
    /// The in-memory result archive could not be constructed.
    #[error("Failed to build result archive: {detail}")]
    ArchiveFailed { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_display() {
        let e = AnalyzeError::DocumentTooLarge {
            size_bytes: 33_554_433,
            limit_bytes: 33_554_432,
        };
        let msg = e.to_string();
        assert!(msg.contains("33554433"), "got: {msg}");
        assert!(msg.contains("32 MiB"));
    }

    #[test]
    fn rate_limited_display() {
        let e = AnalyzeError::RateLimited {
            provider: "anthropic".into(),
            retry_after_secs: Some(30),
        };
        assert!(e.to_string().contains("anthropic"));
    }

    #[test]
    fn provider_message_passed_through() {
        let e = AnalyzeError::Provider {
            provider: "openai".into(),
            message: "invalid_api_key: check your key".into(),
        };
        assert!(e.to_string().contains("invalid_api_key"));
    }
}
