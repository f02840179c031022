//! Token-usage estimation for cost transparency.
//!
//! The constants are heuristics calibrated against observed native-PDF
//! billing: each page contributes both text tokens and image tokens because
//! the provider processes every page as text *and* as an image. The figures
//! are advisory only — nothing in the pipeline depends on them.

use serde::{Deserialize, Serialize};

/// Average text tokens billed per page (observed range 1 500–3 000).
pub const TEXT_TOKENS_PER_PAGE: u64 = 2250;

/// Image tokens billed per page for the vision pass.
pub const IMAGE_TOKENS_PER_PAGE: u64 = 1600;

/// Output tokens generated per page of description.
pub const OUTPUT_TOKENS_PER_PAGE: u64 = 500;

/// Hard cap on the completion, matching the request's `max_tokens`.
pub const MAX_OUTPUT_TOKENS: u64 = 8192;

/// Estimated token usage for one analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEstimate {
    /// Total billed input tokens: text plus image.
    pub input_tokens: u64,
    /// Text-processing share of the input.
    pub text_tokens: u64,
    /// Vision-processing share of the input.
    pub image_tokens: u64,
    /// Expected completion size, capped at [`MAX_OUTPUT_TOKENS`].
    pub output_tokens: u64,
}

/// Estimate token usage from the page count. Pure; no error conditions.
pub fn estimate(page_count: usize) -> TokenEstimate {
    let pages = page_count as u64;
    let text_tokens = pages * TEXT_TOKENS_PER_PAGE;
    let image_tokens = pages * IMAGE_TOKENS_PER_PAGE;
    TokenEstimate {
        input_tokens: text_tokens + image_tokens,
        text_tokens,
        image_tokens,
        output_tokens: MAX_OUTPUT_TOKENS.min(pages * OUTPUT_TOKENS_PER_PAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pages_is_all_zero() {
        let e = estimate(0);
        assert_eq!(e.input_tokens, 0);
        assert_eq!(e.output_tokens, 0);
    }

    #[test]
    fn input_is_sum_of_text_and_image() {
        for pages in [1, 3, 50, 100, 1000] {
            let e = estimate(pages);
            assert_eq!(e.input_tokens, e.text_tokens + e.image_tokens);
            assert_eq!(e.input_tokens, pages as u64 * (2250 + 1600));
        }
    }

    #[test]
    fn output_caps_at_8192() {
        // 500 tokens/page crosses the cap between 16 and 17 pages.
        assert_eq!(estimate(16).output_tokens, 8000);
        assert_eq!(estimate(17).output_tokens, 8192);
        assert_eq!(estimate(100).output_tokens, 8192);
        for pages in 0..200 {
            assert!(estimate(pages).output_tokens <= MAX_OUTPUT_TOKENS);
        }
    }
}
