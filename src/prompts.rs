//! Instruction templates for the two analysis modes.
//!
//! Centralising every template here serves two purposes:
//!
//! 1. **Single source of truth** — changing what the model is asked to do
//!    requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the built prompt directly
//!    without a live API call, so template regressions are caught cheaply.
//!
//! [`build_prompt`] is a pure function of its parameters: no locale or mode
//! is read from ambient state. The `{language}` placeholder is the only
//! substitution performed on the templates themselves; user context and
//! extracted document text are appended verbatim, never transformed.
//!
//! The builder never truncates. A prompt that exceeds the provider's context
//! window is the provider's error to report at dispatch time.

use crate::config::{AnalysisMode, OutputLanguage};

/// Standard mode: a page-by-page description of the document.
const STANDARD_TEMPLATE: &str = "\
Analyse this PDF document and provide a detailed description of every page, \
written entirely in {language}.

For each page of the document:
1. State the page number clearly
2. Describe the textual content in detail
3. Describe any charts, tables, images or diagrams that appear
4. Highlight the key information and main points
5. Preserve the structure and organisation of the original content

Provide a complete, professional description that allows the document to be \
understood without reading it directly.";

/// Discourse mode: a four-part narrated technical lesson.
const DISCOURSE_TEMPLATE: &str = "\
Analyse this PDF document and create a detailed technical lesson in discourse \
form, written entirely in {language}.

Structure the lesson as an instructional technical talk:

1. **Introduction to the lesson**
   - Present the main topic of the document
   - Explain the learning objectives
   - Give an overview of the key concepts that will be covered

2. **Development of the content**
   - Turn the content of each page into a flowing, didactic narrative
   - Explain the concepts as if you were delivering a lecture
   - Use practical examples and analogies where appropriate
   - Connect the topics in a logical, progressive order
   - Highlight the relationships between the different concepts

3. **Technical deep-dives**
   - For charts, tables and diagrams: explain them in detail as you would in a classroom
   - Provide context and interpretation
   - Add practical considerations and real-world applications

4. **Synthesis and conclusions**
   - Summarise the key points covered
   - Highlight the practical implications
   - Suggest possible further study

The tone must be professional yet accessible, like an experienced lecturer \
speaking to students or practitioners.";

/// Appended in discourse mode when the caller supplied extra context.
///
/// The user text follows this clause verbatim.
const CONTEXT_INTEGRATION_CLAUSE: &str = "\n\n\
**IMPORTANT**: Also weave the following user-supplied information into the \
discourse, connecting it organically with the content of the PDF:\n\n";

/// Introduces the interpolated document text on the text-only provider path.
const DOCUMENT_TRAILER: &str = "\n\nDocument:\n";

/// Build the exact instruction text sent to the model.
///
/// * `document_text` — `Some` on the text-only provider path, where the
///   extracted text is interpolated into the prompt body instead of being
///   attached as a document. `None` on the native-document path.
/// * `user_context` — woven into the narrative in discourse mode only;
///   standard mode ignores it. Empty or whitespace-only context adds nothing.
pub fn build_prompt(
    mode: AnalysisMode,
    language: OutputLanguage,
    document_text: Option<&str>,
    user_context: Option<&str>,
) -> String {
    let template = match mode {
        AnalysisMode::Standard => STANDARD_TEMPLATE,
        AnalysisMode::Discourse => DISCOURSE_TEMPLATE,
    };

    let mut prompt = template.replace("{language}", language.name());

    if mode == AnalysisMode::Discourse {
        if let Some(ctx) = user_context.filter(|c| !c.trim().is_empty()) {
            prompt.push_str(CONTEXT_INTEGRATION_CLAUSE);
            prompt.push_str(ctx);
        }
    }

    if let Some(text) = document_text {
        prompt.push_str(DOCUMENT_TRAILER);
        prompt.push_str(text);
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_mode_ignores_user_context() {
        let p = build_prompt(
            AnalysisMode::Standard,
            OutputLanguage::Italian,
            None,
            Some("Focus on safety"),
        );
        assert!(!p.contains("Focus on safety"));
        assert!(!p.contains("IMPORTANT"));
    }

    #[test]
    fn discourse_mode_includes_context_verbatim() {
        let p = build_prompt(
            AnalysisMode::Discourse,
            OutputLanguage::Italian,
            None,
            Some("Focus on safety"),
        );
        assert!(p.contains("Focus on safety"));
        assert!(p.contains("**IMPORTANT**"));
    }

    #[test]
    fn discourse_mode_empty_context_omits_clause() {
        for ctx in [None, Some(""), Some("   \n")] {
            let p = build_prompt(AnalysisMode::Discourse, OutputLanguage::Italian, None, ctx);
            assert!(!p.contains("IMPORTANT"), "clause leaked for ctx {ctx:?}");
        }
    }

    #[test]
    fn language_is_interpolated() {
        let it = build_prompt(AnalysisMode::Standard, OutputLanguage::Italian, None, None);
        assert!(it.contains("entirely in Italian"));
        let en = build_prompt(AnalysisMode::Standard, OutputLanguage::English, None, None);
        assert!(en.contains("entirely in English"));
        assert!(!en.contains("{language}"));
    }

    #[test]
    fn document_text_is_interpolated_for_text_only_path() {
        let p = build_prompt(
            AnalysisMode::Standard,
            OutputLanguage::Italian,
            Some("--- Page 1 ---\nhello"),
            None,
        );
        assert!(p.ends_with("Document:\n--- Page 1 ---\nhello"));
    }

    #[test]
    fn builder_never_truncates() {
        let long_text = "x".repeat(1_000_000);
        let p = build_prompt(
            AnalysisMode::Discourse,
            OutputLanguage::English,
            Some(&long_text),
            None,
        );
        assert!(p.len() > 1_000_000);
    }
}
