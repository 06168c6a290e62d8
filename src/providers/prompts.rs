//! Prompt text shared across remote backends
//!
//! Both remote clients build their requests from these strings, so identical
//! `(text, level)` input produces semantically equivalent requests regardless
//! of which backend serves it. That equivalence is what makes one provider
//! substitutable for another in the fallback chain.

use super::types::{DetailLevel, SummaryLength};

/// System instruction for explanation requests
pub(super) const EXPLAIN_SYSTEM: &str = "You are a reading assistant. A user has selected a \
passage of text and wants it explained. Explain what the text means and why it matters, \
without inventing facts that are not supported by the passage.";

/// System instruction for summarization requests
pub(super) const SUMMARIZE_SYSTEM: &str = "You are a reading assistant. Summarize the passage \
the user provides, preserving its key claims and omitting decoration.";

/// Level-specific guidance appended to the explanation instruction
pub(super) fn explain_guidance(level: DetailLevel) -> &'static str {
    match level {
        DetailLevel::Simple => {
            "Use everyday words and short sentences, as if explaining to someone \
             encountering the topic for the first time. Avoid jargon entirely."
        }
        DetailLevel::Standard => {
            "Keep the explanation concise and accessible, defining any technical \
             terms the passage relies on."
        }
        DetailLevel::Detailed => {
            "Give a thorough explanation. Keep the passage's technical vocabulary, \
             unpack its structure, and spell out any implicit assumptions."
        }
    }
}

/// Length guidance appended to the summarization instruction
pub(super) fn summarize_guidance(length: SummaryLength) -> &'static str {
    match length {
        SummaryLength::Short => "Reply with a single sentence.",
        SummaryLength::Medium => "Reply with two to three sentences.",
        SummaryLength::Long => "Reply with a short paragraph of up to five sentences.",
    }
}

/// User-turn content for an explanation request
pub(super) fn explain_user_message(text: &str, level: DetailLevel) -> String {
    format!(
        "{}\n\nExplain the following text:\n\n{}",
        explain_guidance(level),
        text
    )
}

/// User-turn content for a summarization request
pub(super) fn summarize_user_message(text: &str, length: SummaryLength) -> String {
    format!(
        "{}\n\nSummarize the following text:\n\n{}",
        summarize_guidance(length),
        text
    )
}
