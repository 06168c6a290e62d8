//! Deterministic local fallback provider
//!
//! The universal last chain entry: synthesizes an explanation from
//! lightweight text statistics and builds extractive summaries, with no
//! credential, no network, and no admission budget. Given non-empty input it
//! cannot fail, which is what makes total orchestration failure unreachable.

use super::provider_trait::TextProvider;
use super::types::{
    DetailLevel, ProviderExplanation, ProviderSummary, SummaryLength, TextAnalysis, TextType,
};
use crate::error::{GlossaError, GlossaResult};
use crate::rate_limiter::RateLimitStatus;
use async_trait::async_trait;
use std::collections::BTreeMap;

const NAME: &str = "local";
const MODEL: &str = "local-heuristic";
const MAX_KEYWORDS: usize = 5;
const MIN_KEYWORD_LEN: usize = 4;

const STOPWORDS: [&str; 48] = [
    "about", "after", "again", "also", "been", "before", "being", "between", "both", "cannot",
    "could", "does", "down", "each", "from", "have", "having", "here", "into", "itself", "just",
    "like", "more", "most", "much", "only", "other", "over", "same", "should", "some", "such",
    "than", "that", "their", "them", "then", "there", "these", "they", "this", "very", "were",
    "what", "when", "which", "will", "with",
];

/// Local heuristic provider
#[derive(Debug, Default)]
pub struct LocalProvider;

impl LocalProvider {
    /// Create the local provider
    pub fn new() -> Self {
        Self
    }

    /// Derive lightweight statistics from the input text
    pub fn analyze(text: &str) -> TextAnalysis {
        let words: Vec<&str> = text.split_whitespace().collect();
        let word_count = words.len();
        let sentence_count = split_sentences(text).len().max(1);

        let alphabetic_total: usize = words
            .iter()
            .map(|w| w.chars().filter(|c| c.is_alphabetic()).count())
            .sum();
        let avg_word_length = if word_count == 0 {
            0.0
        } else {
            alphabetic_total as f64 / word_count as f64
        };

        TextAnalysis {
            word_count,
            sentence_count,
            avg_word_length,
            keywords: extract_keywords(&words),
            text_type: detect_text_type(text, avg_word_length, word_count, sentence_count),
        }
    }
}

#[async_trait]
impl TextProvider for LocalProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn initialize(&self) -> GlossaResult<bool> {
        Ok(true)
    }

    async fn explain(&self, text: &str, level: DetailLevel) -> GlossaResult<ProviderExplanation> {
        if text.trim().is_empty() {
            return Err(GlossaError::invalid_input("cannot explain empty text"));
        }
        let analysis = Self::analyze(text);
        Ok(ProviderExplanation {
            explanation: compose_explanation(&analysis, level),
            tokens_used: None,
            model: MODEL.to_string(),
        })
    }

    async fn summarize(
        &self,
        text: &str,
        length: SummaryLength,
    ) -> GlossaResult<ProviderSummary> {
        if text.trim().is_empty() {
            return Err(GlossaError::invalid_input("cannot summarize empty text"));
        }
        Ok(ProviderSummary {
            summary: extractive_summary(text, length),
            tokens_used: None,
        })
    }

    async fn admit(&self) -> GlossaResult<bool> {
        Ok(true)
    }

    async fn rate_limit_status(&self) -> GlossaResult<RateLimitStatus> {
        Ok(RateLimitStatus {
            remaining: u32::MAX,
            window_ms: 0,
            requests_in_window: 0,
            reset_in_ms: 0,
        })
    }
}

/// Split text into sentences on terminating punctuation
///
/// A terminator only closes a sentence at a whitespace boundary, so decimals
/// and abbreviated identifiers stay intact.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            while let Some(&next) = chars.peek() {
                if matches!(next, '"' | '\'' | ')' | ']') {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            let at_boundary = chars.peek().is_none_or(|n| n.is_whitespace());
            if at_boundary {
                let sentence = current.trim().to_string();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                current.clear();
            }
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Top non-stopword terms by frequency, ties broken alphabetically
fn extract_keywords(words: &[&str]) -> Vec<String> {
    let mut frequencies: BTreeMap<String, usize> = BTreeMap::new();
    for word in words {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if cleaned.chars().count() >= MIN_KEYWORD_LEN && !STOPWORDS.contains(&cleaned.as_str()) {
            *frequencies.entry(cleaned).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = frequencies.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word)
        .collect()
}

fn detect_text_type(
    text: &str,
    avg_word_length: f64,
    word_count: usize,
    sentence_count: usize,
) -> TextType {
    let char_count = text.chars().count().max(1);
    let symbol_count = text
        .chars()
        .filter(|c| matches!(c, '{' | '}' | ';' | '=' | '<' | '>' | '[' | ']'))
        .count();
    let symbol_ratio = symbol_count as f64 / char_count as f64;

    if symbol_ratio > 0.04
        || text.contains("fn ")
        || text.contains("def ")
        || text.contains("=>")
        || text.contains("</")
    {
        return TextType::Code;
    }
    if avg_word_length > 6.5 {
        return TextType::Technical;
    }
    if sentence_count >= 3 && word_count / sentence_count <= 25 {
        return TextType::Narrative;
    }
    TextType::General
}

fn compose_explanation(analysis: &TextAnalysis, level: DetailLevel) -> String {
    let topic = if analysis.keywords.is_empty() {
        "its subject".to_string()
    } else {
        analysis.keywords.join(", ")
    };
    let sentence_word = if analysis.sentence_count == 1 {
        "sentence"
    } else {
        "sentences"
    };

    match level {
        DetailLevel::Simple => format!(
            "This is a {} passage of {} words. In plain terms, it talks about: {}.",
            analysis.text_type, analysis.word_count, topic
        ),
        DetailLevel::Standard => format!(
            "This is a {} passage with {} words across {} {}. \
             Its most prominent terms are: {}. Reading the full text is the best way \
             to capture the details; this overview was produced without a remote assistant.",
            analysis.text_type,
            analysis.word_count,
            analysis.sentence_count,
            sentence_word,
            topic
        ),
        DetailLevel::Detailed => format!(
            "This is a {} passage with {} words across {} {} (average word length {:.1} \
             characters). Its most prominent terms are: {}. The vocabulary and structure \
             suggest {} content; this overview was produced from local text statistics \
             without a remote assistant.",
            analysis.text_type,
            analysis.word_count,
            analysis.sentence_count,
            sentence_word,
            analysis.avg_word_length,
            topic,
            analysis.text_type
        ),
    }
}

/// First sentences of the text, up to the target length
fn extractive_summary(text: &str, length: SummaryLength) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return text.trim().chars().take(200).collect();
    }
    sentences
        .iter()
        .take(length.target_sentences())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}
