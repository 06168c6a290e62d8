//! Shared provider request and response types

use serde::{Deserialize, Serialize};

/// How much depth an explanation should go into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Plain-language explanation for a casual reader
    Simple,
    /// Balanced explanation
    #[default]
    Standard,
    /// Thorough explanation that keeps technical vocabulary
    Detailed,
}

impl DetailLevel {
    /// Stable tag used in cache keys and result metadata
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Standard => "standard",
            Self::Detailed => "detailed",
        }
    }
}

/// Target length of a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    /// One sentence
    Short,
    /// A few sentences
    #[default]
    Medium,
    /// A short paragraph
    Long,
}

impl SummaryLength {
    /// Stable tag used in cache keys and result metadata
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Sentence budget for the extractive local fallback
    pub fn target_sentences(&self) -> usize {
        match self {
            Self::Short => 1,
            Self::Medium => 3,
            Self::Long => 5,
        }
    }
}

/// Raw explanation produced by one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderExplanation {
    /// The explanation text
    pub explanation: String,
    /// Backend-reported token usage, where the backend reports one
    pub tokens_used: Option<u32>,
    /// Model that produced the explanation
    pub model: String,
}

/// Raw summary produced by one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    /// The summary text
    pub summary: String,
    /// Backend-reported token usage, where the backend reports one
    pub tokens_used: Option<u32>,
}

/// Coarse classification of the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    /// Source code or markup
    Code,
    /// Prose dominated by long or specialized vocabulary
    Technical,
    /// Flowing prose in ordinary language
    Narrative,
    /// Anything else
    General,
}

impl std::fmt::Display for TextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code => write!(f, "code"),
            Self::Technical => write!(f, "technical"),
            Self::Narrative => write!(f, "narrative"),
            Self::General => write!(f, "general"),
        }
    }
}

/// Lightweight statistics the local provider derives from the input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAnalysis {
    /// Number of whitespace-separated words
    pub word_count: usize,
    /// Number of sentences
    pub sentence_count: usize,
    /// Mean alphabetic length of a word
    pub avg_word_length: f64,
    /// Most frequent non-stopword terms, most frequent first
    pub keywords: Vec<String>,
    /// Detected text category
    pub text_type: TextType,
}
