//! Analysis Result - Output structure of the free-text pipeline.

use serde::{Deserialize, Serialize};

use super::cooccurrence::CooccurrencePair;
use super::keywords::KeywordCount;

/// Which family of components served the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMethod {
    /// At least one call was served by the morphological tokenizer or the external model
    Improved,
    /// Punctuation split and lexicon only
    Simple,
}

impl AnalysisMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMethod::Improved => "improved",
            AnalysisMethod::Simple => "simple",
        }
    }
}

/// Complete result of a text analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Corpus keyword ranking
    pub keywords: Vec<KeywordCount>,

    /// Most frequent token pairs
    pub cooccurrences: Vec<CooccurrencePair>,

    /// Mean sentiment over analyzed texts, 0.0 when none
    pub average_sentiment: f64,

    /// Every entry of the input list, including skipped ones
    pub total_texts: usize,

    /// Entries that were non-blank and went through the pipeline
    pub analyzed_texts: usize,

    pub analysis_method: AnalysisMethod,
}

impl AnalysisResult {
    /// Result for a run where nothing was analyzed.
    pub fn empty(total_texts: usize) -> Self {
        Self {
            keywords: Vec::new(),
            cooccurrences: Vec::new(),
            average_sentiment: 0.0,
            total_texts,
            analyzed_texts: 0,
            analysis_method: AnalysisMethod::Simple,
        }
    }
}
