//! Survey Text Analyzer - Orchestrator of the free-text pipeline.
//!
//! For each non-blank answer:
//! 1. Tokenize (morphological analyzer, or punctuation split)
//! 2. Collect the per-text keyword candidates
//! 3. Score sentiment (external model, or lexicon)
//!
//! Then build the corpus keyword ranking and the co-occurrence pairs once.

use std::time::Instant;
use tracing::{debug, info};

use super::cooccurrence::CooccurrenceBuilder;
use super::engines::AnalysisEngines;
use super::keywords::{aggregate, extract_keywords};
use super::result::{AnalysisMethod, AnalysisResult};
use crate::config::TextAnalysisConfig;

/// Runs the text pipeline against a set of resolved engines
pub struct SurveyTextAnalyzer<'a> {
    engines: &'a AnalysisEngines,
    config: TextAnalysisConfig,
    cooccurrence: CooccurrenceBuilder,
}

impl<'a> SurveyTextAnalyzer<'a> {
    pub fn new(engines: &'a AnalysisEngines, config: TextAnalysisConfig) -> Self {
        let cooccurrence = CooccurrenceBuilder::new(config.window, config.top_pairs);
        Self {
            engines,
            config,
            cooccurrence,
        }
    }

    /// Analyze every answer; blank and `null` entries are counted but skipped.
    pub fn analyze(&self, texts: &[Option<String>]) -> AnalysisResult {
        let start = Instant::now();

        let mut per_text_keywords = Vec::new();
        let mut sequences = Vec::new();
        let mut sentiment_sum = 0.0;
        let mut enhanced = false;

        for text in texts.iter().flatten() {
            if text.trim().is_empty() {
                continue;
            }

            let tokenized = self.engines.tokenizer.tokenize(text);
            let scored = self.engines.sentiment.score(text);
            enhanced |= tokenized.strategy.is_enhanced() || scored.strategy.is_enhanced();

            debug!(
                "{} tokens via {:?}, sentiment {:.2} via {:?}",
                tokenized.tokens.len(),
                tokenized.strategy,
                scored.score,
                scored.strategy
            );

            per_text_keywords.push(extract_keywords(
                &tokenized.tokens,
                self.config.keywords_per_text,
            ));
            sentiment_sum += scored.score;
            sequences.push(tokenized.tokens);
        }

        let analyzed_texts = sequences.len();
        if analyzed_texts == 0 {
            info!("No analyzable texts among {} entries", texts.len());
            return AnalysisResult::empty(texts.len());
        }

        let result = AnalysisResult {
            keywords: aggregate(&per_text_keywords, self.config.top_keywords),
            cooccurrences: self.cooccurrence.build(&sequences),
            average_sentiment: sentiment_sum / analyzed_texts as f64,
            total_texts: texts.len(),
            analyzed_texts,
            analysis_method: if enhanced {
                AnalysisMethod::Improved
            } else {
                AnalysisMethod::Simple
            },
        };

        info!(
            "Analyzed {}/{} texts ({}) in {}ms",
            analyzed_texts,
            texts.len(),
            result.analysis_method.as_str(),
            start.elapsed().as_millis()
        );
        result
    }
}
