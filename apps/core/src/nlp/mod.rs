//! # NLP Module
//!
//! Free-text analysis of survey answers.
//!
//! ## Components
//! - `tokenizer`: Morphological tokenizer (lindera) with punctuation-split fallback
//! - `sentiment`: Lexicon sentiment scorer
//! - `classifier`: Embedding sentiment model (fastembed) with lexicon fallback
//! - `engines`: Chains resolved once per process
//! - `keywords`: Per-text and corpus keyword ranking
//! - `cooccurrence`: Windowed token pair counting
//! - `result`: Output data structure
//! - `analyzer`: Main orchestrator

pub mod analyzer;
pub mod classifier;
pub mod cooccurrence;
pub mod counter;
pub mod engines;
pub mod keywords;
pub mod result;
pub mod sentiment;
pub mod tokenizer;

pub use analyzer::SurveyTextAnalyzer;
pub use engines::{AnalysisEngines, Availability};
pub use result::AnalysisResult;
