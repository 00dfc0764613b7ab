//! Process-wide analysis engines.
//!
//! Both chains are resolved once at startup and then only borrowed. A
//! component that fails to come up stays absent for the rest of the process.

use super::classifier::SentimentChain;
use super::tokenizer::TokenizerChain;
use crate::config::EngineConfig;
use serde::Serialize;
use tracing::info;

/// Resolution state of an enhanced component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum Availability {
    /// Loaded and serving calls
    Ready,
    /// Switched off by configuration or `--baseline`
    Disabled,
    /// The cargo feature providing it was not compiled in
    NotCompiled,
    /// Initialization was attempted and failed
    Failed(String),
}

impl Availability {
    pub fn is_ready(&self) -> bool {
        matches!(self, Availability::Ready)
    }
}

pub struct AnalysisEngines {
    pub tokenizer: TokenizerChain,
    pub sentiment: SentimentChain,
}

impl AnalysisEngines {
    /// Bring up the enhanced components the configuration asks for.
    pub fn resolve(config: &EngineConfig) -> Self {
        let tokenizer = TokenizerChain::resolve(config.enable_tokenizer);
        let sentiment = SentimentChain::resolve(config.enable_classifier, &config.models_dir);
        info!(
            "Engines resolved: tokenizer={:?}, sentiment={:?}",
            tokenizer.availability(),
            sentiment.availability()
        );
        Self {
            tokenizer,
            sentiment,
        }
    }

    /// Punctuation split and lexicon scoring only.
    pub fn baseline() -> Self {
        Self::resolve(&EngineConfig::baseline())
    }
}
