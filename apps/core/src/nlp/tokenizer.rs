//! Tokenization strategies for free-text answers.
//!
//! Uses lindera (IPADIC) for morphological analysis when the `morphology`
//! feature is compiled in and the dictionary loads, falls back to splitting
//! on Japanese punctuation and whitespace otherwise.

use super::engines::Availability;
use crate::error::AppError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

#[cfg(feature = "morphology")]
use lindera::dictionary::{load_embedded_dictionary, DictionaryKind};
#[cfg(feature = "morphology")]
use lindera::mode::Mode;
#[cfg(feature = "morphology")]
use lindera::segmenter::Segmenter;

/// Particles and generic connectives dropped from morphological output
pub const STOPWORDS: &[&str] = &[
    "の", "に", "は", "を", "が", "で", "と", "も", "など", "こと", "ため", "よう",
];

/// Tokens shorter than this (in characters) are discarded by every strategy
pub const MIN_TOKEN_CHARS: usize = 2;

// NOTE: expect() is acceptable here, the pattern is a compile-time constant
static TERMINAL_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[。、！？]").expect("Invalid regex: terminal punctuation"));

/// Which strategy produced a token sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerStrategy {
    Morphological,
    PunctuationSplit,
}

impl TokenizerStrategy {
    pub fn is_enhanced(&self) -> bool {
        matches!(self, TokenizerStrategy::Morphological)
    }
}

/// A text-to-tokens strategy.
///
/// Implementations are shared immutably across calls; `tokenize` must be
/// reentrant if the chain is ever used from several threads.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AppError>;

    fn strategy(&self) -> TokenizerStrategy;
}

fn long_enough(token: &str) -> bool {
    token.chars().count() >= MIN_TOKEN_CHARS
}

/// Drop stopwords and short tokens from analyzer output.
///
/// Only the morphological strategy filters stopwords; the punctuation split
/// keeps them.
#[cfg_attr(not(feature = "morphology"), allow(dead_code))]
pub fn filter_segments<I, S>(segments: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .flat_map(|segment| {
            segment
                .as_ref()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|token| !STOPWORDS.contains(&token.as_str()) && long_enough(token))
        .collect()
}

/// Baseline strategy: punctuation to whitespace, split, drop short tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationTokenizer;

impl PunctuationTokenizer {
    pub fn split(&self, text: &str) -> Vec<String> {
        TERMINAL_PUNCTUATION
            .replace_all(text, " ")
            .split_whitespace()
            .filter(|token| long_enough(token))
            .map(str::to_string)
            .collect()
    }
}

impl Tokenizer for PunctuationTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AppError> {
        Ok(self.split(text))
    }

    fn strategy(&self) -> TokenizerStrategy {
        TokenizerStrategy::PunctuationSplit
    }
}

/// Morphological strategy backed by lindera and the embedded IPADIC dictionary.
///
/// `lindera::tokenizer::Tokenizer::tokenize` takes `&self` and keeps no
/// per-call state, so one instance serves every call.
#[cfg(feature = "morphology")]
pub struct MorphologicalTokenizer {
    tokenizer: lindera::tokenizer::Tokenizer,
}

#[cfg(feature = "morphology")]
impl MorphologicalTokenizer {
    pub fn new() -> Result<Self, AppError> {
        let dictionary = load_embedded_dictionary(DictionaryKind::IPADIC)
            .map_err(|e| AppError::DependencyUnavailable(format!("IPADIC dictionary: {}", e)))?;
        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        let tokenizer = lindera::tokenizer::Tokenizer::new(segmenter);
        Ok(Self { tokenizer })
    }
}

#[cfg(feature = "morphology")]
impl Tokenizer for MorphologicalTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AppError> {
        let tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(|e| AppError::Component(format!("lindera: {}", e)))?;
        Ok(filter_segments(tokens.iter().map(|t| t.surface.to_string())))
    }

    fn strategy(&self) -> TokenizerStrategy {
        TokenizerStrategy::Morphological
    }
}

/// Outcome of one tokenization call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<String>,
    pub strategy: TokenizerStrategy,
}

/// Primary strategy (if any) plus the always-available punctuation split.
pub struct TokenizerChain {
    primary: Option<Box<dyn Tokenizer>>,
    fallback: PunctuationTokenizer,
    availability: Availability,
}

impl TokenizerChain {
    /// Punctuation split only.
    pub fn baseline() -> Self {
        Self::without_primary(Availability::Disabled)
    }

    fn without_primary(availability: Availability) -> Self {
        Self {
            primary: None,
            fallback: PunctuationTokenizer,
            availability,
        }
    }

    /// Use `primary` first, falling back per call.
    pub fn with_primary(primary: Box<dyn Tokenizer>) -> Self {
        Self {
            primary: Some(primary),
            fallback: PunctuationTokenizer,
            availability: Availability::Ready,
        }
    }

    /// Try to bring up the morphological tokenizer once for the process.
    pub fn resolve(enabled: bool) -> Self {
        if !enabled {
            info!("Morphological tokenizer disabled by configuration");
            return Self::baseline();
        }

        match load_morphological() {
            Ok(primary) => {
                info!("Morphological tokenizer ready");
                Self::with_primary(primary)
            }
            Err(availability) => Self::without_primary(availability),
        }
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    /// Tokenize with the primary strategy, or the fallback if it is absent or fails.
    pub fn tokenize(&self, text: &str) -> Tokenized {
        if let Some(primary) = &self.primary {
            match primary.tokenize(text) {
                Ok(tokens) => {
                    return Tokenized {
                        tokens,
                        strategy: primary.strategy(),
                    }
                }
                Err(e) => warn!("Tokenizer failed, using punctuation split for this text: {}", e),
            }
        }

        let tokens = self.fallback.split(text);
        debug!("Punctuation split produced {} tokens", tokens.len());
        Tokenized {
            tokens,
            strategy: TokenizerStrategy::PunctuationSplit,
        }
    }
}

#[cfg(feature = "morphology")]
fn load_morphological() -> Result<Box<dyn Tokenizer>, Availability> {
    match MorphologicalTokenizer::new() {
        Ok(tokenizer) => Ok(Box::new(tokenizer)),
        Err(e) => {
            warn!("Failed to load morphological tokenizer: {}", e);
            Err(Availability::Failed(e.to_string()))
        }
    }
}

#[cfg(not(feature = "morphology"))]
fn load_morphological() -> Result<Box<dyn Tokenizer>, Availability> {
    info!("Morphological tokenizer not compiled in (enable the `morphology` feature)");
    Err(Availability::NotCompiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_split() {
        let tokens = PunctuationTokenizer.split("静かな音。とても快適！また聞きたい？");
        assert_eq!(tokens, vec!["静かな音", "とても快適", "また聞きたい"]);
    }

    #[test]
    fn test_punctuation_split_drops_single_characters() {
        let tokens = PunctuationTokenizer.split("a quiet 音 room、b");
        assert_eq!(tokens, vec!["quiet", "room"]);
    }

    #[test]
    fn test_punctuation_split_keeps_stopwords() {
        let tokens = PunctuationTokenizer.split("こと ため quiet");
        assert_eq!(tokens, vec!["こと", "ため", "quiet"]);
    }

    #[test]
    fn test_filter_segments_removes_stopwords_and_short_tokens() {
        let tokens = filter_segments(["エンジン", "の", "音", "が", "静か", "こと", "など", " "]);
        assert_eq!(tokens, vec!["エンジン", "静か"]);
    }

    #[test]
    fn test_blank_text_yields_no_tokens() {
        assert!(PunctuationTokenizer.split("   ").is_empty());
        assert!(PunctuationTokenizer.split("。、！？").is_empty());
    }

    #[test]
    fn test_baseline_chain_uses_punctuation_split() {
        let chain = TokenizerChain::baseline();
        let result = chain.tokenize("quiet comfortable room");
        assert_eq!(result.strategy, TokenizerStrategy::PunctuationSplit);
        assert_eq!(result.tokens, vec!["quiet", "comfortable", "room"]);
        assert_eq!(chain.availability(), &Availability::Disabled);
    }

    #[test]
    fn test_disabled_resolution_is_baseline() {
        let chain = TokenizerChain::resolve(false);
        assert_eq!(chain.availability(), &Availability::Disabled);
        assert_eq!(
            chain.tokenize("静か 快適").strategy,
            TokenizerStrategy::PunctuationSplit
        );
    }

    #[cfg(not(feature = "morphology"))]
    #[test]
    fn test_resolution_without_feature_reports_not_compiled() {
        let chain = TokenizerChain::resolve(true);
        assert_eq!(chain.availability(), &Availability::NotCompiled);
    }

    #[cfg(feature = "morphology")]
    #[test]
    fn test_morphological_tokenizer_segments_japanese() {
        let tokenizer = MorphologicalTokenizer::new().unwrap();
        let tokens = tokenizer.tokenize("エンジンの音が静かで快適です").unwrap();
        assert!(!tokens.is_empty());
        assert!(tokens.iter().all(|t| t.chars().count() >= MIN_TOKEN_CHARS));
        assert!(!tokens.iter().any(|t| STOPWORDS.contains(&t.as_str())));
    }
}
