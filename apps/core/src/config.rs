//! Runtime configuration.
//!
//! Values come from environment variables; a `.env` file is loaded first by
//! `main`. The `--baseline` flag does not touch this configuration, it only
//! swaps the engines `main` resolves from it.

use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

pub const ENV_LOG_FORMAT: &str = "SURVEY_ANALYSIS_LOG_FORMAT";
pub const ENV_LOG_LEVEL: &str = "SURVEY_ANALYSIS_LOG_LEVEL";
pub const ENV_ENABLE_TOKENIZER: &str = "SURVEY_ANALYSIS_ENABLE_TOKENIZER";
pub const ENV_ENABLE_CLASSIFIER: &str = "SURVEY_ANALYSIS_ENABLE_CLASSIFIER";
pub const ENV_MODELS_DIR: &str = "SURVEY_ANALYSIS_MODELS_DIR";
pub const ENV_TOP_KEYWORDS: &str = "SURVEY_ANALYSIS_TOP_KEYWORDS";
pub const ENV_KEYWORDS_PER_TEXT: &str = "SURVEY_ANALYSIS_KEYWORDS_PER_TEXT";
pub const ENV_TOP_PAIRS: &str = "SURVEY_ANALYSIS_TOP_PAIRS";
pub const ENV_WINDOW: &str = "SURVEY_ANALYSIS_WINDOW";
pub const ENV_FACTORS: &str = "SURVEY_ANALYSIS_FACTORS";
pub const ENV_SCORE_ROWS: &str = "SURVEY_ANALYSIS_SCORE_ROWS";

/// Output format of the stderr log stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable `fmt` layer
    Pretty,
    /// Bunyan-style JSON lines
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Default filter directive used when `RUST_LOG` is not set
    pub level: String,
}

/// Which enhanced components to try at startup
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub enable_tokenizer: bool,
    pub enable_classifier: bool,
    /// Cache directory for the embedding model files
    pub models_dir: PathBuf,
}

impl EngineConfig {
    /// Configuration with every enhanced component switched off.
    pub fn baseline() -> Self {
        Self {
            enable_tokenizer: false,
            enable_classifier: false,
            models_dir: PortablePathManager::models_dir(),
        }
    }
}

/// Bounds of the free-text pipeline
#[derive(Debug, Clone, Validate)]
pub struct TextAnalysisConfig {
    /// Aggregate keyword ranking bound
    #[validate(range(min = 1))]
    pub top_keywords: usize,
    /// Per-text keyword candidates fed into the aggregate
    #[validate(range(min = 1))]
    pub keywords_per_text: usize,
    /// Co-occurrence ranking bound
    #[validate(range(min = 1))]
    pub top_pairs: usize,
    /// Forward co-occurrence window, in token positions
    #[validate(range(min = 1))]
    pub window: usize,
}

impl Default for TextAnalysisConfig {
    fn default() -> Self {
        Self {
            top_keywords: 20,
            keywords_per_text: 10,
            top_pairs: 20,
            window: 2,
        }
    }
}

/// Parameters of the factor extraction
#[derive(Debug, Clone, Validate)]
pub struct FactorConfig {
    /// Number of latent factors (k)
    #[validate(range(min = 1, max = 8))]
    pub n_factors: usize,
    /// Number of factor-score rows exported
    pub score_rows: usize,
    /// Iteration cap of the maximum-likelihood fit
    #[validate(range(min = 1))]
    pub max_iter: usize,
    /// Log-likelihood improvement below which the fit stops
    #[validate(range(min = 0.0))]
    pub tol: f64,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            n_factors: 3,
            score_rows: 10,
            max_iter: 1000,
            tol: 1e-2,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub engines: EngineConfig,
    #[validate(nested)]
    pub text: TextAnalysisConfig,
    #[validate(nested)]
    pub factor: FactorConfig,
}

impl AppConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text_defaults = TextAnalysisConfig::default();
        let factor_defaults = FactorConfig::default();

        let config = Self {
            logging: LoggingConfig {
                format: parse_or(&lookup, ENV_LOG_FORMAT, LogFormat::Pretty)?,
                level: lookup(ENV_LOG_LEVEL)
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| "warn".to_string()),
            },
            engines: EngineConfig {
                enable_tokenizer: parse_flag(&lookup, ENV_ENABLE_TOKENIZER, true)?,
                enable_classifier: parse_flag(&lookup, ENV_ENABLE_CLASSIFIER, false)?,
                models_dir: lookup(ENV_MODELS_DIR)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(PortablePathManager::models_dir),
            },
            text: TextAnalysisConfig {
                top_keywords: parse_or(&lookup, ENV_TOP_KEYWORDS, text_defaults.top_keywords)?,
                keywords_per_text: parse_or(
                    &lookup,
                    ENV_KEYWORDS_PER_TEXT,
                    text_defaults.keywords_per_text,
                )?,
                top_pairs: parse_or(&lookup, ENV_TOP_PAIRS, text_defaults.top_pairs)?,
                window: parse_or(&lookup, ENV_WINDOW, text_defaults.window)?,
            },
            factor: FactorConfig {
                n_factors: parse_or(&lookup, ENV_FACTORS, factor_defaults.n_factors)?,
                score_rows: parse_or(&lookup, ENV_SCORE_ROWS, factor_defaults.score_rows)?,
                ..factor_defaults
            },
        };

        config
            .validate()
            .map_err(|e| AppError::Config(format!("{}", e)))?;
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::Config(format!("{}='{}': {}", key, raw, e))),
        _ => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(AppError::Config(format!(
                "{}='{}': expected a boolean",
                key, other
            ))),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.level, "warn");
        assert!(config.engines.enable_tokenizer);
        assert!(!config.engines.enable_classifier);
        assert_eq!(config.text.top_keywords, 20);
        assert_eq!(config.text.keywords_per_text, 10);
        assert_eq!(config.text.top_pairs, 20);
        assert_eq!(config.text.window, 2);
        assert_eq!(config.factor.n_factors, 3);
        assert_eq!(config.factor.score_rows, 10);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_LOG_FORMAT, "json"),
            (ENV_ENABLE_CLASSIFIER, "yes"),
            (ENV_ENABLE_TOKENIZER, "off"),
            (ENV_TOP_KEYWORDS, "5"),
            (ENV_MODELS_DIR, "/tmp/models"),
        ]))
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.engines.enable_classifier);
        assert!(!config.engines.enable_tokenizer);
        assert_eq!(config.text.top_keywords, 5);
        assert_eq!(config.engines.models_dir, PathBuf::from("/tmp/models"));
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[(ENV_WINDOW, "two")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_out_of_range_is_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[(ENV_FACTORS, "9")]));
        assert!(matches!(result, Err(AppError::Config(_))));

        let result = AppConfig::from_lookup(lookup_from(&[(ENV_TOP_PAIRS, "0")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_flag_is_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[(ENV_ENABLE_TOKENIZER, "maybe")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_process_environment() {
        temp_env::with_vars(
            [
                (ENV_SCORE_ROWS, Some("4")),
                (ENV_LOG_LEVEL, Some("debug")),
                (ENV_FACTORS, None),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert_eq!(config.factor.score_rows, 4);
                assert_eq!(config.factor.n_factors, 3);
                assert_eq!(config.logging.level, "debug");
            },
        );
    }
}
