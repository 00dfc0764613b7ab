//! Subcommand handlers and JSON rendering.
//!
//! Handlers return `anyhow::Result`; `render` turns either outcome into the
//! single document written to stdout and the process status.

use crate::capabilities::{run_capability_checks, CapabilityReport};
use crate::config::{FactorConfig, TextAnalysisConfig};
use crate::error::AppError;
use crate::factor::{FactorExtractor, FactorResult};
use crate::nlp::{AnalysisEngines, AnalysisResult, SurveyTextAnalyzer};
use crate::payload::{parse_document, FactorPayload, TextPayload};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, error};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Output document and exit status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub body: String,
    pub status: u8,
}

#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
}

/// Resolve the input document from the positional argument or `--input`.
///
/// `--input -` reads standard input.
pub fn read_input(data: Option<&str>, input: Option<&Path>) -> Result<String> {
    match (data, input) {
        (_, Some(path)) if path.as_os_str() == "-" => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(AppError::from)
                .context("failed to read standard input")?;
            Ok(buffer)
        }
        (_, Some(path)) => fs::read_to_string(path)
            .map_err(AppError::from)
            .with_context(|| format!("failed to read {}", path.display())),
        (Some(data), None) => Ok(data.to_string()),
        (None, None) => Err(AppError::Input("No input data".to_string()).into()),
    }
}

pub fn run_text(
    raw: &str,
    engines: &AnalysisEngines,
    config: &TextAnalysisConfig,
) -> Result<AnalysisResult> {
    let payload: TextPayload = parse_document(raw)?;
    debug!("Text payload with {} entries", payload.free_texts.len());
    let analyzer = SurveyTextAnalyzer::new(engines, config.clone());
    Ok(analyzer.analyze(&payload.free_texts))
}

pub fn run_factor(raw: &str, config: &FactorConfig) -> Result<FactorResult> {
    let payload: FactorPayload = parse_document(raw)?;
    debug!("Factor payload with {} respondents", payload.sd_scores.len());
    let result = FactorExtractor::new(config.clone()).extract(&payload.sd_scores)?;
    Ok(result)
}

pub fn run_capabilities(engines: &AnalysisEngines, factor: &FactorConfig) -> CapabilityReport {
    run_capability_checks(engines, factor)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// `{"error": message}` with a failing status
pub fn render_error(message: &str, pretty: bool) -> Rendered {
    error!("{}", message);
    let body = to_json(&ErrorResponse { error: message }, pretty)
        .unwrap_or_else(|_| r#"{"error":"failed to serialize error"}"#.to_string());
    Rendered {
        body,
        status: EXIT_FAILURE,
    }
}

pub fn render<T: Serialize>(outcome: Result<T>, pretty: bool) -> Rendered {
    match outcome {
        Ok(value) => match to_json(&value, pretty) {
            Ok(body) => Rendered {
                body,
                status: EXIT_OK,
            },
            Err(e) => render_error(&format!("failed to serialize result: {}", e), pretty),
        },
        Err(e) => render_error(&format!("{:#}", e), pretty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_input_positional() {
        assert_eq!(read_input(Some("{}"), None).unwrap(), "{}");
    }

    #[test]
    fn test_read_input_missing() {
        let err = read_input(None, None).unwrap_err();
        assert_eq!(format!("{:#}", err), "No input data");
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"free_texts": ["静か"]}}"#).unwrap();

        let raw = read_input(None, Some(file.path())).unwrap();
        assert!(raw.contains("静か"));
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");

        let err = read_input(None, Some(&missing)).unwrap_err();
        assert!(format!("{:#}", err).starts_with("failed to read"));
    }

    #[test]
    fn test_render_success_and_error() {
        let ok = render(Ok(serde_json::json!({"a": 1})), false);
        assert_eq!(ok, Rendered { body: r#"{"a":1}"#.to_string(), status: EXIT_OK });

        let failed = render::<serde_json::Value>(
            Err(AppError::Input("No input data".to_string()).into()),
            false,
        );
        assert_eq!(failed.status, EXIT_FAILURE);
        assert_eq!(failed.body, r#"{"error":"No input data"}"#);
    }

    #[test]
    fn test_render_keeps_non_ascii() {
        let rendered = render(Ok(serde_json::json!({"word": "静か"})), false);
        assert!(rendered.body.contains("静か"));
    }
}
