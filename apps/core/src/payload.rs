//! Input documents accepted by the two analyses.

use crate::error::AppError;
use crate::factor::scales::SCALE_COUNT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// `{"free_texts": [string | null, ...]}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TextPayload {
    /// `null` entries count as empty answers.
    #[serde(default)]
    pub free_texts: Vec<Option<String>>,
}

/// `{"sd_scores": [[number x 8], ...]}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FactorPayload {
    #[serde(default)]
    #[validate(custom(function = "validate_sd_rows"))]
    pub sd_scores: Vec<Vec<f64>>,
}

#[allow(clippy::ptr_arg)]
fn validate_sd_rows(rows: &Vec<Vec<f64>>) -> Result<(), ValidationError> {
    if let Some((index, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != SCALE_COUNT)
    {
        let mut err = ValidationError::new("sd_row_length");
        err.message = Some(Cow::from(format!(
            "row {} has {} ratings, expected {}",
            index,
            row.len(),
            SCALE_COUNT
        )));
        return Err(err);
    }
    Ok(())
}

/// Parse and validate one input document.
///
/// The document must be a JSON object; missing keys default to empty lists.
pub fn parse_document<T>(raw: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    if raw.trim().is_empty() {
        return Err(AppError::Input("No input data".to_string()));
    }

    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(AppError::Validation(
            "expected a JSON object at the top level".to_string(),
        ));
    }

    let payload: T = serde_json::from_value(value)?;
    payload.validate()?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_payload_with_nulls() {
        let payload: TextPayload =
            parse_document(r#"{"free_texts": ["静かで快適", null, ""]}"#).unwrap();
        assert_eq!(payload.free_texts.len(), 3);
        assert_eq!(payload.free_texts[1], None);
    }

    #[test]
    fn test_missing_key_defaults_to_empty() {
        let payload: TextPayload = parse_document("{}").unwrap();
        assert!(payload.free_texts.is_empty());

        let payload: FactorPayload = parse_document(r#"{"other": 1}"#).unwrap();
        assert!(payload.sd_scores.is_empty());
    }

    #[test]
    fn test_malformed_json_is_input_error() {
        let result: Result<TextPayload, _> = parse_document("not json at all");
        assert!(matches!(result, Err(AppError::Input(_))));
    }

    #[test]
    fn test_empty_document_is_input_error() {
        let result: Result<TextPayload, _> = parse_document("   ");
        match result {
            Err(AppError::Input(msg)) => assert_eq!(msg, "No input data"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_non_object_is_rejected() {
        let result: Result<TextPayload, _> = parse_document(r#"[["a"]]"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let result: Result<TextPayload, _> = parse_document(r#"{"free_texts": [1, 2]}"#);
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result: Result<FactorPayload, _> = parse_document(r#"{"sd_scores": [["x"]]}"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_short_sd_row_is_rejected() {
        let result: Result<FactorPayload, _> =
            parse_document(r#"{"sd_scores": [[1,2,3,4,5,6,7,8],[1,2,3]]}"#);
        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("row 1 has 3 ratings")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
