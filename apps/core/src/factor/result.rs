//! Output structure of the factor extraction.

use super::scales::SdScale;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleLoading {
    pub scale: SdScale,
    pub label: &'static str,
    pub loading: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factor {
    /// "Factor 1" .. "Factor k"
    pub name: String,
    /// One entry per scale, in scale order
    pub loadings: Vec<ScaleLoading>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorResult {
    pub factors: Vec<Factor>,
    /// Scales x factors
    pub loadings: Vec<Vec<f64>>,
    /// Variance of each factor's scores
    pub explained_variance: Vec<f64>,
    /// Leading rows of the respondent x factor score matrix
    pub factor_scores: Vec<Vec<f64>>,
}

impl FactorResult {
    pub fn empty() -> Self {
        Self {
            factors: Vec::new(),
            loadings: Vec::new(),
            explained_variance: Vec::new(),
            factor_scores: Vec::new(),
        }
    }
}
