//! Factor Extractor - Standardize, fit, and label SD ratings.

use nalgebra::DMatrix;
use std::time::Instant;
use tracing::{debug, info};

use super::result::{Factor, FactorResult, ScaleLoading};
use super::routine::{FactorRoutine, MaximumLikelihoodFactorAnalysis};
use super::scales::SdScale;
use super::standardize::{rows_to_matrix, StandardScaler};
use crate::config::FactorConfig;
use crate::error::AppError;

/// Flip each factor (row of `components`) so its largest-magnitude loading is positive.
fn normalize_signs(components: &mut DMatrix<f64>) {
    for mut row in components.row_iter_mut() {
        let dominant = row
            .iter()
            .copied()
            .fold(0.0_f64, |best, v| if v.abs() > best.abs() { v } else { best });
        if dominant < 0.0 {
            row.neg_mut();
        }
    }
}

/// Population variance of each column
fn column_variances(m: &DMatrix<f64>) -> Vec<f64> {
    let n = m.nrows().max(1) as f64;
    m.column_iter()
        .map(|column| {
            let mean = column.sum() / n;
            column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
        })
        .collect()
}

fn rows_of(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

pub struct FactorExtractor {
    routine: Box<dyn FactorRoutine>,
    config: FactorConfig,
}

impl FactorExtractor {
    pub fn new(config: FactorConfig) -> Self {
        let routine = MaximumLikelihoodFactorAnalysis::new(config.max_iter, config.tol);
        Self::with_routine(config, Box::new(routine))
    }

    pub fn with_routine(config: FactorConfig, routine: Box<dyn FactorRoutine>) -> Self {
        Self { routine, config }
    }

    /// Extract the configured number of factors from respondent rows.
    ///
    /// An empty input yields an empty result. Every other failure is an error.
    pub fn extract(&self, sd_scores: &[Vec<f64>]) -> Result<FactorResult, AppError> {
        if sd_scores.is_empty() {
            info!("No SD ratings supplied, returning empty factor result");
            return Ok(FactorResult::empty());
        }

        let start = Instant::now();
        let k = self.config.n_factors;
        let x = rows_to_matrix(sd_scores)?;
        if x.nrows() < k {
            return Err(AppError::Validation(format!(
                "at least {} respondents are required for {} factors, got {}",
                k,
                k,
                x.nrows()
            )));
        }

        let standardized = StandardScaler::fit_transform(&x)?;
        let mut model = self.routine.fit(&standardized, k)?;
        debug!(
            "{} fit: {} iterations, converged={}",
            self.routine.name(),
            model.n_iter,
            model.converged
        );

        normalize_signs(&mut model.components);
        let scores = model.transform(&standardized)?;
        let loadings = model.loadings();

        let factors = (0..k)
            .map(|f| Factor {
                name: format!("Factor {}", f + 1),
                loadings: SdScale::ALL
                    .iter()
                    .enumerate()
                    .map(|(j, scale)| ScaleLoading {
                        scale: *scale,
                        label: scale.label(),
                        loading: loadings[(j, f)],
                    })
                    .collect(),
            })
            .collect();

        let mut factor_scores = rows_of(&scores);
        factor_scores.truncate(self.config.score_rows);

        info!(
            "Extracted {} factors from {} respondents in {}ms",
            k,
            x.nrows(),
            start.elapsed().as_millis()
        );

        Ok(FactorResult {
            factors,
            loadings: rows_of(&loadings),
            explained_variance: column_variances(&scores),
            factor_scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_signs() {
        let mut components = DMatrix::from_row_slice(2, 3, &[0.2, -0.9, 0.1, 0.5, -0.1, 0.3]);
        normalize_signs(&mut components);
        assert_eq!(components.row(0).iter().copied().collect::<Vec<_>>(), vec![-0.2, 0.9, -0.1]);
        assert_eq!(components.row(1).iter().copied().collect::<Vec<_>>(), vec![0.5, -0.1, 0.3]);
    }

    #[test]
    fn test_column_variances() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 5.0, 3.0, 5.0]);
        assert_eq!(column_variances(&m), vec![1.0, 0.0]);
    }

    #[test]
    fn test_empty_input() {
        let extractor = FactorExtractor::new(FactorConfig::default());
        assert_eq!(extractor.extract(&[]).unwrap(), FactorResult::empty());
    }

    #[test]
    fn test_too_few_respondents() {
        let extractor = FactorExtractor::new(FactorConfig::default());
        let rows = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 1.0]; 2];
        assert!(matches!(
            extractor.extract(&rows),
            Err(AppError::Validation(_))
        ));
    }
}
