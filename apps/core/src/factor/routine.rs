//! Factor routines.
//!
//! `MaximumLikelihoodFactorAnalysis` fits the linear Gaussian latent model
//! `x = W^T z + e` with diagonal noise by iterating a truncated SVD of the
//! noise-whitened data until the log-likelihood stops improving. The SVD is
//! exact, so a fit is fully deterministic.

use crate::error::AppError;
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;
use tracing::{debug, warn};

/// Floor for noise variances and their square roots
const SMALL: f64 = 1e-12;

/// Sweep cap for each SVD; nalgebra treats 0 as unbounded
const SVD_MAX_ITER: usize = 10_000;

/// Fitted latent model
#[derive(Debug, Clone)]
pub struct FactorModel {
    /// Column means of the training data
    pub mean: DVector<f64>,
    /// k x p
    pub components: DMatrix<f64>,
    /// Per-variable noise variance (psi)
    pub noise_variance: DVector<f64>,
    pub n_iter: usize,
    pub converged: bool,
}

impl FactorModel {
    /// p x k loading matrix
    pub fn loadings(&self) -> DMatrix<f64> {
        self.components.transpose()
    }

    /// Posterior mean of the latent factors for each row of `x` (n x k).
    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>, AppError> {
        let (k, p) = self.components.shape();
        if x.ncols() != p {
            return Err(AppError::Validation(format!(
                "expected {} columns, got {}",
                p,
                x.ncols()
            )));
        }

        let centered = DMatrix::from_fn(x.nrows(), p, |i, j| x[(i, j)] - self.mean[j]);
        let w_psi = DMatrix::from_fn(k, p, |r, j| {
            self.components[(r, j)] / self.noise_variance[j]
        });
        let precision = DMatrix::identity(k, k) + &w_psi * self.components.transpose();
        let latent_cov = precision.try_inverse().ok_or_else(|| {
            AppError::Numerical("latent covariance matrix is singular".to_string())
        })?;

        let scores = centered * w_psi.transpose() * latent_cov;
        if scores.iter().any(|v| !v.is_finite()) {
            return Err(AppError::Numerical(
                "factor scores contain non-finite values".to_string(),
            ));
        }
        Ok(scores)
    }
}

/// Extracts `n_factors` latent factors from an n x p data matrix.
pub trait FactorRoutine: Send + Sync {
    fn fit(&self, x: &DMatrix<f64>, n_factors: usize) -> Result<FactorModel, AppError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct MaximumLikelihoodFactorAnalysis {
    max_iter: usize,
    tol: f64,
}

impl Default for MaximumLikelihoodFactorAnalysis {
    fn default() -> Self {
        Self::new(1000, 1e-2)
    }
}

impl MaximumLikelihoodFactorAnalysis {
    pub fn new(max_iter: usize, tol: f64) -> Self {
        Self { max_iter, tol }
    }
}

/// Top-`k` squared singular values, their right singular vectors (k x p)
/// and the sum of the remaining squared singular values.
fn truncated_svd(m: DMatrix<f64>, k: usize) -> Result<(Vec<f64>, DMatrix<f64>, f64), AppError> {
    let svd = m
        .try_svd(false, true, f64::EPSILON, SVD_MAX_ITER)
        .ok_or_else(|| AppError::Numerical("SVD did not converge".to_string()))?;
    let singular_values = svd.singular_values;
    let v_t = svd
        .v_t
        .ok_or_else(|| AppError::Numerical("SVD returned no right singular vectors".to_string()))?;

    let mut order: Vec<usize> = (0..singular_values.len()).collect();
    order.sort_by(|&a, &b| singular_values[b].total_cmp(&singular_values[a]));

    let squared: Vec<f64> = order.iter().map(|&i| singular_values[i].powi(2)).collect();
    let top = DMatrix::from_fn(k, v_t.ncols(), |r, j| v_t[(order[r], j)]);
    let unexplained = squared[k..].iter().sum();

    Ok((squared[..k].to_vec(), top, unexplained))
}

impl FactorRoutine for MaximumLikelihoodFactorAnalysis {
    fn fit(&self, x: &DMatrix<f64>, n_factors: usize) -> Result<FactorModel, AppError> {
        let (n, p) = x.shape();
        let k = n_factors;
        if k == 0 || k > p {
            return Err(AppError::Validation(format!(
                "cannot extract {} factors from {} variables",
                k, p
            )));
        }
        if n < k {
            return Err(AppError::Validation(format!(
                "at least {} respondents are required for {} factors, got {}",
                k, k, n
            )));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(AppError::Numerical(
                "input matrix contains non-finite values".to_string(),
            ));
        }

        let n_f = n as f64;
        let mean = DVector::from_fn(p, |j, _| x.column(j).sum() / n_f);
        let centered = DMatrix::from_fn(n, p, |i, j| x[(i, j)] - mean[j]);
        let variance = DVector::from_fn(p, |j, _| centered.column(j).norm_squared() / n_f);

        let n_sqrt = n_f.sqrt();
        let ll_const = p as f64 * (2.0 * PI).ln() + k as f64;

        let mut psi = DVector::<f64>::from_element(p, 1.0);
        let mut components = DMatrix::<f64>::zeros(k, p);
        let mut old_ll = f64::NEG_INFINITY;
        let mut n_iter = 0;
        let mut converged = false;

        for iteration in 0..self.max_iter {
            n_iter = iteration + 1;

            let sqrt_psi = psi.map(|v| v.sqrt() + SMALL);
            let whitened =
                DMatrix::from_fn(n, p, |i, j| centered[(i, j)] / (sqrt_psi[j] * n_sqrt));
            let (s, v_t, unexplained) = truncated_svd(whitened, k)?;

            components = DMatrix::from_fn(k, p, |r, j| {
                (s[r] - 1.0).max(0.0).sqrt() * v_t[(r, j)] * sqrt_psi[j]
            });

            let ll = -n_f / 2.0
                * (ll_const
                    + s.iter().map(|v| v.ln()).sum::<f64>()
                    + unexplained
                    + psi.iter().map(|v| v.ln()).sum::<f64>());

            if ll - old_ll < self.tol {
                converged = true;
                break;
            }
            old_ll = ll;

            psi = DVector::from_fn(p, |j, _| {
                (variance[j] - components.column(j).norm_squared()).max(SMALL)
            });
        }

        if converged {
            debug!("Factor analysis converged after {} iterations", n_iter);
        } else {
            warn!(
                "Factor analysis did not converge in {} iterations, using last estimate",
                self.max_iter
            );
        }

        if components.iter().chain(psi.iter()).any(|v| !v.is_finite()) {
            return Err(AppError::Numerical(
                "factor loadings contain non-finite values".to_string(),
            ));
        }

        Ok(FactorModel {
            mean,
            components,
            noise_variance: psi,
            n_iter,
            converged,
        })
    }

    fn name(&self) -> &'static str {
        "maximum_likelihood"
    }
}
