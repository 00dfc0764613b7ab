//! Column standardization of the rating matrix.

use super::scales::SCALE_COUNT;
use crate::error::AppError;
use nalgebra::{DMatrix, DVector};

/// Standard deviations below this are treated as a constant column
const ZERO_SCALE_THRESHOLD: f64 = 10.0 * f64::EPSILON;

/// Build an n x 8 matrix from respondent rows, checking shape and finiteness.
pub fn rows_to_matrix(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, AppError> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != SCALE_COUNT {
            return Err(AppError::Validation(format!(
                "row {} has {} ratings, expected {}",
                i,
                row.len(),
                SCALE_COUNT
            )));
        }
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(AppError::Validation(format!(
                "row {} has a non-finite rating at column {}",
                i, j
            )));
        }
    }

    let data: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(rows.len(), SCALE_COUNT, &data))
}

/// Zero mean, unit population variance per column.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: DVector<f64>,
    scale: DVector<f64>,
}

impl StandardScaler {
    /// Fails when a column mean or deviation is not representable as a finite `f64`.
    pub fn fit(x: &DMatrix<f64>) -> Result<Self, AppError> {
        let n = x.nrows().max(1) as f64;
        let mut mean = DVector::zeros(x.ncols());
        let mut scale = DVector::zeros(x.ncols());

        for (j, column) in x.column_iter().enumerate() {
            let m = column.sum() / n;
            let variance = column.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            if !m.is_finite() || !std.is_finite() {
                return Err(AppError::Numerical(format!(
                    "column {} overflows during standardization",
                    j
                )));
            }
            mean[j] = m;
            // a constant column maps to zeros instead of dividing by zero
            scale[j] = if std < ZERO_SCALE_THRESHOLD { 1.0 } else { std };
        }

        Ok(Self { mean, scale })
    }

    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>, AppError> {
        let z = DMatrix::from_fn(x.nrows(), x.ncols(), |i, j| {
            (x[(i, j)] - self.mean[j]) / self.scale[j]
        });
        if z.iter().any(|v| !v.is_finite()) {
            return Err(AppError::Numerical(
                "standardized ratings contain non-finite values".to_string(),
            ));
        }
        Ok(z)
    }

    pub fn fit_transform(x: &DMatrix<f64>) -> Result<DMatrix<f64>, AppError> {
        Self::fit(x)?.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_to_matrix_layout() {
        let rows = vec![vec![1.0; 8], (0..8).map(|v| v as f64).collect()];
        let x = rows_to_matrix(&rows).unwrap();
        assert_eq!(x.shape(), (2, 8));
        assert_eq!(x[(1, 7)], 7.0);
        assert_eq!(x[(0, 3)], 1.0);
    }

    #[test]
    fn test_rows_to_matrix_rejects_wrong_length() {
        let rows = vec![vec![1.0; 8], vec![1.0; 7]];
        let err = rows_to_matrix(&rows).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_rows_to_matrix_rejects_non_finite() {
        let mut row = vec![3.0; 8];
        row[2] = f64::NAN;
        assert!(matches!(
            rows_to_matrix(&[row]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_standardized_columns() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0]);
        let z = StandardScaler::fit_transform(&x).unwrap();

        for column in z.column_iter() {
            let mean = column.sum() / 4.0;
            let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 4.0;
            assert!(mean.abs() < 1e-12);
            assert!((variance - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column_becomes_zeros() {
        let x = DMatrix::from_row_slice(3, 2, &[5.0, 1.0, 5.0, 2.0, 5.0, 3.0]);
        let z = StandardScaler::fit_transform(&x).unwrap();
        assert!(z.column(0).iter().all(|v| *v == 0.0));
        assert!(z.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_overflowing_column_is_numerical_error() {
        let rows: Vec<Vec<f64>> = (0..6)
            .map(|i| {
                let big = if i % 2 == 0 { 1e308 } else { 1.5e308 };
                vec![big, big, 1.0, 2.0, 3.0, 4.0, 5.0, i as f64]
            })
            .collect();
        let x = rows_to_matrix(&rows).unwrap();
        assert!(matches!(
            StandardScaler::fit_transform(&x),
            Err(AppError::Numerical(_))
        ));
    }

    #[test]
    fn test_transform_overflow_is_numerical_error() {
        let fitted = DMatrix::from_row_slice(2, 1, &[-0.1, 0.1]);
        let scaler = StandardScaler::fit(&fitted).unwrap();
        let wide = DMatrix::from_row_slice(1, 1, &[f64::MAX]);
        assert!(matches!(
            scaler.transform(&wide),
            Err(AppError::Numerical(_))
        ));
    }
}
