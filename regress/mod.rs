//! The competing linear model: ordinary least squares of the self-reported
//! score on the k decision indicators plus an intercept.
//!
//! The normal equations are solved directly with partial-pivot Gaussian
//! elimination; the system is (k+1)×(k+1) with k ≤ 9 in the survey
//! configuration, so a dense in-crate solve beats linking a LAPACK backend.

use ndarray::{Array1, Array2};

use crate::predict::validate_path;
use crate::types::{Label, ModelError, SurveyData};

/// A fitted least-squares predictor. Coefficient 0 is the intercept; the
/// remaining k coefficients follow training column order, one per decision
/// indicator (`a` → 0, `b` → 1).
#[derive(Clone, Debug)]
pub struct LinearPredictor {
    coefficients: Array1<f64>,
    num_decision_points: usize,
}

impl LinearPredictor {
    /// Fits the model on a preprocessed survey table.
    ///
    /// A constant decision column makes the normal equations singular; that
    /// is reported as [`ModelError::SingularDesign`] rather than produced as
    /// a NaN fit.
    pub fn fit(data: &SurveyData) -> Result<Self, ModelError> {
        data.validate()?;

        let n = data.num_rows();
        let k = data.num_decision_points();
        let mut design = Array2::<f64>::ones((n, k + 1));
        for (j, column) in data.decisions.iter().enumerate() {
            for (i, &label) in column.labels.iter().enumerate() {
                design[[i, j + 1]] = indicator(label);
            }
        }
        let response = Array1::from_iter(data.scores.iter().map(|&s| s as f64));

        let gram = design.t().dot(&design);
        let moment = design.t().dot(&response);
        let coefficients = solve(gram, moment)?;

        Ok(LinearPredictor {
            coefficients,
            num_decision_points: k,
        })
    }

    /// Predicts the score for one choice path: intercept + Σ digit·coefficient.
    pub fn predict(&self, path: &str) -> Result<f64, ModelError> {
        validate_path(path, self.num_decision_points)?;
        let mut score = self.coefficients[0];
        for (j, digit) in path.chars().enumerate() {
            if digit == '1' {
                score += self.coefficients[j + 1];
            }
        }
        Ok(score)
    }

    pub fn num_decision_points(&self) -> usize {
        self.num_decision_points
    }

    /// Fitted coefficients, intercept first.
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }
}

fn indicator(label: Label) -> f64 {
    match label {
        Label::RiskTaking => 0.0,
        Label::RiskAverse => 1.0,
    }
}

/// Solves `a · x = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>, ModelError> {
    let n = b.len();
    debug_assert_eq!(a.shape(), &[n, n]);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&r, &s| a[[r, col]].abs().total_cmp(&a[[s, col]].abs()))
            .expect("column range is nonempty");
        if a[[pivot_row, col]].abs() < 1e-12 {
            return Err(ModelError::SingularDesign);
        }
        if pivot_row != col {
            for j in 0..n {
                a.swap([col, j], [pivot_row, j]);
            }
            b.swap(col, pivot_row);
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                a[[row, j]] -= factor * a[[col, j]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let mut acc = b[row];
        for j in (row + 1)..n {
            acc -= a[[row, j]] * x[j];
        }
        x[row] = acc / a[[row, row]];
    }
    Ok(x)
}
