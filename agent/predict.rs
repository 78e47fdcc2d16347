//! Point queries against a trained prediction table.

use crate::simulate::PredictionModel;
use crate::types::ModelError;

/// The outcome of one path query.
///
/// `NoData` is the sparse-bucket condition: the queried path is a valid key
/// but no simulated agent ever took it. Downstream aggregation filters these
/// rows out; they are not errors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prediction {
    /// Mean risk tolerance of the agents whose walk matched the query path.
    Score(f64),
    /// The path's bucket is empty.
    NoData,
}

impl Prediction {
    /// The predicted score, if the bucket had any agents.
    pub fn score(self) -> Option<f64> {
        match self {
            Prediction::Score(score) => Some(score),
            Prediction::NoData => None,
        }
    }
}

/// Rejects queries whose length or alphabet does not match the trained model
/// before any lookup happens.
pub fn validate_path(path: &str, expected: usize) -> Result<(), ModelError> {
    if path.len() != expected {
        return Err(ModelError::PathLength {
            path: path.to_string(),
            found: path.len(),
            expected,
        });
    }
    if let Some(digit) = path.chars().find(|c| *c != '0' && *c != '1') {
        return Err(ModelError::PathDigit {
            path: path.to_string(),
            digit,
        });
    }
    Ok(())
}

impl PredictionModel {
    /// Predicts the risk tolerance for one observed choice path: the
    /// arithmetic mean of the matching bucket.
    pub fn predict(&self, path: &str) -> Result<Prediction, ModelError> {
        validate_path(path, self.num_decision_points)?;
        let bucket = self
            .table
            .get(path)
            .expect("validated paths are always table keys");
        if bucket.is_empty() {
            return Ok(Prediction::NoData);
        }
        let sum: i64 = bucket.iter().sum();
        Ok(Prediction::Score(sum as f64 / bucket.len() as f64))
    }

    /// Batch form of [`predict`](Self::predict); fails on the first malformed
    /// query, before any partial results are produced.
    pub fn predict_all<S: AsRef<str>>(&self, queries: &[S]) -> Result<Vec<Prediction>, ModelError> {
        for query in queries {
            validate_path(query.as_ref(), self.num_decision_points)?;
        }
        queries
            .iter()
            .map(|query| self.predict(query.as_ref()))
            .collect()
    }
}
