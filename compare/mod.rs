//! The comparison driver: repeatedly retrains both predictors on random
//! train/test splits of the survey and pools their prediction errors.
//!
//! Test rows whose choice path never occurred in the agent simulation (the
//! sparse-bucket condition) are excluded from the agent model's error and
//! counted separately, so a small population does not masquerade as accuracy.

use std::fmt;

use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::predict::Prediction;
use crate::regress::LinearPredictor;
use crate::simulate::{DEFAULT_AGENT_COUNT, PredictionModel};
use crate::types::{ModelError, SurveyData};

/// Knobs for one comparison run.
#[derive(Clone, Copy, Debug)]
pub struct ComparisonConfig {
    /// Number of independent train/test splits.
    pub rounds: usize,
    /// Fraction of rows assigned to the training split, in (0,1).
    pub train_fraction: f64,
    /// Agent population size per retraining.
    pub agent_count: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            rounds: 20,
            train_fraction: 0.8,
            agent_count: DEFAULT_AGENT_COUNT,
        }
    }
}

/// Pooled accuracy of both predictors across every round.
#[derive(Clone, Copy, Debug)]
pub struct ComparisonReport {
    pub rounds: usize,
    /// Root-mean-square error of the agent model over the test rows it could
    /// answer.
    pub agent_rmse: Option<f64>,
    /// Test rows the agent model answered.
    pub agent_evaluated: usize,
    /// Test rows skipped because the path's bucket was empty.
    pub agent_skipped: usize,
    /// Root-mean-square error of the linear model (it answers every row).
    pub linear_rmse: Option<f64>,
    pub linear_evaluated: usize,
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Predictor comparison over {} rounds", self.rounds)?;
        match self.agent_rmse {
            Some(rmse) => writeln!(
                f,
                "  agent simulation: RMSE {rmse:.3} on {} rows ({} skipped, no simulated path)",
                self.agent_evaluated, self.agent_skipped
            )?,
            None => writeln!(
                f,
                "  agent simulation: no test row matched a simulated path ({} skipped)",
                self.agent_skipped
            )?,
        }
        match self.linear_rmse {
            Some(rmse) => write!(
                f,
                "  linear regression: RMSE {rmse:.3} on {} rows",
                self.linear_evaluated
            ),
            None => write!(f, "  linear regression: no rows evaluated"),
        }
    }
}

/// Runs the full comparison: shuffle, split, retrain both models, query each
/// test row's observed path, pool squared errors across rounds.
pub fn run_comparison<R: Rng>(
    data: &SurveyData,
    config: &ComparisonConfig,
    rng: &mut R,
) -> Result<ComparisonReport, ModelError> {
    data.validate()?;

    let n = data.num_rows();
    let train_len = ((n as f64 * config.train_fraction).round() as usize)
        .max(1)
        .min(n.saturating_sub(1));
    info!(
        "comparing predictors: {n} rows, {} train / {} test per round, {} rounds",
        train_len,
        n - train_len,
        config.rounds
    );

    let mut agent_squares = Vec::new();
    let mut linear_squares = Vec::new();
    let mut agent_skipped = 0usize;

    let mut indices: Vec<usize> = (0..n).collect();
    for round in 0..config.rounds {
        indices.shuffle(rng);
        let (train_rows, test_rows) = indices.split_at(train_len);
        let train = data.subset(train_rows);

        let agent_model = PredictionModel::train(&train, config.agent_count, rng)?;
        let linear_model = LinearPredictor::fit(&train)?;

        let mut round_skipped = 0usize;
        for &row in test_rows {
            let path = data.path_for_row(row);
            let truth = data.scores[row] as f64;

            match agent_model.predict(&path)? {
                Prediction::Score(estimate) => {
                    agent_squares.push((estimate - truth).powi(2));
                }
                Prediction::NoData => round_skipped += 1,
            }
            let estimate = linear_model.predict(&path)?;
            linear_squares.push((estimate - truth).powi(2));
        }
        agent_skipped += round_skipped;
        debug!(
            "round {}: {} of {} test rows had no simulated path",
            round + 1,
            round_skipped,
            test_rows.len()
        );
    }

    Ok(ComparisonReport {
        rounds: config.rounds,
        agent_rmse: rmse(&agent_squares),
        agent_evaluated: agent_squares.len(),
        agent_skipped,
        linear_rmse: rmse(&linear_squares),
        linear_evaluated: linear_squares.len(),
    })
}

fn rmse(squares: &[f64]) -> Option<f64> {
    if squares.is_empty() {
        return None;
    }
    Some((squares.iter().sum::<f64>() / squares.len() as f64).sqrt())
}
