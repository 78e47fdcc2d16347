//! The population simulator: trains a `PredictionModel` by walking a
//! synthetic population of agents through every decision point and bucketing
//! each agent's sampled risk tolerance under the path it produced.

use ahash::AHashMap;
use log::debug;
use rand::Rng;

use crate::paths::enumerate_paths;
use crate::stats::{DecisionStats, decision_stats};
use crate::types::{ModelError, SurveyData};

/// Lower bound of the survey's risk-score scale; agent tolerances are sampled
/// from `RISK_SCORE_MIN..=RISK_SCORE_MAX` inclusive.
pub const RISK_SCORE_MIN: i64 = 10;
/// Upper bound of the survey's risk-score scale (inclusive).
pub const RISK_SCORE_MAX: i64 = 47;
/// Population size used when the caller does not choose one.
pub const DEFAULT_AGENT_COUNT: usize = 512;

/// A trained agent model: the per-decision statistics, the neutral state, and
/// the prediction table mapping every possible path to the risk tolerances of
/// the simulated agents that took it.
///
/// The table is built once by [`PredictionModel::train`] and never mutated
/// afterward; retraining builds a fresh model from scratch.
#[derive(Clone, Debug)]
pub struct PredictionModel {
    pub(crate) neutral_state: f64,
    pub(crate) decision_stats: Vec<DecisionStats>,
    pub(crate) table: AHashMap<String, Vec<i64>>,
    pub(crate) num_decision_points: usize,
}

impl PredictionModel {
    /// Trains a model on a preprocessed survey table by simulating
    /// `agent_count` independent agents.
    ///
    /// Randomness is drawn only from `rng`, so a seeded generator reproduces
    /// the prediction table bit for bit.
    pub fn train<R: Rng>(
        data: &SurveyData,
        agent_count: usize,
        rng: &mut R,
    ) -> Result<Self, ModelError> {
        data.validate()?;

        let neutral_state = median(&data.scores);
        let decision_stats: Vec<DecisionStats> = data
            .decisions
            .iter()
            .map(|column| decision_stats(&data.scores, &column.labels))
            .collect();

        let k = data.num_decision_points();
        let mut table: AHashMap<String, Vec<i64>> = enumerate_paths(k)
            .into_iter()
            .map(|path| (path, Vec::new()))
            .collect();

        for _ in 0..agent_count {
            let tolerance = rng.gen_range(RISK_SCORE_MIN..=RISK_SCORE_MAX);
            let mut path = String::with_capacity(k);

            for stats in &decision_stats {
                // The reference model: an unclamped probability. Agents far
                // from the neutral state can be forced onto one branch.
                let agent_risk_factor = tolerance as f64 - neutral_state;
                let decision_risk_factor = stats.risk_sensitivity - 1.0;
                let probability_1 = stats.base_rate + agent_risk_factor * decision_risk_factor;
                path.push(if probability_1 < rng.gen::<f64>() { '1' } else { '0' });
            }

            table
                .get_mut(&path)
                .expect("every length-k path is seeded in the table")
                .push(tolerance);
        }

        debug!(
            "trained agent model: {} decision points (dominant labels [{}]), {} agents, {} non-empty of {} buckets",
            k,
            decision_stats.iter().map(|s| s.dominant.code()).collect::<String>(),
            agent_count,
            table.values().filter(|bucket| !bucket.is_empty()).count(),
            table.len(),
        );

        Ok(PredictionModel {
            neutral_state,
            decision_stats,
            table,
            num_decision_points: k,
        })
    }

    /// Median training score shared by every simulated decision.
    pub fn neutral_state(&self) -> f64 {
        self.neutral_state
    }

    /// Per-column statistics, in training column order.
    pub fn decision_stats(&self) -> &[DecisionStats] {
        &self.decision_stats
    }

    pub fn num_decision_points(&self) -> usize {
        self.num_decision_points
    }

    /// Read-only view of the prediction table.
    pub fn table(&self) -> &AHashMap<String, Vec<i64>> {
        &self.table
    }
}

/// Median of a nonempty integer slice; even lengths average the middle pair.
fn median(values: &[i64]) -> f64 {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}
