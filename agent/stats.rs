//! Per-decision-point statistics derived from the training table.

use crate::types::Label;

/// The statistics driving one simulated decision.
///
/// `dominant` records which label had the larger group mean. Nothing in the
/// simulation consumes it today; it is kept as an inspectable diagnostic for
/// explainability reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionStats {
    /// Share of respondents who chose the dominant label, in (0,1) when both
    /// labels occur in the training data.
    pub base_rate: f64,
    /// Ratio of the larger group-mean score to the smaller one; ≥ 1 by
    /// construction.
    pub risk_sensitivity: f64,
    /// The label whose group had the larger mean score.
    pub dominant: Label,
}

/// Mean score and respondent count for one label's partition. A label that
/// never occurs falls back to mean = 1 and count = 1: a degenerate but defined
/// policy that keeps the ratio and the rate computable instead of failing on
/// a lopsided training split.
fn group_summary(scores: &[i64], labels: &[Label], which: Label) -> (f64, f64) {
    let mut sum = 0i64;
    let mut count = 0usize;
    for (&score, &label) in scores.iter().zip(labels) {
        if label == which {
            sum += score;
            count += 1;
        }
    }
    if count == 0 {
        (1.0, 1.0)
    } else {
        (sum as f64 / count as f64, count as f64)
    }
}

/// Computes the base rate, risk sensitivity, and dominant label for one
/// decision column. Callers validate the table first; the slices are the
/// score column and one decision column of equal, nonzero length.
pub fn decision_stats(scores: &[i64], labels: &[Label]) -> DecisionStats {
    debug_assert_eq!(scores.len(), labels.len());
    let (mean_a, count_a) = group_summary(scores, labels, Label::RiskTaking);
    let (mean_b, count_b) = group_summary(scores, labels, Label::RiskAverse);

    let (dominant, dominant_count) = if mean_a > mean_b {
        (Label::RiskTaking, count_a)
    } else {
        (Label::RiskAverse, count_b)
    };

    DecisionStats {
        base_rate: dominant_count / (count_a + count_b),
        risk_sensitivity: mean_a.max(mean_b) / mean_a.min(mean_b),
        dominant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn separated_groups_yield_the_expected_ratio() {
        // 60 risk-takers at score 40, 40 risk-averse at score 15.
        let mut scores = vec![40; 60];
        scores.extend(vec![15; 40]);
        let mut labels = vec![Label::RiskTaking; 60];
        labels.extend(vec![Label::RiskAverse; 40]);

        let stats = decision_stats(&scores, &labels);
        assert_abs_diff_eq!(stats.risk_sensitivity, 40.0 / 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.base_rate, 0.6, epsilon = 1e-12);
        assert_eq!(stats.dominant, Label::RiskTaking);
    }

    #[test]
    fn sensitivity_is_at_least_one_either_way() {
        let scores = vec![15, 15, 40, 40];
        let forward = decision_stats(
            &scores,
            &[Label::RiskTaking, Label::RiskTaking, Label::RiskAverse, Label::RiskAverse],
        );
        let reversed = decision_stats(
            &scores,
            &[Label::RiskAverse, Label::RiskAverse, Label::RiskTaking, Label::RiskTaking],
        );
        assert!(forward.risk_sensitivity >= 1.0);
        assert!(reversed.risk_sensitivity >= 1.0);
        assert_eq!(forward.dominant, Label::RiskAverse);
        assert_eq!(reversed.dominant, Label::RiskTaking);
    }

    #[test]
    fn base_rate_is_a_proper_fraction_when_both_labels_occur() {
        let scores = vec![12, 30, 44, 21, 38];
        let labels = vec![
            Label::RiskTaking,
            Label::RiskAverse,
            Label::RiskTaking,
            Label::RiskAverse,
            Label::RiskAverse,
        ];
        let stats = decision_stats(&scores, &labels);
        assert!(stats.base_rate > 0.0 && stats.base_rate < 1.0);
    }

    #[test]
    fn absent_label_uses_the_unit_fallback() {
        // Every respondent answered `b`; the `a` partition falls back to
        // mean = 1, count = 1.
        let scores = vec![20, 25, 30];
        let labels = vec![Label::RiskAverse; 3];
        let stats = decision_stats(&scores, &labels);

        assert_abs_diff_eq!(stats.risk_sensitivity, 25.0 / 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.base_rate, 3.0 / 4.0, epsilon = 1e-12);
        assert_eq!(stats.dominant, Label::RiskAverse);
    }
}
