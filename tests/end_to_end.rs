//! End-to-end scenarios: CSV ingestion through training, prediction, and the
//! predictor comparison.

use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;
use tempfile::NamedTempFile;

use riskpath::compare::{ComparisonConfig, run_comparison};
use riskpath::preprocess::{SurveySchema, load_survey};
use riskpath::regress::LinearPredictor;
use riskpath::simulate::{PredictionModel, RISK_SCORE_MAX, RISK_SCORE_MIN};
use riskpath::types::{DecisionColumn, Label, ModelError, SurveyData};

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{content}").unwrap();
    file.flush().unwrap();
    file
}

/// 100 respondents, one decision column: `a` always scores 40, `b` always 15.
fn separable_survey(a_rows: usize) -> SurveyData {
    let total = 100;
    let mut scores = Vec::with_capacity(total);
    let mut labels = Vec::with_capacity(total);
    for i in 0..total {
        if i < a_rows {
            scores.push(40);
            labels.push(Label::RiskTaking);
        } else {
            scores.push(15);
            labels.push(Label::RiskAverse);
        }
    }
    SurveyData {
        scores,
        decisions: vec![DecisionColumn {
            name: "q1".into(),
            labels,
        }],
    }
}

#[test]
fn known_group_means_produce_the_expected_statistics() {
    let data = separable_survey(60);
    let mut rng = StdRng::seed_from_u64(1);
    let model = PredictionModel::train(&data, 64, &mut rng).unwrap();

    let stats = &model.decision_stats()[0];
    assert_abs_diff_eq!(stats.risk_sensitivity, 40.0 / 15.0, epsilon = 1e-12);
    assert_abs_diff_eq!(stats.base_rate, 60.0 / 100.0, epsilon = 1e-12);
    assert_eq!(stats.dominant, Label::RiskTaking);
}

#[test]
fn a_seeded_simulation_is_reproducible_bit_for_bit() {
    // Two decision columns, 1000 agents, identical seeds.
    let mut scores = Vec::new();
    let mut q1 = Vec::new();
    let mut q2 = Vec::new();
    for i in 0..80i64 {
        scores.push(RISK_SCORE_MIN + i % (RISK_SCORE_MAX - RISK_SCORE_MIN + 1));
        q1.push(if i % 2 == 0 { Label::RiskTaking } else { Label::RiskAverse });
        q2.push(if i % 3 == 0 { Label::RiskAverse } else { Label::RiskTaking });
    }
    let data = SurveyData {
        scores,
        decisions: vec![
            DecisionColumn { name: "q1".into(), labels: q1 },
            DecisionColumn { name: "q2".into(), labels: q2 },
        ],
    };

    let first = PredictionModel::train(&data, 1000, &mut StdRng::seed_from_u64(404)).unwrap();
    let second = PredictionModel::train(&data, 1000, &mut StdRng::seed_from_u64(404)).unwrap();

    assert_eq!(first.table(), second.table());
    let total: usize = first.table().values().map(Vec::len).sum();
    assert_eq!(total, 1000);
}

#[test]
fn a_wrong_length_query_is_rejected_without_partial_work() {
    let data = separable_survey(50);
    let mut rng = StdRng::seed_from_u64(2);
    let model = PredictionModel::train(&data, 32, &mut rng).unwrap();
    assert_eq!(model.num_decision_points(), 1);

    match model.predict("010") {
        Err(ModelError::PathLength { found, expected, .. }) => {
            assert_eq!(found, 3);
            assert_eq!(expected, 1);
        }
        other => panic!("expected PathLength, got {other:?}"),
    }
}

#[test]
fn csv_to_predictions_round_trip() {
    let mut rows = vec!["score,q1,q2".to_string()];
    for i in 0..60 {
        let (q1, score_bump) = if i % 2 == 0 { ("No", 12) } else { ("Yes", 0) };
        let q2 = if i % 3 == 0 { "Sneak" } else { "Outside" };
        rows.push(format!("{},{},{}", 15 + score_bump + i % 5, q1, q2));
    }
    let file = write_csv(&rows.join("\n"));

    let schema = SurveySchema {
        score_column: "score".to_string(),
        decision_columns: vec!["q1".to_string(), "q2".to_string()],
        ..SurveySchema::default()
    };
    let data = load_survey(file.path(), &schema).unwrap();
    assert_eq!(data.num_rows(), 60);
    assert_eq!(data.num_decision_points(), 2);

    let mut rng = StdRng::seed_from_u64(8);
    let agent_model = PredictionModel::train(&data, 512, &mut rng).unwrap();
    let linear_model = LinearPredictor::fit(&data).unwrap();

    for path in ["00", "01", "10", "11"] {
        if let Some(estimate) = agent_model.predict(path).unwrap().score() {
            assert!(estimate >= RISK_SCORE_MIN as f64 && estimate <= RISK_SCORE_MAX as f64);
        }
        assert!(linear_model.predict(path).unwrap().is_finite());
    }
}

#[test]
fn the_comparison_driver_reports_both_predictors() {
    let mut rows = vec!["score,q1,q2,q3".to_string()];
    let mut rng = StdRng::seed_from_u64(33);
    for _ in 0..150 {
        use rand::Rng;
        let score = rng.gen_range(RISK_SCORE_MIN..=RISK_SCORE_MAX);
        let answer = |rng: &mut StdRng| if rng.gen::<bool>() { "a" } else { "b" };
        rows.push(format!(
            "{score},{},{},{}",
            answer(&mut rng),
            answer(&mut rng),
            answer(&mut rng)
        ));
    }
    let file = write_csv(&rows.join("\n"));

    let schema = SurveySchema {
        score_column: "score".to_string(),
        decision_columns: vec!["q1".to_string(), "q2".to_string(), "q3".to_string()],
        ..SurveySchema::default()
    };
    let data = load_survey(file.path(), &schema).unwrap();

    let config = ComparisonConfig {
        rounds: 4,
        train_fraction: 0.8,
        agent_count: 256,
    };
    let report = run_comparison(&data, &config, &mut StdRng::seed_from_u64(77)).unwrap();

    let test_rows_per_round = 150 - 120;
    assert_eq!(report.linear_evaluated, config.rounds * test_rows_per_round);
    assert_eq!(
        report.agent_evaluated + report.agent_skipped,
        config.rounds * test_rows_per_round
    );
    assert!(report.linear_rmse.unwrap().is_finite());

    let rendered = report.to_string();
    assert!(rendered.contains("agent simulation"));
    assert!(rendered.contains("linear regression"));
}
