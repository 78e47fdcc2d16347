//! # Survey Ingestion and Label Normalization
//!
//! The exclusive entry point for raw survey exports. It reads the responses
//! CSV, validates it against the configured schema, normalizes the free-text
//! decision answers into the binary `a`/`b` coding, and hands the statistical
//! core a clean [`SurveyData`].
//!
//! - Configurable schema: column names and the response dictionary live on a
//!   [`SurveySchema`] value, not in process-wide constants, so several survey
//!   layouts can coexist in one process.
//! - User-centric errors: failures are assumed to be input problems and carry
//!   the column name and offending value.

use ahash::AHashMap;
use itertools::Itertools;
use log::{info, warn};
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

use crate::simulate::{RISK_SCORE_MAX, RISK_SCORE_MIN};
use crate::types::{DecisionColumn, Label, SurveyData};

/// The shape of one survey export: where the score lives, which columns are
/// decision points (in order), and how free-text answers map onto the binary
/// labels.
#[derive(Clone, Debug)]
pub struct SurveySchema {
    /// Name of the integer self-reported score column.
    pub score_column: String,
    /// Decision column names, in the order paths are encoded.
    pub decision_columns: Vec<String>,
    /// Free-text answers accepted for each label. The literals `a` and `b`
    /// are included so already-coded exports load unchanged.
    pub responses: Vec<(Label, Vec<String>)>,
    /// Drop decision columns whose answers are identical across all rows.
    /// Off by default: the path layout then always matches the configured
    /// column list.
    pub drop_constant_decisions: bool,
}

impl Default for SurveySchema {
    /// The hypothetical-scenario survey this crate was built around: one
    /// score column and nine binary decision questions.
    fn default() -> Self {
        let risk_taking = [
            "a",
            "No",
            "Speed up",
            "Car",
            "Sprint away as fast as you can",
            "Quiet",
            "Drag",
            "Sneak",
            "Bottle",
            "Plea",
            "Throw",
        ];
        let risk_averse = [
            "b",
            "Yes",
            "Confront him",
            "Woods",
            "Slowly walk away (maybe you’ll lose him)",
            "Run",
            "Cut",
            "Outside",
            "Knife",
            "Fight",
            "Swing",
        ];
        SurveySchema {
            score_column: "financialRisk_score (N)".to_string(),
            decision_columns: (20..=28).map(|i| format!("question{i} (S)")).collect(),
            responses: vec![
                (
                    Label::RiskTaking,
                    risk_taking.iter().map(|s| s.to_string()).collect(),
                ),
                (
                    Label::RiskAverse,
                    risk_averse.iter().map(|s| s.to_string()).collect(),
                ),
            ],
            drop_constant_decisions: false,
        }
    }
}

impl SurveySchema {
    /// Flattens the response dictionary for lookup, rejecting answers mapped
    /// to both labels.
    fn response_map(&self) -> Result<AHashMap<&str, Label>, PreprocessError> {
        if let Some(dup) = self
            .responses
            .iter()
            .flat_map(|(_, answers)| answers.iter())
            .duplicates()
            .next()
        {
            return Err(PreprocessError::AmbiguousResponse {
                value: dup.clone(),
            });
        }
        Ok(self
            .responses
            .iter()
            .flat_map(|(label, answers)| answers.iter().map(move |a| (a.as_str(), *label)))
            .collect())
    }
}

/// Everything that can go wrong between the raw CSV and a valid `SurveyData`.
#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("error from the underlying Polars DataFrame library: {0}")]
    Polars(#[from] PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("the required column '{0}' was not found in the survey file")]
    ColumnNotFound(String),
    #[error(
        "column '{column}' could not be read as {expected}; it contains {found}"
    )]
    ColumnWrongType {
        column: String,
        expected: &'static str,
        found: String,
    },
    #[error("missing or null values were found in column '{0}'")]
    MissingValues(String),
    #[error("column '{column}' contains the answer '{value}', which is not in the response dictionary")]
    UnknownResponse { column: String, value: String },
    #[error("the response dictionary maps '{value}' to more than one label")]
    AmbiguousResponse { value: String },
    #[error("the survey file has no data rows")]
    EmptyTable,
}

/// Reads a survey export and produces the table consumed by both predictors.
pub fn load_survey(path: &Path, schema: &SurveySchema) -> Result<SurveyData, PreprocessError> {
    let response_map = schema.response_map()?;

    let mut df = CsvReader::new(File::open(path)?)
        .with_options(
            CsvReadOptions::default()
                .with_has_header(true)
                .with_parse_options(CsvParseOptions::default().with_separator(b',')),
        )
        .finish()?;

    if df.height() == 0 {
        return Err(PreprocessError::EmptyTable);
    }

    let present: HashSet<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    if !present.contains(&schema.score_column) {
        return Err(PreprocessError::ColumnNotFound(schema.score_column.clone()));
    }
    for name in &schema.decision_columns {
        if !present.contains(name) {
            return Err(PreprocessError::ColumnNotFound(name.clone()));
        }
    }

    // Keep only the configured columns; the raw export carries many more.
    let mut projection: Vec<&str> = Vec::with_capacity(1 + schema.decision_columns.len());
    projection.push(schema.score_column.as_str());
    projection.extend(schema.decision_columns.iter().map(String::as_str));
    df = df.select(projection)?;

    let scores = extract_scores(&df, &schema.score_column)?;
    for &score in &scores {
        if !(RISK_SCORE_MIN..=RISK_SCORE_MAX).contains(&score) {
            warn!(
                "score {score} in '{}' is outside the survey scale [{RISK_SCORE_MIN}, {RISK_SCORE_MAX}]",
                schema.score_column
            );
        }
    }

    let mut decisions = Vec::with_capacity(schema.decision_columns.len());
    for name in &schema.decision_columns {
        let labels = extract_labels(&df, name, &response_map)?;
        if schema.drop_constant_decisions && labels.iter().all(|&l| l == labels[0]) {
            info!("dropping decision column '{name}': every respondent answered the same way");
            continue;
        }
        decisions.push(DecisionColumn {
            name: name.clone(),
            labels,
        });
    }

    Ok(SurveyData { scores, decisions })
}

fn extract_scores(df: &DataFrame, column: &str) -> Result<Vec<i64>, PreprocessError> {
    let series = df.column(column)?;
    if series.null_count() > 0 {
        return Err(PreprocessError::MissingValues(column.to_string()));
    }

    // A float column casts to Int64 by truncation, so 25.7 would slip
    // through as 25. Accept floats only when every value is integral.
    if series.dtype().is_float() {
        let casted = series.cast(&DataType::Float64)?;
        let chunked = casted.f64()?.rechunk();
        let mut scores = Vec::with_capacity(df.height());
        for value in chunked.into_no_null_iter() {
            if value.fract() != 0.0 {
                return Err(PreprocessError::ColumnWrongType {
                    column: column.to_string(),
                    expected: "integer scores",
                    found: format!("the fractional value {value}"),
                });
            }
            scores.push(value as i64);
        }
        return Ok(scores);
    }

    let casted = series.cast(&DataType::Int64).map_err(|_| {
        PreprocessError::ColumnWrongType {
            column: column.to_string(),
            expected: "integer scores",
            found: format!("{:?} data", series.dtype()),
        }
    })?;
    if casted.null_count() > 0 {
        return Err(PreprocessError::ColumnWrongType {
            column: column.to_string(),
            expected: "integer scores",
            found: format!("{:?} data", series.dtype()),
        });
    }

    Ok(casted.i64()?.rechunk().into_no_null_iter().collect())
}

fn extract_labels(
    df: &DataFrame,
    column: &str,
    response_map: &AHashMap<&str, Label>,
) -> Result<Vec<Label>, PreprocessError> {
    let series = df.column(column)?;
    if series.null_count() > 0 {
        return Err(PreprocessError::MissingValues(column.to_string()));
    }

    let casted = series.cast(&DataType::String).map_err(|_| {
        PreprocessError::ColumnWrongType {
            column: column.to_string(),
            expected: "textual answers",
            found: format!("{:?} data", series.dtype()),
        }
    })?;
    let chunked = casted.str()?.rechunk();

    let mut labels = Vec::with_capacity(df.height());
    for answer in chunked.into_no_null_iter() {
        let label = response_map.get(answer.trim()).ok_or_else(|| {
            PreprocessError::UnknownResponse {
                column: column.to_string(),
                value: answer.to_string(),
            }
        })?;
        labels.push(*label);
    }
    Ok(labels)
}
