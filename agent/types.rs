//! Core data model: survey answer labels, the preprocessed survey table, and
//! the error taxonomy shared by the simulator and the predictors.

use thiserror::Error;

/// One answer to a binary decision question.
///
/// The survey codes risk-taking answers as `a` and risk-averse answers as `b`.
/// Keeping this as an enum (rather than the raw strings) makes the "strictly
/// binary" invariant unrepresentable to violate past ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    /// The risk-taking answer (survey code `a`).
    RiskTaking,
    /// The risk-averse answer (survey code `b`).
    RiskAverse,
}

impl Label {
    /// The survey's single-letter code for this label.
    pub fn code(self) -> char {
        match self {
            Label::RiskTaking => 'a',
            Label::RiskAverse => 'b',
        }
    }

    /// The digit used when a respondent's answers are encoded as a choice
    /// path: `a` → `'0'`, `b` → `'1'` (the same coding the regression model
    /// uses for its indicators).
    pub fn path_digit(self) -> char {
        match self {
            Label::RiskTaking => '0',
            Label::RiskAverse => '1',
        }
    }
}

/// One decision column: its survey name and one label per respondent.
#[derive(Clone, Debug)]
pub struct DecisionColumn {
    pub name: String,
    pub labels: Vec<Label>,
}

/// A preprocessed survey table: one self-reported risk score per respondent
/// plus an ordered set of decision columns, all the same length.
#[derive(Clone, Debug)]
pub struct SurveyData {
    pub scores: Vec<i64>,
    pub decisions: Vec<DecisionColumn>,
}

impl SurveyData {
    pub fn num_rows(&self) -> usize {
        self.scores.len()
    }

    /// Number of decision points (the `k` in the 2^k path space).
    pub fn num_decision_points(&self) -> usize {
        self.decisions.len()
    }

    /// Checks the table invariants: at least one row, and every decision
    /// column exactly as long as the score column.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.scores.is_empty() {
            return Err(ModelError::EmptyTable);
        }
        for column in &self.decisions {
            if column.labels.len() != self.scores.len() {
                return Err(ModelError::LengthMismatch {
                    column: column.name.clone(),
                    labels: column.labels.len(),
                    scores: self.scores.len(),
                });
            }
        }
        Ok(())
    }

    /// Encodes one respondent's answers as a choice path, in column order.
    pub fn path_for_row(&self, row: usize) -> String {
        self.decisions
            .iter()
            .map(|column| column.labels[row].path_digit())
            .collect()
    }

    /// A new table containing only the given rows, in the given order.
    /// Used by the comparison driver for train/test splits.
    pub fn subset(&self, rows: &[usize]) -> SurveyData {
        SurveyData {
            scores: rows.iter().map(|&r| self.scores[r]).collect(),
            decisions: self
                .decisions
                .iter()
                .map(|column| DecisionColumn {
                    name: column.name.clone(),
                    labels: rows.iter().map(|&r| column.labels[r]).collect(),
                })
                .collect(),
        }
    }
}

/// Failures raised by training and prediction.
///
/// Sparse buckets are deliberately absent here: a queried path with no
/// simulated agents is a normal outcome (`Prediction::NoData`), not an error.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("training table has no rows")]
    EmptyTable,
    #[error(
        "decision column '{column}' has {labels} labels but the score column has {scores} rows"
    )]
    LengthMismatch {
        column: String,
        labels: usize,
        scores: usize,
    },
    #[error(
        "query path '{path}' has {found} digits but the model was trained on {expected} decision points"
    )]
    PathLength {
        path: String,
        found: usize,
        expected: usize,
    },
    #[error("query path '{path}' contains '{digit}'; only '0' and '1' are allowed")]
    PathDigit { path: String, digit: char },
    #[error(
        "the regression design is singular (a decision column may be constant across all rows)"
    )]
    SingularDesign,
}
