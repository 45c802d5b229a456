//! Error types for the benchmark scoring domain.
//!
//! Errors are split by the stage that raises them. Trace errors exclude a
//! single (configuration, instance) run, scoring errors fail a single
//! instance, and only source errors abort an analysis.

use crate::identifiers::{ConfigurationId, ProblemId};
use crate::objective::{DirectionInferenceError, ObjectiveDirection};

/// Top-level analysis error type
///
/// This enum encompasses all error types that can occur while analysing a
/// results directory, providing a unified error handling mechanism.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    /// A trace could not be loaded or validated
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// An instance could not be scored
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// The results source as a whole is unreadable
    #[error("Source error: {0}")]
    Source(String),
}

impl AnalysisError {
    /// Get the error code for this error
    ///
    /// Error codes are written to status tables for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Trace(e) => e.error_code(),
            Self::Scoring(e) => e.error_code(),
            Self::Source(_) => "SOURCE_ERROR",
        }
    }

    /// Check if this error stays confined to one run or instance
    ///
    /// Isolated errors are recorded in the report and never abort the rest
    /// of the analysis.
    pub fn is_isolated(&self) -> bool {
        matches!(self, Self::Trace(_) | Self::Scoring(_))
    }
}

/// Errors raised while turning a record source into a trace
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraceError {
    /// The record source does not have the expected columns
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// The records are present but invalid
    #[error("{0}")]
    Corrupt(#[from] CorruptTraceError),

    /// The record source could not be read
    #[error("cannot read {path}: {message}")]
    Source {
        /// Location of the record source
        path: String,
        /// Underlying failure
        message: String,
    },
}

impl TraceError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Corrupt(_) => "CORRUPT_TRACE",
            Self::Source { .. } => "SOURCE_ERROR",
        }
    }
}

/// Schema errors: required columns are missing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// One or more required columns are absent from the header
    #[error("missing required column(s): {}", columns.join(", "))]
    MissingColumns {
        /// Names of the missing columns
        columns: Vec<String>,
    },

    /// A combined results file has rows for a key column that is absent
    #[error("missing key column '{column}' in combined results file")]
    MissingKeyColumn {
        /// Name of the missing key column
        column: String,
    },
}

/// Corrupt trace errors: ordering or value violations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorruptTraceError {
    /// Time did not strictly increase between consecutive solutions
    #[error("time is not strictly increasing at point {index}: {previous} then {current}")]
    NonMonotonicTime {
        /// Index of the offending point
        index: usize,
        /// Time of the preceding point
        previous: f64,
        /// Time of the offending point
        current: f64,
    },

    /// The objective got worse between consecutive solutions
    #[error("objective worsens at point {index} for {direction}: {previous} then {current}")]
    NotImproving {
        /// Index of the offending point
        index: usize,
        /// Direction the trace was checked against
        direction: ObjectiveDirection,
        /// Objective of the preceding point
        previous: f64,
        /// Objective of the offending point
        current: f64,
    },

    /// A solution was reported at a negative time
    #[error("negative time {time} at point {index}")]
    NegativeTime {
        /// Index of the offending point
        index: usize,
        /// The negative time
        time: f64,
    },

    /// A value is NaN or infinite
    #[error("non-finite {column} at point {index}")]
    NonFiniteValue {
        /// Index of the offending point
        index: usize,
        /// Column holding the value
        column: String,
    },

    /// A value could not be parsed as a number
    #[error("cannot parse {column} value '{value}' at row {row}")]
    Unparsable {
        /// 1-based data row number
        row: usize,
        /// Column holding the value
        column: String,
        /// Raw value
        value: String,
    },

    /// A record could not be read at all
    #[error("malformed record at row {row}: {message}")]
    MalformedRecord {
        /// 1-based data row number
        row: usize,
        /// Parser message
        message: String,
    },
}

/// Errors that prevent one instance from being scored
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// A configuration's best value falls outside the global bounds
    #[error("bounds inconsistent for {configuration}: best {best} not in [{lower}, {upper}]")]
    BoundsInconsistent {
        /// Offending configuration
        configuration: ConfigurationId,
        /// Its best objective
        best: f64,
        /// Global lower bound
        lower: f64,
        /// Global upper bound
        upper: f64,
    },

    /// The global upper bound is below the global lower bound
    #[error("inverted bounds: upper {upper} < lower {lower}")]
    InvertedBounds {
        /// Global lower bound
        lower: f64,
        /// Global upper bound
        upper: f64,
    },

    /// The direction of a problem could not be inferred
    #[error("cannot infer direction of problem {problem}: {source}")]
    DirectionInference {
        /// Problem whose direction is unknown
        problem: ProblemId,
        /// Why inference failed
        source: DirectionInferenceError,
    },
}

impl ScoringError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BoundsInconsistent { .. } | Self::InvertedBounds { .. } => "BOUNDS_INCONSISTENT",
            Self::DirectionInference { .. } => "DIRECTION_INFERENCE",
        }
    }
}

/// Analysis-wide result type
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AnalysisError::Trace(TraceError::Schema(SchemaError::MissingColumns {
            columns: vec!["time".to_string()],
        }));
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
        assert!(err.is_isolated());

        let err = AnalysisError::Scoring(ScoringError::InvertedBounds {
            lower: 2.0,
            upper: 1.0,
        });
        assert_eq!(err.error_code(), "BOUNDS_INCONSISTENT");
        assert!(err.is_isolated());

        let err = AnalysisError::Source("results directory missing".to_string());
        assert_eq!(err.error_code(), "SOURCE_ERROR");
        assert!(!err.is_isolated());
    }

    #[test]
    fn test_messages() {
        let err = SchemaError::MissingColumns {
            columns: vec!["time".to_string(), "objective".to_string()],
        };
        assert_eq!(err.to_string(), "missing required column(s): time, objective");

        let err = TraceError::from(CorruptTraceError::NonMonotonicTime {
            index: 1,
            previous: 5.0,
            current: 3.0,
        });
        assert_eq!(err.error_code(), "CORRUPT_TRACE");
        assert!(err.to_string().contains("5 then 3"));
    }
}
