use std::fmt;

use sahrisk_type::ValidationError;
use thiserror::Error;

/// What is wrong with a single form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldProblem {
    Missing,
    WrongType {
        expected: &'static str,
        found: String,
    },
    OutOfRange {
        min: f64,
        max: f64,
        actual: f64,
    },
    NotFinite,
    UnknownCategory {
        value: String,
        allowed: &'static [&'static str],
    },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => f.write_str("value is required"),
            FieldProblem::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            FieldProblem::OutOfRange { min, max, actual } => {
                write!(f, "value {actual} is out of allowed range [{min}, {max}]")
            }
            FieldProblem::NotFinite => f.write_str("value must be a finite number"),
            FieldProblem::UnknownCategory { value, allowed } => {
                write!(f, "'{value}' is not one of {}", allowed.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {problem}")]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        let field = err.field();
        let problem = match err {
            ValidationError::OutOfRange {
                min, max, actual, ..
            } => FieldProblem::OutOfRange { min, max, actual },
            ValidationError::NotFinite { .. } => FieldProblem::NotFinite,
        };
        FieldError { field, problem }
    }
}

/// The submitted form cannot be turned into a patient record.
///
/// Lists every offending field in form order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid patient input: {}", join(.errors))]
pub struct InvalidInputError {
    errors: Vec<FieldError>,
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl InvalidInputError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Names of the offending fields.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }

    pub fn problem_for(&self, field: &str) -> Option<&FieldProblem> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.problem)
    }
}

impl From<ValidationError> for InvalidInputError {
    fn from(err: ValidationError) -> Self {
        Self::new(vec![err.into()])
    }
}
