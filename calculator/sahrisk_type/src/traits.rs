// Validation contract shared by the calculator's domain types

/// Simple validation trait used by domain types
pub trait Validatable {
    /// Returns the first violated domain constraint, if any.
    fn validate(&self) -> Result<(), ValidationError> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every violated domain constraint, in field order.
    fn violations(&self) -> Vec<ValidationError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        actual: f64,
    },
    NotFinite {
        field: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending field, as used by the input form.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. } | ValidationError::NotFinite { field } => {
                field
            }
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "Field '{field}' value {actual} is out of allowed range [{min}, {max}]."
            ),
            ValidationError::NotFinite { field } => {
                write!(f, "Field '{field}' must be a finite number.")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
