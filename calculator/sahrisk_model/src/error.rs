use thiserror::Error;

/// A model definition does not fit the patient record schema.
///
/// Always a defect in the fixed model definitions, never a user input
/// problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelConfigurationError {
    #[error("model '{model}' references unknown covariate '{covariate}'")]
    UnknownCovariate {
        model: &'static str,
        covariate: &'static str,
    },
    #[error("model '{model}' has a non-finite coefficient for '{covariate}'")]
    NonFiniteWeight {
        model: &'static str,
        covariate: &'static str,
    },
    #[error("model '{model}' has invalid scaling for '{covariate}' (center {center}, scale {scale})")]
    InvalidScaling {
        model: &'static str,
        covariate: &'static str,
        center: f64,
        scale: f64,
    },
    #[error("model '{model}' has a non-finite intercept")]
    NonFiniteIntercept { model: &'static str },
}

impl ModelConfigurationError {
    pub fn model(&self) -> &'static str {
        match self {
            ModelConfigurationError::UnknownCovariate { model, .. }
            | ModelConfigurationError::NonFiniteWeight { model, .. }
            | ModelConfigurationError::InvalidScaling { model, .. }
            | ModelConfigurationError::NonFiniteIntercept { model } => model,
        }
    }
}
