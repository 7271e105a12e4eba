use log::info;
use sahrisk_model::{evaluate, published_models, ModelConfigurationError, RiskModel, RiskResult};
use sahrisk_type::PatientRecord;
use sahrisk_validate::{validate_form, FormInput, InvalidInputError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssessError {
    /// The submission must be corrected by the user.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    /// The fixed model definitions are defective.
    #[error("internal error: {0}")]
    ModelConfiguration(#[from] ModelConfigurationError),
}

impl AssessError {
    pub fn is_user_error(&self) -> bool {
        matches!(self, AssessError::InvalidInput(_))
    }
}

/// A validated patient and one result per model, in model order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub patient: PatientRecord,
    pub results: Vec<RiskResult>,
}

impl Assessment {
    /// True when the severe-subgroup models apply (WFNS 4-5).
    pub fn severe_subgroup(&self) -> bool {
        self.patient.is_severe()
    }

    pub fn applicable(&self) -> impl Iterator<Item = &RiskResult> {
        self.results.iter().filter(|r| r.applicable)
    }

    pub fn result(&self, model_id: &str) -> Option<&RiskResult> {
        self.results.iter().find(|r| r.model_id == model_id)
    }
}

/// Validates `form` and evaluates the published models.
pub fn assess(form: &FormInput) -> Result<Assessment, AssessError> {
    assess_with(form, published_models())
}

pub fn assess_with(form: &FormInput, models: &[RiskModel]) -> Result<Assessment, AssessError> {
    let patient = validate_form(form)?;
    let results = evaluate(&patient, models)?;
    info!(
        "assessed patient with WFNS grade {}: {} of {} model(s) applicable",
        patient.wfns_grade(),
        results.iter().filter(|r| r.applicable).count(),
        results.len()
    );
    Ok(Assessment { patient, results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sahrisk_model::{Applicability, Term};

    fn form(wfns: i64) -> FormInput {
        FormInput::new()
            .with("age", 60)
            .with("sex", "female")
            .with("wfns", wfns)
            .with("mfisher", 2)
            .with("crp", 10.0)
            .with("ld", false)
            .with("clipping", false)
            .with("early_seizure", false)
            .with("eeg_abnormal", false)
            .with("hcp", false)
            .with("ich", false)
    }

    #[test]
    fn grade_three_gets_two_applicable_models() {
        let assessment = assess(&form(3)).unwrap();
        assert!(!assessment.severe_subgroup());
        assert_eq!(assessment.results.len(), 4);
        assert_eq!(assessment.applicable().count(), 2);
        assert!(!assessment.result("early_severe").unwrap().applicable);
    }

    #[test]
    fn invalid_grade_yields_no_results() {
        let err = assess(&form(7)).unwrap_err();
        assert!(err.is_user_error());
    }

    #[test]
    fn defective_models_are_internal_errors() {
        const BROKEN: RiskModel = RiskModel {
            id: "broken",
            name: "Broken",
            applicability: Applicability::AllPatients,
            intercept: 0.0,
            intercept_published: true,
            terms: &[Term::new("hunt_hess", 1.0)],
            auc: None,
        };
        let err = assess_with(&form(2), &[BROKEN]).unwrap_err();
        assert!(!err.is_user_error());
        assert!(err.to_string().starts_with("internal error"));
    }
}
