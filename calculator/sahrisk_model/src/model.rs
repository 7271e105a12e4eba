//! Logistic regression model definitions and their evaluation.

use log::debug;
use sahrisk_type::{covariates, PatientRecord};
use serde::{Deserialize, Serialize};

use crate::error::ModelConfigurationError;
use crate::stats::logistic;

/// Which patients a model applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    AllPatients,
    /// WFNS grade 4 or 5.
    SevereWfns,
}

impl Applicability {
    pub fn applies_to(&self, record: &PatientRecord) -> bool {
        match self {
            Applicability::AllPatients => true,
            Applicability::SevereWfns => record.is_severe(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Applicability::AllPatients => "all patients",
            Applicability::SevereWfns => "WFNS grade 4-5",
        }
    }

    /// Why a patient falls outside this group, if anyone can.
    pub fn exclusion_reason(&self) -> Option<&'static str> {
        match self {
            Applicability::AllPatients => None,
            Applicability::SevereWfns => Some("WFNS grade below 4"),
        }
    }
}

/// One covariate's contribution: `weight * (x - center) / scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Term {
    pub covariate: &'static str,
    pub weight: f64,
    pub center: f64,
    pub scale: f64,
}

impl Term {
    pub const fn new(covariate: &'static str, weight: f64) -> Self {
        Self::scaled(covariate, weight, 0.0, 1.0)
    }

    /// A term on a centered and rescaled covariate, e.g. age in decades
    /// above 50 is `Term::scaled("age", w, 50.0, 10.0)`.
    pub const fn scaled(covariate: &'static str, weight: f64, center: f64, scale: f64) -> Self {
        Self {
            covariate,
            weight,
            center,
            scale,
        }
    }
}

/// A fixed, named logistic regression specification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskModel {
    pub id: &'static str,
    pub name: &'static str,
    pub applicability: Applicability,
    pub intercept: f64,
    /// False when `intercept` is a placeholder rather than a fitted value.
    /// Probabilities from such a model are not calibrated risks.
    pub intercept_published: bool,
    pub terms: &'static [Term],
    /// Reported area under the ROC curve, when published.
    pub auc: Option<f64>,
}

/// Outcome of evaluating one model for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskResult {
    pub model_id: &'static str,
    pub model_name: &'static str,
    pub applicability: Applicability,
    pub applicable: bool,
    pub linear_predictor: Option<f64>,
    pub probability: Option<f64>,
    /// Whether `probability` comes from a fitted intercept.
    pub calibrated: bool,
    pub auc: Option<f64>,
}

impl RiskResult {
    fn for_model(
        model: &RiskModel,
        linear_predictor: Option<f64>,
        probability: Option<f64>,
    ) -> Self {
        Self {
            model_id: model.id,
            model_name: model.name,
            applicability: model.applicability,
            applicable: probability.is_some(),
            linear_predictor,
            probability,
            calibrated: model.intercept_published,
            auc: model.auc,
        }
    }

    fn not_applicable(model: &RiskModel) -> Self {
        Self::for_model(model, None, None)
    }
}

impl RiskModel {
    /// Checks the definition against the patient record schema.
    pub fn check(&self) -> Result<(), ModelConfigurationError> {
        if !self.intercept.is_finite() {
            return Err(ModelConfigurationError::NonFiniteIntercept { model: self.id });
        }
        for term in self.terms {
            if !covariates::ALL.contains(&term.covariate) {
                return Err(ModelConfigurationError::UnknownCovariate {
                    model: self.id,
                    covariate: term.covariate,
                });
            }
            if !term.weight.is_finite() {
                return Err(ModelConfigurationError::NonFiniteWeight {
                    model: self.id,
                    covariate: term.covariate,
                });
            }
            if !term.center.is_finite() || !term.scale.is_finite() || term.scale == 0.0 {
                return Err(ModelConfigurationError::InvalidScaling {
                    model: self.id,
                    covariate: term.covariate,
                    center: term.center,
                    scale: term.scale,
                });
            }
        }
        Ok(())
    }

    /// `intercept + sum(weight * (x - center) / scale)` over the model's terms.
    pub fn linear_predictor(&self, record: &PatientRecord) -> Result<f64, ModelConfigurationError> {
        self.terms.iter().try_fold(self.intercept, |z, term| {
            let x = record.covariate(term.covariate).ok_or(
                ModelConfigurationError::UnknownCovariate {
                    model: self.id,
                    covariate: term.covariate,
                },
            )?;
            Ok(z + term.weight * ((x - term.center) / term.scale))
        })
    }

    /// Evaluates the model, or reports it as not applicable to `record`.
    ///
    /// The definition is checked even when the model does not apply, so a
    /// defective gated model cannot go unnoticed.
    pub fn evaluate(&self, record: &PatientRecord) -> Result<RiskResult, ModelConfigurationError> {
        self.check()?;
        if !self.applicability.applies_to(record) {
            debug!("{}: not applicable ({})", self.id, self.applicability.describe());
            return Ok(RiskResult::not_applicable(self));
        }
        let z = self.linear_predictor(record)?;
        let p = logistic(z);
        debug_assert!((0.0..=1.0).contains(&p), "{}: probability {p} for z={z}", self.id);
        debug!("{}: z={z:.4} p={p:.4}", self.id);
        Ok(RiskResult::for_model(self, Some(z), Some(p)))
    }
}
