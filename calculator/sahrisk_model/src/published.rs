// The four published aSAH seizure models.
//
// Coefficients are the ones shipped by the original seizure calculator,
// which shows the raw weighted sum and carries no intercept. Each linear
// predictor starts at a placeholder zero (`intercept_published: false`), so
// the logistic probabilities rank patients but are not calibrated risks.

use sahrisk_type::covariates::{
    CLIPPING, CRP, EARLY_SEIZURE, EEG_ABNORMAL, HYDROCEPHALUS, ICH, LUMBAR_DRAIN,
    MODIFIED_FISHER, WFNS,
};

use crate::model::{Applicability, RiskModel, Term};

pub const EARLY_GENERAL: RiskModel = RiskModel {
    id: "early_general",
    name: "Early seizure (general)",
    applicability: Applicability::AllPatients,
    intercept: 0.0,
    intercept_published: false,
    terms: &[
        Term::new(WFNS, 0.62),
        Term::new(MODIFIED_FISHER, 0.88),
        Term::new(CRP, 0.07),
        Term::new(LUMBAR_DRAIN, -1.9),
        Term::new(CLIPPING, 1.19),
    ],
    auc: Some(0.87),
};

pub const LATE_GENERAL: RiskModel = RiskModel {
    id: "late_general",
    name: "Late seizure (general)",
    applicability: Applicability::AllPatients,
    intercept: 0.0,
    intercept_published: false,
    terms: &[Term::new(WFNS, 1.75), Term::new(EARLY_SEIZURE, 1.89)],
    auc: Some(0.88),
};

pub const EARLY_SEVERE: RiskModel = RiskModel {
    id: "early_severe",
    name: "Early seizure (WFNS 4-5)",
    applicability: Applicability::SevereWfns,
    intercept: 0.0,
    intercept_published: false,
    terms: &[
        Term::new(WFNS, 1.47),
        Term::new(MODIFIED_FISHER, 1.13),
        Term::new(EEG_ABNORMAL, 1.92),
    ],
    auc: Some(0.81),
};

pub const LATE_SEVERE: RiskModel = RiskModel {
    id: "late_severe",
    name: "Late seizure (WFNS 4-5)",
    applicability: Applicability::SevereWfns,
    intercept: 0.0,
    intercept_published: false,
    terms: &[
        Term::new(WFNS, 2.83),
        Term::new(MODIFIED_FISHER, 1.18),
        Term::new(HYDROCEPHALUS, 2.81),
        Term::new(ICH, 1.63),
        Term::new(EARLY_SEIZURE, 1.48),
    ],
    auc: Some(0.88),
};

/// The published models in reporting order.
pub static PUBLISHED_MODELS: [RiskModel; 4] =
    [EARLY_GENERAL, LATE_GENERAL, EARLY_SEVERE, LATE_SEVERE];

pub fn published_models() -> &'static [RiskModel] {
    &PUBLISHED_MODELS
}

pub fn find_published(id: &str) -> Option<&'static RiskModel> {
    PUBLISHED_MODELS.iter().find(|m| m.id == id)
}
