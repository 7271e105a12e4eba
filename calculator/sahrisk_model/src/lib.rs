//! Seizure risk models for aneurysmal subarachnoid hemorrhage
//!
//! Each [`RiskModel`] is a fixed logistic regression: a linear predictor
//! over named patient covariates mapped through the logistic function.
//! Two of the published models only apply to severe presentations
//! (WFNS grade 4-5); for other patients they report `applicable: false`.

pub mod error;
pub mod evaluate;
pub mod model;
pub mod published;
pub mod stats;

pub use error::ModelConfigurationError;
pub use evaluate::{check_models, evaluate, evaluate_published};
pub use model::{Applicability, RiskModel, RiskResult, Term};
pub use published::{find_published, published_models, PUBLISHED_MODELS};
pub use stats::logistic;
