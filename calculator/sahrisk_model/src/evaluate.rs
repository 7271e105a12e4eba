use log::{debug, error};
use sahrisk_type::PatientRecord;

use crate::error::ModelConfigurationError;
use crate::model::{RiskModel, RiskResult};
use crate::published::published_models;

/// Checks every model definition against the patient record schema.
pub fn check_models(models: &[RiskModel]) -> Result<(), ModelConfigurationError> {
    models.iter().try_for_each(RiskModel::check)
}

/// Evaluates `models` for one patient, in the order given.
///
/// A configuration defect in any model fails the whole batch; no partial
/// result sequence is ever returned.
pub fn evaluate(
    record: &PatientRecord,
    models: &[RiskModel],
) -> Result<Vec<RiskResult>, ModelConfigurationError> {
    let results = models
        .iter()
        .map(|model| model.evaluate(record))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|err| error!("risk model configuration defect: {err}"))?;
    debug!(
        "evaluated {} model(s), {} applicable",
        results.len(),
        results.iter().filter(|r| r.applicable).count()
    );
    Ok(results)
}

/// Evaluates the four published models.
pub fn evaluate_published(
    record: &PatientRecord,
) -> Result<Vec<RiskResult>, ModelConfigurationError> {
    evaluate(record, published_models())
}
