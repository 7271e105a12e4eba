//! Turns raw form values into a validated [`PatientRecord`].

use std::ops::RangeInclusive;

use log::debug;
use sahrisk_type::{
    covariates, PatientData, PatientRecord, Sex, AGE_YEARS, CRP_MG_PER_L, MODIFIED_FISHER_GRADE,
    WFNS_GRADE,
};

use crate::error::{FieldError, FieldProblem, InvalidInputError};
use crate::form::{FormInput, RawValue};

const BOOLEAN_SPELLINGS: &[&str] = &["true", "false", "yes", "no", "on", "off", "y", "n", "1", "0"];

/// Collects per-field problems while the form is read.
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn take<T>(&mut self, field: &'static str, result: Result<T, FieldProblem>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(problem) => {
                debug!("form field '{field}' rejected: {problem}");
                self.errors.push(FieldError { field, problem });
                None
            }
        }
    }
}

fn present(value: Option<&RawValue>) -> Result<&RawValue, FieldProblem> {
    match value {
        None | Some(RawValue::Null) => Err(FieldProblem::Missing),
        Some(RawValue::Text(t)) if t.trim().is_empty() => Err(FieldProblem::Missing),
        Some(v) => Ok(v),
    }
}

fn number(value: &RawValue) -> Result<f64, FieldProblem> {
    let x = match value {
        RawValue::Int(i) => *i as f64,
        RawValue::Float(x) => *x,
        RawValue::Text(t) => t.trim().parse::<f64>().map_err(|_| FieldProblem::WrongType {
            expected: "a number",
            found: value.to_string(),
        })?,
        RawValue::Bool(_) => {
            return Err(FieldProblem::WrongType {
                expected: "a number",
                found: value.to_string(),
            })
        }
        RawValue::Null => return Err(FieldProblem::Missing),
    };
    if x.is_finite() {
        Ok(x)
    } else {
        Err(FieldProblem::NotFinite)
    }
}

fn bounded(x: f64, min: f64, max: f64) -> Result<f64, FieldProblem> {
    if x < min || x > max {
        Err(FieldProblem::OutOfRange {
            min,
            max,
            actual: x,
        })
    } else {
        Ok(x)
    }
}

fn integer<T>(value: Option<&RawValue>, range: &RangeInclusive<T>) -> Result<T, FieldProblem>
where
    T: Copy + Into<f64> + TryFrom<i64>,
{
    let raw = present(value)?;
    let x = number(raw)?;
    if x.fract() != 0.0 {
        return Err(FieldProblem::WrongType {
            expected: "a whole number",
            found: raw.to_string(),
        });
    }
    let (min, max) = ((*range.start()).into(), (*range.end()).into());
    let x = bounded(x, min, max)?;
    T::try_from(x as i64).map_err(|_| FieldProblem::OutOfRange {
        min,
        max,
        actual: x,
    })
}

fn real(value: Option<&RawValue>, range: &RangeInclusive<f64>) -> Result<f64, FieldProblem> {
    let x = number(present(value)?)?;
    bounded(x, *range.start(), *range.end())
}

fn flag(value: Option<&RawValue>) -> Result<bool, FieldProblem> {
    let raw = present(value)?;
    let wrong = || FieldProblem::WrongType {
        expected: "a yes/no value",
        found: raw.to_string(),
    };
    match raw {
        RawValue::Bool(b) => Ok(*b),
        RawValue::Int(0) => Ok(false),
        RawValue::Int(1) => Ok(true),
        RawValue::Float(x) if *x == 0.0 => Ok(false),
        RawValue::Float(x) if *x == 1.0 => Ok(true),
        RawValue::Text(t) => match t.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "y" | "1" => Ok(true),
            "false" | "no" | "off" | "n" | "0" => Ok(false),
            _ => Err(FieldProblem::UnknownCategory {
                value: t.clone(),
                allowed: BOOLEAN_SPELLINGS,
            }),
        },
        _ => Err(wrong()),
    }
}

fn sex(value: Option<&RawValue>) -> Result<Sex, FieldProblem> {
    match present(value)? {
        RawValue::Text(t) => Sex::parse(t).ok_or_else(|| FieldProblem::UnknownCategory {
            value: t.clone(),
            allowed: Sex::SPELLINGS,
        }),
        other => Err(FieldProblem::WrongType {
            expected: "text",
            found: other.to_string(),
        }),
    }
}

/// Validates every required field of `form`.
///
/// On failure the error lists all offending fields, in form order. No
/// partial record is ever produced.
pub fn validate_form(form: &FormInput) -> Result<PatientRecord, InvalidInputError> {
    for key in form.keys() {
        if !covariates::ALL.contains(&key) {
            debug!("ignoring unknown form field '{key}'");
        }
    }

    let mut c = Collector { errors: Vec::new() };
    let age = c.take(covariates::AGE, integer(form.get(covariates::AGE), &AGE_YEARS));
    let sex = c.take(covariates::SEX, sex(form.get(covariates::SEX)));
    let wfns_grade = c.take(
        covariates::WFNS,
        integer(form.get(covariates::WFNS), &WFNS_GRADE),
    );
    let modified_fisher_grade = c.take(
        covariates::MODIFIED_FISHER,
        integer(form.get(covariates::MODIFIED_FISHER), &MODIFIED_FISHER_GRADE),
    );
    let crp_mg_per_l = c.take(covariates::CRP, real(form.get(covariates::CRP), &CRP_MG_PER_L));
    let lumbar_drain = c.take(
        covariates::LUMBAR_DRAIN,
        flag(form.get(covariates::LUMBAR_DRAIN)),
    );
    let surgical_clipping = c.take(covariates::CLIPPING, flag(form.get(covariates::CLIPPING)));
    let early_seizure = c.take(
        covariates::EARLY_SEIZURE,
        flag(form.get(covariates::EARLY_SEIZURE)),
    );
    let eeg_abnormal = c.take(
        covariates::EEG_ABNORMAL,
        flag(form.get(covariates::EEG_ABNORMAL)),
    );
    let chronic_hydrocephalus = c.take(
        covariates::HYDROCEPHALUS,
        flag(form.get(covariates::HYDROCEPHALUS)),
    );
    let intracerebral_hemorrhage = c.take(covariates::ICH, flag(form.get(covariates::ICH)));

    let (
        Some(age),
        Some(sex),
        Some(wfns_grade),
        Some(modified_fisher_grade),
        Some(crp_mg_per_l),
        Some(lumbar_drain),
        Some(surgical_clipping),
        Some(early_seizure),
        Some(eeg_abnormal),
        Some(chronic_hydrocephalus),
        Some(intracerebral_hemorrhage),
    ) = (
        age,
        sex,
        wfns_grade,
        modified_fisher_grade,
        crp_mg_per_l,
        lumbar_drain,
        surgical_clipping,
        early_seizure,
        eeg_abnormal,
        chronic_hydrocephalus,
        intracerebral_hemorrhage,
    )
    else {
        debug!("rejected form with {} invalid field(s)", c.errors.len());
        return Err(InvalidInputError::new(c.errors));
    };

    let record = PatientRecord::new(PatientData {
        age,
        sex,
        wfns_grade,
        modified_fisher_grade,
        crp_mg_per_l,
        lumbar_drain,
        surgical_clipping,
        early_seizure,
        eeg_abnormal,
        chronic_hydrocephalus,
        intracerebral_hemorrhage,
    })?;
    debug!(
        "validated patient record: age={} wfns={} mfisher={} crp={}",
        record.age(),
        record.wfns_grade(),
        record.modified_fisher_grade(),
        record.crp_mg_per_l()
    );
    Ok(record)
}
