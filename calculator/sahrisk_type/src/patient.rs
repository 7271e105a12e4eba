// Patient record evaluated by the seizure risk models
//
// A `PatientRecord` can only be obtained from `PatientData` that passed
// domain validation, so the evaluator never sees out-of-range covariates.

use std::fmt;
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::{Validatable, ValidationError};

/// Form keys of every covariate a record exposes.
pub mod covariates {
    pub const AGE: &str = "age";
    pub const SEX: &str = "sex";
    pub const WFNS: &str = "wfns";
    pub const MODIFIED_FISHER: &str = "mfisher";
    pub const CRP: &str = "crp";
    pub const LUMBAR_DRAIN: &str = "ld";
    pub const CLIPPING: &str = "clipping";
    pub const EARLY_SEIZURE: &str = "early_seizure";
    pub const EEG_ABNORMAL: &str = "eeg_abnormal";
    pub const HYDROCEPHALUS: &str = "hcp";
    pub const ICH: &str = "ich";

    /// All keys in form order.
    pub const ALL: [&str; 11] = [
        AGE,
        SEX,
        WFNS,
        MODIFIED_FISHER,
        CRP,
        LUMBAR_DRAIN,
        CLIPPING,
        EARLY_SEIZURE,
        EEG_ABNORMAL,
        HYDROCEPHALUS,
        ICH,
    ];
}

/// Plausible adult age in years.
pub const AGE_YEARS: RangeInclusive<u16> = 18..=110;
/// World Federation of Neurological Surgeons grade.
pub const WFNS_GRADE: RangeInclusive<u8> = 1..=5;
/// WFNS grades that denote a severe presentation.
pub const SEVERE_WFNS_GRADE: RangeInclusive<u8> = 4..=5;
/// Modified Fisher CT grade.
pub const MODIFIED_FISHER_GRADE: RangeInclusive<u8> = 0..=4;
/// C-reactive protein in mg/L.
pub const CRP_MG_PER_L: RangeInclusive<f64> = 0.0..=500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Accepted spellings, lowercase.
    pub const SPELLINGS: &'static [&'static str] = &["male", "m", "female", "f"];

    /// Case-insensitive parse of the form spellings.
    pub fn parse(text: &str) -> Option<Sex> {
        match text.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unchecked patient values, as collected from the input form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatientData {
    pub age: u16,
    pub sex: Sex,
    pub wfns_grade: u8,
    pub modified_fisher_grade: u8,
    pub crp_mg_per_l: f64,
    pub lumbar_drain: bool,
    pub surgical_clipping: bool,
    pub early_seizure: bool,
    pub eeg_abnormal: bool,
    pub chronic_hydrocephalus: bool,
    pub intracerebral_hemorrhage: bool,
}

fn check_range<T>(
    field: &'static str,
    range: &RangeInclusive<T>,
    value: T,
    out: &mut Vec<ValidationError>,
) where
    T: PartialOrd + Copy + Into<f64>,
{
    if !range.contains(&value) {
        out.push(ValidationError::OutOfRange {
            field,
            min: (*range.start()).into(),
            max: (*range.end()).into(),
            actual: value.into(),
        });
    }
}

impl Validatable for PatientData {
    fn violations(&self) -> Vec<ValidationError> {
        let mut out = Vec::new();
        check_range(covariates::AGE, &AGE_YEARS, self.age, &mut out);
        check_range(covariates::WFNS, &WFNS_GRADE, self.wfns_grade, &mut out);
        check_range(
            covariates::MODIFIED_FISHER,
            &MODIFIED_FISHER_GRADE,
            self.modified_fisher_grade,
            &mut out,
        );
        if self.crp_mg_per_l.is_finite() {
            check_range(covariates::CRP, &CRP_MG_PER_L, self.crp_mg_per_l, &mut out);
        } else {
            out.push(ValidationError::NotFinite {
                field: covariates::CRP,
            });
        }
        out
    }
}

/// A validated patient record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "PatientData", into = "PatientData")
)]
pub struct PatientRecord {
    data: PatientData,
}

impl TryFrom<PatientData> for PatientRecord {
    type Error = ValidationError;

    fn try_from(data: PatientData) -> Result<Self, Self::Error> {
        data.validate()?;
        Ok(PatientRecord { data })
    }
}

impl From<PatientRecord> for PatientData {
    fn from(record: PatientRecord) -> Self {
        record.data
    }
}

impl PatientRecord {
    pub fn new(data: PatientData) -> Result<Self, ValidationError> {
        Self::try_from(data)
    }

    pub fn data(&self) -> &PatientData {
        &self.data
    }

    pub fn age(&self) -> u16 {
        self.data.age
    }

    pub fn sex(&self) -> Sex {
        self.data.sex
    }

    pub fn wfns_grade(&self) -> u8 {
        self.data.wfns_grade
    }

    pub fn modified_fisher_grade(&self) -> u8 {
        self.data.modified_fisher_grade
    }

    pub fn crp_mg_per_l(&self) -> f64 {
        self.data.crp_mg_per_l
    }

    pub fn lumbar_drain(&self) -> bool {
        self.data.lumbar_drain
    }

    pub fn surgical_clipping(&self) -> bool {
        self.data.surgical_clipping
    }

    pub fn early_seizure(&self) -> bool {
        self.data.early_seizure
    }

    pub fn eeg_abnormal(&self) -> bool {
        self.data.eeg_abnormal
    }

    pub fn chronic_hydrocephalus(&self) -> bool {
        self.data.chronic_hydrocephalus
    }

    pub fn intracerebral_hemorrhage(&self) -> bool {
        self.data.intracerebral_hemorrhage
    }

    /// True for WFNS grade 4 or 5.
    pub fn is_severe(&self) -> bool {
        SEVERE_WFNS_GRADE.contains(&self.data.wfns_grade)
    }

    /// Numeric value of the covariate with the given form key.
    ///
    /// Flags map to 1.0/0.0 and sex to 1.0 for male. Returns `None` for
    /// names the record does not carry.
    pub fn covariate(&self, name: &str) -> Option<f64> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let d = &self.data;
        let value = match name {
            covariates::AGE => f64::from(d.age),
            covariates::SEX => flag(d.sex == Sex::Male),
            covariates::WFNS => f64::from(d.wfns_grade),
            covariates::MODIFIED_FISHER => f64::from(d.modified_fisher_grade),
            covariates::CRP => d.crp_mg_per_l,
            covariates::LUMBAR_DRAIN => flag(d.lumbar_drain),
            covariates::CLIPPING => flag(d.surgical_clipping),
            covariates::EARLY_SEIZURE => flag(d.early_seizure),
            covariates::EEG_ABNORMAL => flag(d.eeg_abnormal),
            covariates::HYDROCEPHALUS => flag(d.chronic_hydrocephalus),
            covariates::ICH => flag(d.intracerebral_hemorrhage),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> PatientData {
        PatientData {
            age: 60,
            sex: Sex::Female,
            wfns_grade: 3,
            modified_fisher_grade: 2,
            crp_mg_per_l: 12.5,
            lumbar_drain: true,
            surgical_clipping: false,
            early_seizure: false,
            eeg_abnormal: false,
            chronic_hydrocephalus: true,
            intracerebral_hemorrhage: false,
        }
    }

    #[test]
    fn valid_data_builds_a_record() {
        let record = PatientRecord::new(sample()).unwrap();
        assert_eq!(record.age(), 60);
        assert_eq!(record.wfns_grade(), 3);
        assert!(!record.is_severe());
    }

    #[test]
    fn severe_grades_are_four_and_five() {
        for (grade, severe) in [(1, false), (3, false), (4, true), (5, true)] {
            let record = PatientRecord::new(PatientData {
                wfns_grade: grade,
                ..sample()
            })
            .unwrap();
            assert_eq!(record.is_severe(), severe, "grade {grade}");
        }
    }

    #[test]
    fn out_of_range_grade_is_rejected() {
        let err = PatientRecord::new(PatientData {
            wfns_grade: 7,
            ..sample()
        })
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "wfns",
                min: 1.0,
                max: 5.0,
                actual: 7.0
            }
        );
    }

    #[test]
    fn all_violations_are_listed_in_field_order() {
        let data = PatientData {
            age: 3,
            modified_fisher_grade: 9,
            crp_mg_per_l: f64::NAN,
            ..sample()
        };
        let fields: Vec<_> = data.violations().iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["age", "mfisher", "crp"]);
    }

    #[test]
    fn covariates_expose_every_form_key() {
        let record = PatientRecord::new(sample()).unwrap();
        for name in covariates::ALL {
            assert!(record.covariate(name).is_some(), "missing {name}");
        }
        assert_eq!(record.covariate("ld"), Some(1.0));
        assert_eq!(record.covariate("clipping"), Some(0.0));
        assert_eq!(record.covariate("sex"), Some(0.0));
        assert_eq!(record.covariate("crp"), Some(12.5));
        assert_eq!(record.covariate("gcs"), None);
    }

    #[test]
    fn sex_parses_common_spellings() {
        assert_eq!(Sex::parse(" Male "), Some(Sex::Male));
        assert_eq!(Sex::parse("F"), Some(Sex::Female));
        assert_eq!(Sex::parse("other"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializing_a_record_revalidates() {
        let record = PatientRecord::new(sample()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: PatientRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);

        let bad = json.replace("\"wfns_grade\":3", "\"wfns_grade\":9");
        assert!(serde_json::from_str::<PatientRecord>(&bad).is_err());
    }
}
