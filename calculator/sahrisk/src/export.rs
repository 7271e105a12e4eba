//! CSV export of assessments, one row per submission.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use sahrisk_model::RiskResult;
use thiserror::Error;

use crate::assess::Assessment;

const INPUT_COLUMNS: [&str; 11] = [
    "Input_Age",
    "Input_Sex",
    "Input_WFNS",
    "Input_mFisher",
    "Input_CRP",
    "Input_LD",
    "Input_Clipping",
    "Input_EarlySeizure",
    "Input_EEG_Abnormal",
    "Input_HCP",
    "Input_ICH",
];

const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to create export directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "assessment {row} was evaluated with models [{}], expected [{}]",
        .found.join(", "),
        .expected.join(", ")
    )]
    ModelMismatch {
        row: usize,
        expected: Vec<&'static str>,
        found: Vec<&'static str>,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// File name used when no explicit export path is given.
pub fn default_file_name(assessment: &Assessment) -> String {
    format!(
        "aSAH_risk_results_WFNS_{}.csv",
        assessment.patient.wfns_grade()
    )
}

/// `early_general` at position 0 becomes `Model1_Early_General`.
fn column_prefix(position: usize, result: &RiskResult) -> String {
    let title = result
        .model_id
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("_");
    format!("Model{}_{}", position + 1, title)
}

fn header(results: &[RiskResult]) -> Vec<String> {
    let mut columns: Vec<String> = INPUT_COLUMNS.iter().map(|c| c.to_string()).collect();
    for (i, result) in results.iter().enumerate() {
        let prefix = column_prefix(i, result);
        columns.push(format!("{prefix}_Score"));
        columns.push(format!("{prefix}_Probability"));
    }
    columns
}

fn row(assessment: &Assessment, precision: usize) -> Vec<String> {
    let p = &assessment.patient;
    let flag = |b: bool| (if b { "1" } else { "0" }).to_string();
    let mut fields = vec![
        p.age().to_string(),
        p.sex().to_string(),
        p.wfns_grade().to_string(),
        p.modified_fisher_grade().to_string(),
        p.crp_mg_per_l().to_string(),
        flag(p.lumbar_drain()),
        flag(p.surgical_clipping()),
        flag(p.early_seizure()),
        flag(p.eeg_abnormal()),
        flag(p.chronic_hydrocephalus()),
        flag(p.intracerebral_hemorrhage()),
    ];
    let number = |x: Option<f64>| match x {
        Some(x) => format!("{x:.precision$}"),
        None => NOT_APPLICABLE.to_string(),
    };
    for result in &assessment.results {
        fields.push(number(result.linear_predictor));
        fields.push(number(result.probability));
    }
    fields
}

fn model_ids(assessment: &Assessment) -> Vec<&'static str> {
    assessment.results.iter().map(|r| r.model_id).collect()
}

/// Writes a header row followed by one row per assessment.
///
/// Result columns follow the model order of the first assessment; every
/// other assessment must have been evaluated with the same models in the
/// same order. Nothing is written when they differ.
pub fn write_csv<W: io::Write>(
    writer: W,
    assessments: &[Assessment],
    precision: usize,
) -> Result<(), ExportError> {
    let results = assessments
        .first()
        .map(|a| a.results.as_slice())
        .unwrap_or_default();
    let expected: Vec<_> = results.iter().map(|r| r.model_id).collect();
    for (row, assessment) in assessments.iter().enumerate().skip(1) {
        let found = model_ids(assessment);
        if found != expected {
            return Err(ExportError::ModelMismatch {
                row,
                expected,
                found,
            });
        }
    }

    let mut out = csv::Writer::from_writer(writer);
    out.write_record(header(results))?;
    for assessment in assessments {
        out.write_record(row(assessment, precision))?;
    }
    out.flush()?;
    Ok(())
}

pub fn export_assessment(
    assessment: &Assessment,
    path: &Path,
    precision: usize,
) -> Result<(), ExportError> {
    let file = fs::File::create(path)?;
    write_csv(file, std::slice::from_ref(assessment), precision)?;
    info!("wrote assessment to {}", path.display());
    Ok(())
}

/// Exports into `dir` under [`default_file_name`], creating `dir` if needed.
pub fn export_to_dir(
    assessment: &Assessment,
    dir: &Path,
    precision: usize,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(default_file_name(assessment));
    export_assessment(assessment, &path, precision)?;
    Ok(path)
}
