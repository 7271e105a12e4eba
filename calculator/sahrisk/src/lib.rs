//! Seizure risk calculator for aneurysmal subarachnoid hemorrhage (aSAH)
//!
//! Collects a patient's clinical variables, validates them and evaluates
//! four published logistic regression models of early and late seizure
//! risk. Two of the models only apply to severe presentations (WFNS
//! grade 4-5).
//!
//! ```no_run
//! use sahrisk::{assess, FormInput};
//!
//! let form = FormInput::from_json_str(r#"{
//!     "age": 60, "sex": "female", "wfns": 4, "mfisher": 3, "crp": 12.0,
//!     "ld": false, "clipping": true, "early_seizure": false,
//!     "eeg_abnormal": true, "hcp": false, "ich": false
//! }"#)?;
//! let assessment = assess(&form)?;
//! for result in assessment.applicable() {
//!     println!("{}: {:?}", result.model_name, result.probability);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assess;
pub mod config;
pub mod export;
pub mod render;

pub use assess::{assess, assess_with, AssessError, Assessment};
pub use config::{CalculatorConfig, ConfigError, OutputFormat};
pub use export::{export_to_dir, write_csv, ExportError};
pub use render::{render_json, render_text};

pub use sahrisk_model::{
    published_models, Applicability, ModelConfigurationError, RiskModel, RiskResult, Term,
};
pub use sahrisk_type::{PatientData, PatientRecord, Sex};
pub use sahrisk_validate::{FieldProblem, FormInput, InvalidInputError, RawValue};
