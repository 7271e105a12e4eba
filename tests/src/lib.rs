//! Shared fixtures for the calculator's integration tests.

use sahrisk_validate::FormInput;

/// A complete, valid form for a 60 year old with the given WFNS grade.
pub fn form_with_grade(wfns: i64) -> FormInput {
    FormInput::new()
        .with("age", 60)
        .with("sex", "female")
        .with("wfns", wfns)
        .with("mfisher", 2)
        .with("crp", 15.0)
        .with("ld", false)
        .with("clipping", true)
        .with("early_seizure", false)
        .with("eeg_abnormal", true)
        .with("hcp", false)
        .with("ich", true)
}
