//! Input validation for the aSAH seizure risk calculator
//!
//! Converts the raw values of a submitted form into a
//! [`sahrisk_type::PatientRecord`], or rejects the submission with an
//! [`InvalidInputError`] naming every offending field.

pub mod error;
pub mod form;
pub mod validator;

pub use error::{FieldError, FieldProblem, InvalidInputError};
pub use form::{FormInput, FormParseError, RawValue};
pub use validator::validate_form;
