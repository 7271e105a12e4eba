// Domain types for the aSAH seizure risk calculator
pub mod patient;
pub mod traits;

pub use patient::*;
pub use traits::*;
