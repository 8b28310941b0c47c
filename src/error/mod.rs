//! Error module orchestrator.
//!
//! The taxonomy is shallow: most user input is coerced rather than rejected,
//! so these variants cover configuration problems and API misuse.

mod types;

pub use types::{PageError, Result, WizardError};
