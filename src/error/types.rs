use thiserror::Error;

/// Unified result type for the gridpage crate.
pub type Result<T> = std::result::Result<T, PageError>;

/// Errors surfaced by the page layout engine.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("breakpoint `{0}` is not configured")]
    UnknownBreakpoint(String),
    #[error("invalid breakpoint table: {0}")]
    InvalidBreakpointTable(String),
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Raised when a wizard operation is called in a state that cannot take it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("wizard is not active")]
    NotActive,
    #[error("wizard expected the {expected} step but is at {actual}")]
    UnexpectedStep {
        expected: &'static str,
        actual: &'static str,
    },
}
