use thiserror::Error;

/// Pipeline error taxonomy. Fetch/Parse/Classification/Store errors degrade
/// the affected fields and processing continues; Configuration errors are
/// fatal at startup, before any symbol is processed.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
