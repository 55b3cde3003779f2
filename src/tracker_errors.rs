use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Element source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid element set: {0}")]
    InvalidElementSet(String),

    #[error("Propagation failed: {0}")]
    PropagationError(String),

    #[error("Invalid observer location: {0}")]
    InvalidObserver(String),

    #[error("Invalid tracker configuration: {0}")]
    InvalidConfig(String),

    #[error("Unable to read the system clock: {0}")]
    Clock(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("NaN encountered: {0}")]
    NanError(#[from] ordered_float::FloatIsNan),
}

impl TrackerError {
    /// Process exit status associated with this error.
    ///
    /// Element-source failures and element-validity failures are kept distinct so that a
    /// calling script can tell "could not fetch" from "fetched garbage".
    pub fn exit_code(&self) -> i32 {
        use TrackerError::*;
        match self {
            SourceUnavailable(_) | ReqwestError(_) => 1,
            InvalidElementSet(_) => 2,
            PropagationError(_) => 3,
            _ => 4,
        }
    }
}

impl PartialEq for TrackerError {
    fn eq(&self, other: &Self) -> bool {
        use TrackerError::*;
        match (self, other) {
            (SourceUnavailable(a), SourceUnavailable(b)) => a == b,
            (InvalidElementSet(a), InvalidElementSet(b)) => a == b,
            (PropagationError(a), PropagationError(b)) => a == b,
            (InvalidObserver(a), InvalidObserver(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (Clock(a), Clock(b)) => a == b,

            // not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (ReqwestError(_), ReqwestError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (NanError(_), NanError(_)) => true,

            _ => false,
        }
    }
}
