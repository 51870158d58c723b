use thiserror::Error;

/// Error type for perfgate operations.
#[derive(Debug, Error)]
pub enum PerfGateError {
    #[error("io error: {0}")]
    IoError(String),
    #[error("baseline error: {0}")]
    BaselineError(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("report error: {0}")]
    ReportError(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl PerfGateError {
    pub fn io<T: Into<String>>(msg: T) -> Self {
        PerfGateError::IoError(msg.into())
    }

    pub fn baseline<T: Into<String>>(msg: T) -> Self {
        PerfGateError::BaselineError(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        PerfGateError::ParseError(msg.into())
    }

    pub fn report<T: Into<String>>(msg: T) -> Self {
        PerfGateError::ReportError(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        PerfGateError::InvalidInput(msg.into())
    }
}
