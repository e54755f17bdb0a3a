use thiserror::Error;

/// Which credential field failed a format rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Number,
    Month,
    Year,
    Cvv,
    Prefix,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Number => "cc",
            Field::Month => "mm",
            Field::Year => "yy",
            Field::Cvv => "cvv",
            Field::Prefix => "bin",
        };
        f.write_str(name)
    }
}

/// Input rejected by the format rules. Always the caller's fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn new(field: Field, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// Failure of one outbound call to a gateway collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("gateway call timed out")]
    Timeout,
    #[error("gateway rejected the request with status {status}")]
    Rejected {
        status: u16,
        body: serde_json::Value,
    },
    #[error("gateway answered with a malformed success body: {0}")]
    ProtocolViolation(String),
    #[error("gateway unreachable: {0}")]
    Unavailable(String),
}

/// Faults raised inside the crate itself, as opposed to bad input or a
/// failing gateway.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("stage {to:?} cannot follow {from:?}")]
    IllegalTransition {
        from: crate::domain::report::Stage,
        to: crate::domain::report::Stage,
    },
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
