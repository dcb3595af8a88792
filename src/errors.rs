use thiserror::Error;

/// sysexits-style exit codes used by the binary.
pub mod exitcode {
    pub const USAGE: i32 = 64;
    pub const UNAVAILABLE: i32 = 69;
    pub const SOFTWARE: i32 = 70;
    pub const TEMPFAIL: i32 = 75;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("worker failure: {0}")]
    Worker(String),

    #[error("computation timed out after {0} ms")]
    Timeout(u64),
}

pub type PiResult<T> = Result<T, PiError>;

impl PiError {
    pub fn exit_code(&self) -> i32 {
        match self {
            PiError::InvalidArgument(_) => exitcode::USAGE,
            PiError::ResourceExhausted(_) => exitcode::UNAVAILABLE,
            PiError::Worker(_) => exitcode::SOFTWARE,
            PiError::Timeout(_) => exitcode::TEMPFAIL,
        }
    }
}
