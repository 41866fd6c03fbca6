use std::io;

pub type Result<T> = std::result::Result<T, PathError>;

#[derive(thiserror::Error, Debug)]
pub enum PathError {
    #[error("empty path")]
    EmptyPath,
    #[error("path too long: {len} bytes")]
    TooLong { len: usize },
    #[error("invalid path {path:?}")]
    InvalidPath { path: String },
    #[error("path is not fully qualified: {path:?}")]
    NotFullyQualified { path: String },
    #[error("invalid template {template:?}: expected at least one `X`")]
    InvalidTemplate { template: String },
    #[error(transparent)]
    System(#[from] SystemError),
}

/// A failure reported by the operating system, with its raw error code when
/// one is available.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SystemError {
    pub code: Option<i32>,
    pub message: String,
}

impl SystemError {
    pub fn new(code: Option<i32>, message: impl Into<String>) -> SystemError {
        SystemError {
            code,
            message: message.into(),
        }
    }
}

impl From<io::Error> for SystemError {
    fn from(err: io::Error) -> Self {
        SystemError {
            code: err.raw_os_error(),
            message: err.to_string(),
        }
    }
}

impl From<io::Error> for PathError {
    fn from(err: io::Error) -> Self {
        PathError::System(err.into())
    }
}
