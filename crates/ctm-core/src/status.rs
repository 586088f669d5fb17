use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

use crate::error::ErrorCode;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CtmError {
    #[error("Invalid context: {0}")]
    InvalidContext(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("Out of memory: {0}")]
    OutOfMemory(String),
    #[error("File error: {0}")]
    FileError(String),
    #[error("Bad format: {0}")]
    BadFormat(String),
    #[error("Entropy coder error: {0}")]
    LzmaError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("Unsupported format version: {0}")]
    UnsupportedFormatVersion(u32),
}

pub type Status = Result<(), CtmError>;
pub type StatusResult<T> = Result<T, CtmError>;

impl CtmError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CtmError::InvalidContext(_) => ErrorCode::InvalidContext,
            CtmError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            CtmError::InvalidOperation(_) => ErrorCode::InvalidOperation,
            CtmError::InvalidMesh(_) => ErrorCode::InvalidMesh,
            CtmError::OutOfMemory(_) => ErrorCode::OutOfMemory,
            CtmError::FileError(_) => ErrorCode::FileError,
            CtmError::BadFormat(_) => ErrorCode::BadFormat,
            CtmError::LzmaError(_) => ErrorCode::LzmaError,
            CtmError::InternalError(_) => ErrorCode::InternalError,
            CtmError::UnsupportedFormatVersion(_) => ErrorCode::UnsupportedFormatVersion,
        }
    }
}

/// A stream that ends early is a truncated file, not an I/O fault.
impl From<io::Error> for CtmError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => CtmError::BadFormat(format!("truncated stream: {}", err)),
            _ => CtmError::FileError(err.to_string()),
        }
    }
}

impl From<TryReserveError> for CtmError {
    fn from(err: TryReserveError) -> Self {
        CtmError::OutOfMemory(err.to_string())
    }
}

pub fn invalid_argument(msg: impl Into<String>) -> CtmError {
    CtmError::InvalidArgument(msg.into())
}

pub fn bad_format(msg: impl Into<String>) -> CtmError {
    CtmError::BadFormat(msg.into())
}
