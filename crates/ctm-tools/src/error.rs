use std::io;

use ctm_core::CtmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Ctm(#[from] CtmError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid converter spec {0:?}, expected EXT=COMMAND")]
    BadConverterSpec(String),
    #[error("no converter registered for {0:?} files")]
    UnknownExtension(String),
    #[error("converter `{command}` failed: {message}")]
    ConverterFailed { command: String, message: String },
}

pub type ToolResult<T> = Result<T, ToolError>;
