//! Error codes for OpenCTM operations
//!
//! `ErrorCode` is the stable, numbered error enumeration exposed by every
//! [`Context`](crate::context::Context). The numeric values are part of the
//! public ABI and never change.

use std::fmt;

use crate::status::CtmError;

/// OpenCTM error codes
///
/// Exactly one current value lives in each context; see
/// [`Context::get_error`](crate::context::Context::get_error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    /// No error has occurred
    None = 0,
    /// The context handle was unusable
    InvalidContext = 1,
    /// A function argument was invalid
    InvalidArgument = 2,
    /// The operation is not allowed in the current mode or state
    InvalidOperation = 3,
    /// The mesh was invalid (e.g. no vertices or an index out of range)
    InvalidMesh = 4,
    /// Not enough memory, or a configured capacity was exceeded
    OutOfMemory = 5,
    /// Stream I/O failed
    FileError = 6,
    /// The input is not a valid OpenCTM stream
    BadFormat = 7,
    /// The entropy coder failed
    LzmaError = 8,
    /// An internal invariant was violated
    InternalError = 9,
    /// The stream was written by an unsupported format version
    UnsupportedFormatVersion = 10,
}

impl ErrorCode {
    /// Every error code, in numeric order.
    pub const ALL: [ErrorCode; 11] = [
        ErrorCode::None,
        ErrorCode::InvalidContext,
        ErrorCode::InvalidArgument,
        ErrorCode::InvalidOperation,
        ErrorCode::InvalidMesh,
        ErrorCode::OutOfMemory,
        ErrorCode::FileError,
        ErrorCode::BadFormat,
        ErrorCode::LzmaError,
        ErrorCode::InternalError,
        ErrorCode::UnsupportedFormatVersion,
    ];

    /// Returns the stable name of this error code
    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::None => "CTM_NONE",
            ErrorCode::InvalidContext => "CTM_INVALID_CONTEXT",
            ErrorCode::InvalidArgument => "CTM_INVALID_ARGUMENT",
            ErrorCode::InvalidOperation => "CTM_INVALID_OPERATION",
            ErrorCode::InvalidMesh => "CTM_INVALID_MESH",
            ErrorCode::OutOfMemory => "CTM_OUT_OF_MEMORY",
            ErrorCode::FileError => "CTM_FILE_ERROR",
            ErrorCode::BadFormat => "CTM_BAD_FORMAT",
            ErrorCode::LzmaError => "CTM_LZMA_ERROR",
            ErrorCode::InternalError => "CTM_INTERNAL_ERROR",
            ErrorCode::UnsupportedFormatVersion => "CTM_UNSUPPORTED_FORMAT_VERSION",
        }
    }

    /// Returns the numeric ABI value
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn is_error(self) -> bool {
        self != ErrorCode::None
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::None
    }
}

impl TryFrom<u32> for ErrorCode {
    type Error = CtmError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| CtmError::InvalidArgument(format!("unknown error code {}", value)))
    }
}

/// Returns the stable string for an error code. Requires no context.
pub fn error_string(code: ErrorCode) -> &'static str {
    code.name()
}

/// Like [`error_string`], for raw ABI values that may be out of range.
pub fn error_string_raw(code: u32) -> &'static str {
    match ErrorCode::try_from(code) {
        Ok(code) => code.name(),
        Err(_) => "Unknown error code",
    }
}
