//! A single tagged error type shared across every component boundary
//! (builder, variance engine, lossy filter, encoder, decoder, raster
//! reconstructor, PGM/QTC framing). Per-component causes are translated into
//! one of these kinds at the boundary rather than leaked as distinct enums.

use thiserror::Error;

/// The taxonomy of ways a codec operation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecErrorKind {
    /// Nulls, contradictory mode flags, non-positive `alpha` for lossy, etc.
    InvalidParameter,
    /// Open, read, or write failed on a file handle.
    Io,
    /// QTC magic mismatch, impossible `L`, stream underrun, fourth-mean out
    /// of range, malformed PGM header.
    Format,
    /// Input PGM not square, not power-of-two side, or max-value > 255.
    Size,
    /// An allocation failed during build, decode, or filter.
    OutOfMemory,
}

impl std::fmt::Display for CodecErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CodecErrorKind::InvalidParameter => "invalid parameter",
            CodecErrorKind::Io => "I/O failure",
            CodecErrorKind::Format => "format error",
            CodecErrorKind::Size => "size error",
            CodecErrorKind::OutOfMemory => "out of memory",
        };
        f.write_str(s)
    }
}

/// A codec-wide error: a kind plus an optional human-readable detail.
#[derive(Debug, Error)]
#[error("{kind}{}", detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
pub struct CodecError {
    pub kind: CodecErrorKind,
    pub detail: Option<String>,
}

impl CodecError {
    pub fn new(kind: CodecErrorKind, detail: impl Into<String>) -> Self {
        CodecError {
            kind,
            detail: Some(detail.into()),
        }
    }

    pub fn bare(kind: CodecErrorKind) -> Self {
        CodecError { kind, detail: None }
    }

    pub fn invalid_parameter(detail: impl Into<String>) -> Self {
        Self::new(CodecErrorKind::InvalidParameter, detail)
    }

    pub fn format(detail: impl Into<String>) -> Self {
        Self::new(CodecErrorKind::Format, detail)
    }

    pub fn size(detail: impl Into<String>) -> Self {
        Self::new(CodecErrorKind::Size, detail)
    }

    pub fn out_of_memory() -> Self {
        Self::bare(CodecErrorKind::OutOfMemory)
    }

    pub fn is_format(&self) -> bool {
        self.kind == CodecErrorKind::Format
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::new(CodecErrorKind::Io, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
