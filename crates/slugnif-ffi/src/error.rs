//! FFI error types.

use std::path::PathBuf;

use slugnif_core::{DecodeError, EncodeError};

/// Failure of a single bridged call.
///
/// Both kinds are local to the call and reported to the caller through
/// the runtime's `badarg` convention.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// Wrong arity, wrong term type, oversized or unrepresentable input.
    #[error("bad argument: {reason}")]
    BadArgument { reason: String },

    /// The external routine produced no usable output.
    #[error("transform failed: {reason}")]
    TransformFailure { reason: String },
}

/// The two error kinds a call can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadArgument,
    TransformFailure,
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadArgument { .. } => ErrorKind::BadArgument,
            Self::TransformFailure { .. } => ErrorKind::TransformFailure,
        }
    }
}

impl From<DecodeError> for BridgeError {
    fn from(e: DecodeError) -> Self {
        Self::BadArgument {
            reason: e.to_string(),
        }
    }
}

impl From<EncodeError> for BridgeError {
    fn from(e: EncodeError) -> Self {
        Self::TransformFailure {
            reason: e.to_string(),
        }
    }
}

/// Errors raised while declaring, loading, or registering functions.
#[derive(Debug, thiserror::Error)]
pub enum FfiError {
    /// Failed to parse a C function signature.
    #[error("invalid C signature: {detail}")]
    InvalidCSignature { detail: String },

    /// The declaration file is structurally valid TOML but semantically wrong.
    #[error("invalid declaration: {detail}")]
    InvalidDeclaration { detail: String },

    /// Two registrations share the same name and arity.
    #[error("duplicate registration: {name}/{arity}")]
    DuplicateFunction { name: String, arity: usize },

    /// No transform was supplied for a declared function.
    #[error("no transform resolved for '{name}'")]
    Unresolved { name: String },

    /// The shared library could not be opened.
    #[error("failed to load library '{}': {detail}", .path.display())]
    LibraryLoad { path: PathBuf, detail: String },

    /// The declared symbol is missing from the library.
    #[error("symbol '{symbol}' not found in '{}': {detail}", .path.display())]
    SymbolNotFound {
        symbol: String,
        path: PathBuf,
        detail: String,
    },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for declaration and registration operations.
pub type Result<T> = std::result::Result<T, FfiError>;
