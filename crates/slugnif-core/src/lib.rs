//! Core data model for the slugnif native-extension bridge.
//!
//! Models the managed-runtime side of a native call: the terms that cross
//! the boundary, the per-call environment that carries raised exceptions,
//! and the bounded single-byte string codec used to move text in and out.
//!
//! ## Modules
//!
//! - [`term`] — Runtime term representation
//! - [`env`] — Per-call environment and the exception signal
//! - [`buffer`] — Fixed-capacity, NUL-terminated byte buffer
//! - [`encoding`] — Latin-1 charlist decoding and encoding

pub mod buffer;
pub mod encoding;
pub mod env;
pub mod error;
pub mod term;

pub use buffer::{BoundedBuffer, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use encoding::{decode_latin1, encode_latin1, Encoding};
pub use env::Env;
pub use error::{DecodeError, EncodeError};
pub use term::Term;
