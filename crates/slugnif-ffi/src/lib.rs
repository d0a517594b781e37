//! Safe, bounded bridge between a managed runtime and native text routines.
//!
//! A runtime calls a registered function with one string term. The bridge
//! decodes it into a fixed-capacity buffer, hands the buffer to an opaque
//! external transform, and encodes the result back into a term. Every
//! failure is reported through the runtime's `badarg` convention.
//!
//! ## Modules
//!
//! - [`bridge`] — Per-call marshaling and error mapping
//! - [`transform`] — The transform contract and its C adapters
//! - [`csig`] — C prototype parser for declared routines
//! - [`declaration`] — `nif.toml` declaration file parsing
//! - [`registry`] — Immutable `(name, arity)` registration table

pub mod bridge;
pub mod csig;
pub mod declaration;
pub mod error;
pub mod registry;
pub mod transform;

// Re-export key types for convenience
pub use bridge::{Bridge, STRING_ARITY};
pub use csig::{CSignature, CType};
pub use declaration::{FunctionDecl, NifDeclaration};
pub use error::{BridgeError, ErrorKind, FfiError};
pub use registry::{ModuleTable, NifFunction};
pub use transform::{CTransform, LibraryTransform, RawTransformFn, Transform};
