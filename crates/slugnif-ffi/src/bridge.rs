//! The call-time bridge between runtime terms and a text transform.
//!
//! One [`Bridge`] backs one registered function. Each invocation:
//! - checks arity, then decodes the argument into a [`BoundedBuffer`]
//! - hands the buffer to the [`Transform`]
//! - encodes the result back into a charlist term
//!
//! Any failure before the transform runs is a `BadArgument`, and the
//! transform is not called. Failures after it are a `TransformFailure`.

use std::sync::Arc;

use slugnif_core::{decode_latin1, encode_latin1, Encoding, Env, Term, DEFAULT_CAPACITY};

use crate::error::BridgeError;
use crate::transform::Transform;

/// Arity every bridged text function is registered with.
pub const STRING_ARITY: usize = 1;

/// A single-string-in, single-string-out native entry point.
#[derive(Clone)]
pub struct Bridge {
    name: String,
    capacity: usize,
    encoding: Encoding,
    transform: Arc<dyn Transform>,
}

impl Bridge {
    /// Create a bridge with the default capacity and Latin-1 encoding.
    pub fn new(name: impl Into<String>, transform: Arc<dyn Transform>) -> Self {
        Self {
            name: name.into(),
            capacity: DEFAULT_CAPACITY,
            encoding: Encoding::Latin1,
            transform,
        }
    }

    /// Override the input buffer capacity (terminator included).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        STRING_ARITY
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Run one call, returning a typed error on failure.
    pub fn invoke(&self, _env: &Env, args: &[Term]) -> Result<Term, BridgeError> {
        let [arg] = args else {
            return Err(BridgeError::BadArgument {
                reason: format!("{} expects {} argument, got {}", self.name, STRING_ARITY, args.len()),
            });
        };

        let input = match self.encoding {
            Encoding::Latin1 => decode_latin1(arg, self.capacity)?,
        };

        let output = self
            .transform
            .transform(&input)
            .ok_or_else(|| BridgeError::TransformFailure {
                reason: format!("{} returned no result", self.name),
            })?;

        let term = match self.encoding {
            Encoding::Latin1 => encode_latin1(&output)?,
        };

        tracing::trace!(function = %self.name, in_len = input.len(), out_len = output.len(), "bridged call");
        Ok(term)
    }

    /// Runtime-facing entry point.
    ///
    /// On failure the `badarg` exception is raised through `env` and the
    /// non-value sentinel is returned.
    pub fn call(&self, env: &mut Env, args: &[Term]) -> Term {
        match self.invoke(env, args) {
            Ok(term) => term,
            Err(e) => {
                tracing::debug!(function = %self.name, kind = ?e.kind(), error = %e, "call raised badarg");
                env.make_badarg()
            }
        }
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}
