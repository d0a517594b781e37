//! Per-call environment.
//!
//! The runtime creates one [`Env`] for each native call. A native function
//! reports failure by raising an exception through the env and returning
//! [`Term::NonValue`]; the runtime then reads the pending reason back.

use crate::term::Term;

/// Call-scoped environment handed to a native function.
#[derive(Debug, Default)]
pub struct Env {
    exception: Option<Term>,
}

impl Env {
    /// Create a fresh environment with no pending exception.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise an exception with the given reason.
    ///
    /// Returns the sentinel the native function must hand back. A second
    /// raise within the same call replaces the first reason.
    pub fn raise_exception(&mut self, reason: Term) -> Term {
        self.exception = Some(reason);
        Term::NonValue
    }

    /// Raise the conventional `badarg` exception.
    pub fn make_badarg(&mut self) -> Term {
        self.raise_exception(Term::atom("badarg"))
    }

    /// Whether an exception has been raised in this call.
    pub fn has_exception(&self) -> bool {
        self.exception.is_some()
    }

    /// The pending exception reason, if any.
    pub fn exception(&self) -> Option<&Term> {
        self.exception.as_ref()
    }

    /// Take the pending exception, clearing it.
    pub fn take_exception(&mut self) -> Option<Term> {
        self.exception.take()
    }
}
