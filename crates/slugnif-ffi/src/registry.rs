//! Registration table for a native module.
//!
//! A [`ModuleTable`] maps `(name, arity)` to a [`Bridge`]. It is built once,
//! when the module loads, and never changes afterwards; lookups are
//! read-only and the table can be shared across runtime workers.

use std::path::Path;
use std::sync::Arc;

use slugnif_core::{Env, Term};

use crate::bridge::Bridge;
use crate::declaration::{FunctionDecl, NifDeclaration};
use crate::error::{FfiError, Result};
use crate::transform::{LibraryTransform, Transform};

/// One registered entry point.
#[derive(Debug, Clone)]
pub struct NifFunction {
    pub name: String,
    pub arity: usize,
    /// External symbol the bridge calls into.
    pub symbol: String,
    pub bridge: Bridge,
}

/// Immutable registration table for one module.
#[derive(Debug, Clone)]
pub struct ModuleTable {
    module: String,
    functions: Vec<NifFunction>,
}

impl ModuleTable {
    /// Build the table from a validated declaration.
    ///
    /// `resolve` supplies the transform for each declared function. It is
    /// called once per function, in declaration order.
    pub fn build<F>(decl: &NifDeclaration, mut resolve: F) -> Result<Self>
    where
        F: FnMut(&FunctionDecl) -> Result<Arc<dyn Transform>>,
    {
        let mut functions: Vec<NifFunction> = Vec::with_capacity(decl.functions.len());
        for func in &decl.functions {
            if functions
                .iter()
                .any(|f| f.name == func.name && f.arity == func.arity)
            {
                return Err(FfiError::DuplicateFunction {
                    name: func.name.clone(),
                    arity: func.arity,
                });
            }
            let transform = resolve(func)?;
            let bridge = Bridge::new(func.name.clone(), transform)
                .with_capacity(func.capacity)
                .with_encoding(func.encoding);
            functions.push(NifFunction {
                name: func.name.clone(),
                arity: func.arity,
                symbol: func.symbol().to_string(),
                bridge,
            });
        }

        tracing::info!(module = %decl.module.name, functions = functions.len(), "module table built");
        Ok(Self {
            module: decl.module.name.clone(),
            functions,
        })
    }

    /// Build the table by resolving every declared symbol in one library.
    pub fn from_library(decl: &NifDeclaration, library: &Path) -> Result<Self> {
        Self::build(decl, |func| {
            // SAFETY: the declaration's prototype was checked against the
            // transform ABI during parsing; loading the library is the
            // caller's explicit request.
            let transform = unsafe {
                LibraryTransform::open(library, func.symbol(), func.capacity, func.reentrant)?
            };
            Ok(Arc::new(transform) as Arc<dyn Transform>)
        })
    }

    /// Build a table from in-process transforms keyed by symbol name.
    pub fn from_transforms(
        decl: &NifDeclaration,
        transforms: &[(&str, Arc<dyn Transform>)],
    ) -> Result<Self> {
        Self::build(decl, |func| {
            transforms
                .iter()
                .find(|(symbol, _)| *symbol == func.symbol())
                .map(|(_, t)| Arc::clone(t))
                .ok_or_else(|| FfiError::Unresolved {
                    name: func.name.clone(),
                })
        })
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Registered functions in declaration order.
    pub fn entries(&self) -> &[NifFunction] {
        &self.functions
    }

    pub fn lookup(&self, name: &str, arity: usize) -> Option<&NifFunction> {
        self.functions
            .iter()
            .find(|f| f.name == name && f.arity == arity)
    }

    /// Dispatch a call the way the runtime would.
    ///
    /// An unregistered `(name, arity)` raises `undef`.
    pub fn call(&self, name: &str, env: &mut Env, args: &[Term]) -> Term {
        match self.lookup(name, args.len()) {
            Some(func) => func.bridge.call(env, args),
            None => {
                tracing::debug!(module = %self.module, function = name, arity = args.len(), "undefined function");
                env.raise_exception(Term::atom("undef"))
            }
        }
    }
}
