//! Native module declaration file (`nif.toml`) parsing.
//!
//! A declaration names the module the runtime loads and lists every
//! function it registers, together with the C prototype of the external
//! routine behind it and the marshaling parameters for its argument.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use slugnif_core::{Encoding, DEFAULT_CAPACITY, MAX_CAPACITY};

use crate::bridge::STRING_ARITY;
use crate::csig::{is_c_identifier, CSignature};
use crate::error::{FfiError, Result};

/// A complete module declaration parsed from a `nif.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NifDeclaration {
    /// The module the runtime binds the functions to.
    pub module: ModuleInfo,
    /// Registered functions, in declaration order.
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

/// Module metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Fully qualified module name (e.g., "Elixir.Slug2").
    pub name: String,
}

/// A single registered function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FunctionDecl {
    /// Public name callers use.
    pub name: String,
    /// External symbol to call. Defaults to `name`.
    #[serde(default)]
    pub symbol: Option<String>,
    /// C prototype of the external routine.
    #[serde(alias = "c_signature")]
    pub c_signature: String,
    #[serde(default = "default_arity")]
    pub arity: usize,
    /// Input buffer size in bytes, terminator included.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub encoding: Encoding,
    /// Whether the routine may be entered concurrently. Non-reentrant
    /// routines are called one at a time.
    #[serde(default)]
    pub reentrant: bool,
}

fn default_arity() -> usize {
    STRING_ARITY
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl FunctionDecl {
    /// The external symbol this function resolves to.
    pub fn symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.name)
    }

    /// Parse and check the declared C prototype.
    pub fn signature(&self) -> Result<CSignature> {
        let sig = CSignature::parse(&self.c_signature).map_err(|e| FfiError::InvalidCSignature {
            detail: format!("{}: {e}", self.name),
        })?;
        sig.check_string_transform()?;
        Ok(sig)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(invalid("function name is required".to_string()));
        }
        if self.arity != STRING_ARITY {
            return Err(invalid(format!(
                "'{}' declares arity {}; only arity {STRING_ARITY} is supported",
                self.name, self.arity
            )));
        }
        if !(2..=MAX_CAPACITY).contains(&self.capacity) {
            return Err(invalid(format!(
                "'{}' capacity must be between 2 and {MAX_CAPACITY}, got {}",
                self.name, self.capacity
            )));
        }
        if !is_c_identifier(self.symbol()) {
            return Err(invalid(format!(
                "'{}' symbol '{}' is not a valid C identifier",
                self.name,
                self.symbol()
            )));
        }

        let sig = self.signature()?;
        if sig.name != self.symbol() {
            return Err(invalid(format!(
                "'{}' prototype names '{}' but the symbol is '{}'",
                self.name,
                sig.name,
                self.symbol()
            )));
        }
        Ok(())
    }
}

impl NifDeclaration {
    /// Parse and validate a declaration from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let decl: NifDeclaration = toml::from_str(input).map_err(FfiError::Toml)?;
        decl.validate()?;
        Ok(decl)
    }

    /// Parse a declaration from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Look up a function by public name and arity.
    pub fn function(&self, name: &str, arity: usize) -> Option<&FunctionDecl> {
        self.functions
            .iter()
            .find(|f| f.name == name && f.arity == arity)
    }

    fn validate(&self) -> Result<()> {
        if self.module.name.is_empty() {
            return Err(invalid("module.name is required".to_string()));
        }
        if self.functions.is_empty() {
            return Err(invalid(format!(
                "module '{}' registers no functions",
                self.module.name
            )));
        }

        let mut seen = HashSet::new();
        for func in &self.functions {
            func.validate()?;
            if !seen.insert((func.name.as_str(), func.arity)) {
                return Err(FfiError::DuplicateFunction {
                    name: func.name.clone(),
                    arity: func.arity,
                });
            }
        }
        Ok(())
    }
}

fn invalid(detail: String) -> FfiError {
    FfiError::InvalidDeclaration { detail }
}
