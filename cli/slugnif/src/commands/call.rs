//! `slugnif call` — invoke a registered function through a shared library.

use std::path::Path;

use anyhow::{bail, Context, Result};
use slugnif_core::{Env, Term};
use slugnif_ffi::ModuleTable;

use crate::manifest;

/// Load the library, build the module table, and call `function` once.
pub fn run(path: &Path, library: &Path, function: &str, text: &str) -> Result<()> {
    let decl = manifest::load(path)?;
    let table = ModuleTable::from_library(&decl, library)
        .with_context(|| format!("registering {} from {}", decl.module.name, library.display()))?;
    tracing::debug!(module = table.module(), functions = table.entries().len(), "module loaded");

    let out = dispatch(&table, function, text)?;
    println!("{out}");
    Ok(())
}

/// Marshal `text` as a charlist, dispatch it, and render the result.
pub fn dispatch(table: &ModuleTable, function: &str, text: &str) -> Result<String> {
    let mut env = Env::new();
    let ret = table.call(function, &mut env, &[Term::from_str_chars(text)]);
    if let Some(reason) = env.take_exception() {
        bail!("** exception error: {reason} in {}:{function}/1", table.module());
    }
    Ok(ret
        .to_latin1_string()
        .unwrap_or_else(|| ret.to_string()))
}
