//! `slugnif table` — list the functions a module registers.

use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;
use slugnif_ffi::NifDeclaration;

use crate::manifest;

/// One row of the registration listing.
#[derive(Debug, Serialize)]
pub struct TableEntry {
    pub name: String,
    pub arity: usize,
    pub symbol: String,
    pub capacity: usize,
    pub encoding: String,
    pub reentrant: bool,
    pub c_signature: String,
}

/// Flatten a declaration into listing rows.
pub fn entries(decl: &NifDeclaration) -> Vec<TableEntry> {
    decl.functions
        .iter()
        .map(|f| TableEntry {
            name: f.name.clone(),
            arity: f.arity,
            symbol: f.symbol().to_string(),
            capacity: f.capacity,
            encoding: f.encoding.to_string(),
            reentrant: f.reentrant,
            c_signature: f.c_signature.clone(),
        })
        .collect()
}

pub fn run(path: &Path, format: Option<&str>) -> Result<()> {
    let decl = manifest::load(path)?;
    let rows = entries(&decl);

    match format.unwrap_or("human") {
        "human" => {
            println!("Module {}", decl.module.name);
            for row in &rows {
                println!(
                    "  {:<24} {:<24} cap={:<5} {}{}",
                    format!("{}/{}", row.name, row.arity),
                    row.symbol,
                    row.capacity,
                    row.encoding,
                    if row.reentrant { " reentrant" } else { "" }
                );
            }
        }
        "json" => {
            let out = serde_json::json!({
                "module": decl.module.name,
                "functions": rows,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        other => bail!("unknown format '{other}' (expected human or json)"),
    }
    Ok(())
}
