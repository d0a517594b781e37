//! `slugnif check` — validate a module declaration.

use std::path::Path;

use anyhow::Result;

use crate::manifest;

/// Validate the declaration and print a one-line summary per function.
pub fn run(path: &Path) -> Result<()> {
    let decl = manifest::load(path)?;
    println!(
        "{}: module '{}' ok ({} functions)",
        path.display(),
        decl.module.name,
        decl.functions.len()
    );
    for func in &decl.functions {
        let sig = func.signature()?;
        println!("  {}/{} -> {sig}", func.name, func.arity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_accepts_valid_declaration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nif.toml");
        std::fs::write(
            &path,
            r#"
[module]
name = "Elixir.Slug2"

[[functions]]
name = "do_slugify"
c-signature = "const char* do_slugify(char* x)"
"#,
        )
        .unwrap();
        run(&path).unwrap();
    }

    #[test]
    fn check_rejects_multibyte_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nif.toml");
        std::fs::write(
            &path,
            r#"
[module]
name = "Elixir.Slug2"

[[functions]]
name = "do_slugify"
c-signature = "const char* do_slugify(char* x)"
encoding = "utf8"
"#,
        )
        .unwrap();
        assert!(run(&path).is_err());
    }
}
