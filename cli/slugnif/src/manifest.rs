//! Locating and loading the `nif.toml` declaration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use slugnif_ffi::NifDeclaration;

/// Default declaration file name.
pub const MANIFEST_NAME: &str = "nif.toml";

/// Search `start` and its ancestors for a declaration file.
pub fn find(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_NAME))
        .find(|candidate| candidate.is_file())
}

/// Resolve an explicit `--manifest` path, or search upward from `cwd`.
pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                bail!("declaration file not found: {}", path.display());
            }
            Ok(path)
        }
        None => match find(cwd) {
            Some(path) => Ok(path),
            None => bail!("no {MANIFEST_NAME} found in {} or any parent", cwd.display()),
        },
    }
}

/// Load and validate a declaration.
pub fn load(path: &Path) -> Result<NifDeclaration> {
    NifDeclaration::load(path).with_context(|| format!("loading {}", path.display()))
}
