//! Patch loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load a patch from a YAML file
pub fn load_config(path: &Path) -> Result<Patch> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read patch: {:?}", path))?;
    let patch: Patch = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse patch: {:?}", path))?;
    patch.validate()?;
    tracing::debug!(
        "Loaded {:?}: {} variant, {} patched inputs",
        path,
        patch.variant.name(),
        patch.inputs.patched().len()
    );
    Ok(patch)
}
