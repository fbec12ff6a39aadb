//! Collection description loading.

use std::path::Path;

use anyhow::{bail, Context, Result};
use csapi_protocol::CollectionDescriptor;

/// Load a collection description from a JSON or YAML file.
///
/// The format is chosen by extension: `.yaml`/`.yml` is YAML, anything
/// else is read as JSON.
pub fn load_collection(path: &Path) -> Result<CollectionDescriptor> {
    if !path.exists() {
        bail!("Collection description {:?} does not exist", path);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {:?}", path))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let collection: CollectionDescriptor = if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse: {:?}", path))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse: {:?}", path))?
    };

    tracing::info!(
        "Loaded collection '{}' from {:?} ({} parameters, {} CRS)",
        collection.id,
        path,
        collection.parameter_names.len(),
        collection.crs.len()
    );

    Ok(collection)
}
