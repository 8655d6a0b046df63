//! Output formatting and persistence for the export document.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::schema::TransitSchema;

/// Writes the export document as JSON to `path`.
pub fn write_schema(path: &Path, schema: &TransitSchema) -> Result<()> {
    debug!(path = %path.display(), "writing export document");
    let raw = serde_json::to_string(schema)?;
    fs::write(path, raw).with_context(|| format!("writing output file {}", path.display()))?;
    info!(
        path = %path.display(),
        stops = schema.stops.len(),
        networks = schema.networks.len(),
        "export written"
    );
    Ok(())
}

/// Logs the export document as pretty-printed JSON.
pub fn print_json(schema: &TransitSchema) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(schema)?);
    Ok(())
}
