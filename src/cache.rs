//! Per-city cache of previously computed output.
//!
//! The cache file maps city names to their per-city export from an earlier
//! run. It is loaded at startup and written back at the end; entries for
//! cities outside the current run are surfaced to the assembler as a merge
//! point, but incremental reuse is not implemented yet and every run
//! recomputes all of its cities.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use crate::model::City;

#[derive(Clone, Debug, Default)]
pub struct CityCache {
    entries: HashMap<String, Value>,
}

impl CityCache {
    /// Loads a cache document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading cache file {}", path.display()))?;
        let entries: HashMap<String, Value> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing cache file {}", path.display()))?;
        info!(path = %path.display(), cities = entries.len(), "loaded city cache");
        Ok(Self { entries })
    }

    /// Writes the cache document back to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string(&self.entries)?;
        fs::write(path, raw).with_context(|| format!("writing cache file {}", path.display()))?;
        Ok(())
    }

    /// Names of cached cities that are not part of the current run. These
    /// are the candidates for being merged into the output.
    pub fn unprocessed<'a>(&'a self, current: &[City]) -> impl Iterator<Item = &'a str> {
        let names: Vec<&str> = current.iter().map(|c| c.name.as_str()).collect();
        self.entries
            .keys()
            .map(String::as_str)
            .filter(move |name| !names.contains(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
