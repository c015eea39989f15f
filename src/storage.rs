//! JSON file persistence for the catalog and user profiles
//!
//! The only place the engine touches the filesystem:
//! - Pretty-printed JSON records
//! - Atomic saves through a sibling temporary file
//! - Load errors that name the offending record entry

use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::recommendation::metrics::PerformanceTimer;
use crate::recommendation::{CatalogStore, DuplicatePolicy, MediaKind, ProfileRegistry};

const SLOW_IO_MS: u64 = 500;

/// Load a catalog from a JSON file
#[instrument(skip(policy))]
pub fn load_catalog(path: &Path, policy: DuplicatePolicy) -> Result<CatalogStore> {
    let timer = PerformanceTimer::new("load_catalog");
    let record = read_json(path)
        .map_err(|e| as_load_error(e, |entry, msg| Error::catalog_load(entry, msg)))?;
    let catalog = CatalogStore::from_record(&record, policy)?;

    info!(
        "Loaded catalog from {}: {} movies, {} music, {} books, {} games",
        path.display(),
        catalog.count(MediaKind::Movie),
        catalog.count(MediaKind::Music),
        catalog.count(MediaKind::Book),
        catalog.count(MediaKind::Game)
    );
    timer.log_if_slow(SLOW_IO_MS);
    Ok(catalog)
}

/// Save a catalog to a JSON file
#[instrument(skip(catalog))]
pub fn save_catalog(path: &Path, catalog: &CatalogStore) -> Result<()> {
    write_json(path, &catalog.to_record()?)?;
    info!("Saved {} catalog items to {}", catalog.len(), path.display());
    Ok(())
}

/// Load every user profile from a JSON file
#[instrument]
pub fn load_profiles(path: &Path) -> Result<ProfileRegistry> {
    let record = read_json(path)
        .map_err(|e| as_load_error(e, |entry, msg| Error::profile_load(entry, msg)))?;
    let registry = ProfileRegistry::from_record(&record)?;
    info!("Loaded {} profiles from {}", registry.len(), path.display());
    Ok(registry)
}

/// Save every user profile to a JSON file
#[instrument(skip(registry))]
pub fn save_profiles(path: &Path, registry: &ProfileRegistry) -> Result<()> {
    write_json(path, &registry.to_record())?;
    info!("Saved {} profiles to {}", registry.len(), path.display());
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Malformed JSON is reported against the record root
fn as_load_error(err: Error, make: fn(&'static str, String) -> Error) -> Error {
    match err {
        Error::Json(e) => make("$", e.to_string()),
        other => other,
    }
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.write_all(b"\n").map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
