use crate::error::{PlugseekError, Result};
use crate::plugin::Plugin;
use anyhow::Context;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the previous catalog before each overwrite.
pub const BACKUP_SUFFIX: &str = "bak";

/// Load and validate the persisted catalog.
///
/// Every entry must pass the record schema; the first failure aborts the load
/// with a structured error rather than handing malformed data to the index.
pub fn load(path: &Path) -> Result<Vec<Plugin>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    let plugins: Vec<Plugin> = serde_json::from_str(&content).map_err(|e| PlugseekError::Catalog {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    validate_all(&plugins)?;
    info!("loaded {} plugins from {}", plugins.len(), path.display());
    Ok(plugins)
}

/// Like [`load`], but a missing file is an empty catalog. Used by the
/// ingestion pipeline so the very first run can bootstrap from scrape data.
pub fn load_or_empty(path: &Path) -> Result<Vec<Plugin>> {
    if path.exists() {
        load(path)
    } else {
        warn!("catalog {} not found, starting empty", path.display());
        Ok(Vec::new())
    }
}

/// Persist the catalog in canonical order (ascending lowercase name).
///
/// Discipline: every entry is validated first and a single malformed record
/// aborts the write; the previous file is preserved as `<path>.bak`; the new
/// content goes to a temp file in the same directory and is renamed into
/// place, so a failed write never leaves a truncated catalog behind.
pub fn save(path: &Path, plugins: &[Plugin]) -> Result<()> {
    validate_all(plugins)?;

    let mut sorted: Vec<&Plugin> = plugins.iter().collect();
    sorted.sort_by_key(|p| p.key());
    let content = serde_json::to_string_pretty(&sorted)?;

    if path.exists() {
        let backup = backup_path(path);
        fs::copy(path, &backup)
            .with_context(|| format!("Failed to back up catalog to {}", backup.display()))?;
        info!("backed up previous catalog to {}", backup.display());
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)
        .with_context(|| format!("Failed to write catalog to {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move catalog into place at {}", path.display()))?;
    info!("wrote {} plugins to {}", plugins.len(), path.display());
    Ok(())
}

pub fn backup_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) => {
            let mut ext = ext.to_os_string();
            ext.push(".");
            ext.push(BACKUP_SUFFIX);
            path.with_extension(ext)
        }
        None => path.with_extension(BACKUP_SUFFIX),
    }
}

fn validate_all(plugins: &[Plugin]) -> Result<()> {
    for plugin in plugins {
        plugin.validate().map_err(|reason| PlugseekError::Schema {
            name: plugin.name.clone(),
            reason,
        })?;
    }
    Ok(())
}
