// src/descriptor.rs

//! Mod archive metadata extraction
//!
//! Every mod archive carries a `modinfo.json` at its root. Reading is
//! deliberately forgiving: a corrupt archive, missing or malformed
//! `modinfo.json`, or a missing `modid` field all yield `None` rather than an
//! error, since a mods directory routinely contains zips that are not mods.

use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata file expected at the root of each mod archive
const MODINFO_NAME: &str = "modinfo.json";

/// Normalized metadata extracted from one local mod archive
#[derive(Debug, Clone)]
pub struct ModDescriptor {
    /// Mod identifier, unique across the collection (case-insensitive)
    pub id: String,
    /// Version string, arbitrary format
    pub version: String,
    /// Human-readable name, informational only
    pub name: String,
    /// The archive this descriptor was read from
    pub path: PathBuf,
}

/// Read the descriptor embedded in a mod archive.
///
/// Returns `None` for anything that is not a well-formed mod archive; the
/// caller treats such files as invisible. Version defaults to `"0.0.0"` and
/// the display name defaults to the mod id when the fields are absent.
pub fn read_descriptor(path: &Path) -> Option<ModDescriptor> {
    let file = File::open(path).ok()?;
    let mut archive = zip::ZipArchive::new(file).ok()?;

    let mut raw = String::new();
    archive
        .by_name(MODINFO_NAME)
        .ok()?
        .read_to_string(&mut raw)
        .ok()?;

    let info: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            debug!("Skipping {}: invalid modinfo.json ({})", path.display(), e);
            return None;
        }
    };

    let id = field_string(&info, "modid")?;

    let version = field_string(&info, "version").unwrap_or_else(|| "0.0.0".to_string());
    let name = field_string(&info, "name").unwrap_or_else(|| id.clone());

    Some(ModDescriptor {
        id,
        version,
        name,
        path: path.to_path_buf(),
    })
}

/// Stringify a scalar modinfo field; `None` for null, missing, or empty values
fn field_string(info: &Value, key: &str) -> Option<String> {
    match info.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
