// src/reconcile.rs

//! Reconciliation engine
//!
//! Drives one update run: scan and deduplicate the local inventory, then for
//! each retained mod look up the remote catalog, compare versions, and
//! download-and-replace when the catalog has something newer. Each mod
//! reaches exactly one terminal status; a failure in one mod never aborts
//! the rest of the run.
//!
//! Two orderings are protocol invariants, not incidental:
//! - duplicate archives are deleted before any remote lookup starts
//! - a new archive is renamed into place before the old one is deleted, so
//!   an interrupted run never leaves a mod without a valid archive

use crate::catalog::{self, CatalogClient};
use crate::descriptor::ModDescriptor;
use crate::error::{Error, Result};
use crate::inventory::{self, Inventory};
use crate::report::Reporter;
use crate::version;
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Suffix marking an in-flight download; never a valid mod archive
const PARTIAL_SUFFIX: &str = ".part";

/// Terminal outcome of reconciling one mod
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Not yet reconciled
    Pending,
    /// The catalog has no entry for this mod
    NotFound,
    /// The local version is current (or newer than the catalog's)
    UpToDate,
    /// A newer release exists but carries no usable download reference
    NoFile,
    /// Replaced with the given remote version
    Updated(String),
    /// Reconciliation failed; the local archive is untouched
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "..."),
            Status::NotFound => write!(f, "not found"),
            Status::UpToDate => write!(f, "up-to-date"),
            Status::NoFile => write!(f, "no file"),
            Status::Updated(version) => write!(f, "updated to {version}"),
            Status::Error(_) => write!(f, "error"),
        }
    }
}

/// Per-mod outcome row, assigned exactly once per run
#[derive(Debug, Clone)]
pub struct ReconcileRecord {
    pub id: String,
    pub version: String,
    pub name: String,
    pub status: Status,
}

/// Aggregate counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Mods replaced with a newer release
    pub updated: usize,
    /// Duplicate archives deleted during inventory cleanup
    pub removed: usize,
    /// Mods left alone (not found, up to date, no file, or errored)
    pub skipped: usize,
}

/// Run one reconciliation pass over `mods_path`.
///
/// Fails fast when the directory does not exist; every other failure is
/// contained at the per-mod boundary and recorded as an `error` status.
pub fn run(
    mods_path: &Path,
    client: &CatalogClient,
    reporter: &mut dyn Reporter,
) -> Result<Summary> {
    if !mods_path.is_dir() {
        return Err(Error::PathNotFound(mods_path.display().to_string()));
    }

    let mods = inventory::scan(mods_path)?;
    if mods.is_empty() {
        reporter.note("No mods found in mods folder.");
        return Ok(Summary::default());
    }

    let inventory = Inventory::build(mods);
    let removed = inventory.remove_duplicates();

    let mut records: Vec<ReconcileRecord> = inventory
        .retained
        .iter()
        .map(|descriptor| ReconcileRecord {
            id: descriptor.id.clone(),
            version: descriptor.version.clone(),
            name: descriptor.name.clone(),
            status: Status::Pending,
        })
        .collect();
    reporter.table("Local Mods", &records);

    let mut summary = Summary {
        removed,
        ..Summary::default()
    };

    for (descriptor, record) in inventory.retained.iter().zip(records.iter_mut()) {
        let status = match reconcile_one(client, mods_path, descriptor, reporter) {
            Ok(status) => status,
            Err(e) => {
                warn!("Reconciliation of {} failed: {}", descriptor.id, e);
                reporter.note(&format!("Error with {}: {}", descriptor.id, e));
                Status::Error(e.to_string())
            }
        };

        match &status {
            Status::Updated(_) => summary.updated += 1,
            _ => summary.skipped += 1,
        }
        record.status = status;
    }

    reporter.table("Result", &records);
    reporter.summary(&summary);
    Ok(summary)
}

/// Reconcile a single mod; decision rules apply in order, first match wins
fn reconcile_one(
    client: &CatalogClient,
    mods_path: &Path,
    descriptor: &ModDescriptor,
    reporter: &mut dyn Reporter,
) -> Result<Status> {
    let Some(entry) = client.find_mod(&descriptor.id)? else {
        return Ok(Status::NotFound);
    };

    let release = catalog::pick_latest_release(&entry);
    let remote_version = release
        .as_ref()
        .and_then(|r| r.version.clone())
        .or_else(|| entry.version.clone())
        .unwrap_or_else(|| "0.0.0".to_string());

    if version::compare(&remote_version, &descriptor.version) != Ordering::Greater {
        return Ok(Status::UpToDate);
    }

    let url = release
        .as_ref()
        .and_then(|r| catalog::resolve_download_url(client.api_base(), r));
    let Some(url) = url else {
        return Ok(Status::NoFile);
    };

    reporter.note(&format!("Downloading {} {}", descriptor.id, remote_version));
    replace_archive(client, mods_path, descriptor, &url, &remote_version, reporter)?;

    Ok(Status::Updated(remote_version))
}

/// Atomic download-and-replace.
///
/// Streams to a `.part` file next to the final name, renames it into place
/// on success, and only then deletes the superseded archive. Any failure
/// cleans up the partial file and leaves the old archive untouched.
fn replace_archive(
    client: &CatalogClient,
    mods_path: &Path,
    descriptor: &ModDescriptor,
    url: &str,
    remote_version: &str,
    reporter: &mut dyn Reporter,
) -> Result<()> {
    let file_name = format!("{}-{}.zip", descriptor.id, remote_version);
    let final_path = mods_path.join(&file_name);
    let temp_path = mods_path.join(format!("{file_name}{PARTIAL_SUFFIX}"));

    let label = descriptor.id.clone();
    let outcome = client.download(url, &temp_path, |received, total| {
        reporter.progress(&label, received, total)
    });
    if let Err(e) = outcome {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    // Same-volume rename: the final name appears fully written or not at all
    if let Err(e) = fs::rename(&temp_path, &final_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    // The old archive may already carry the new name; deleting it then would
    // destroy the file we just put in place
    if descriptor.path != final_path {
        fs::remove_file(&descriptor.path)?;
    }

    info!(
        "Updated {} {} -> {}",
        descriptor.id, descriptor.version, remote_version
    );
    Ok(())
}
