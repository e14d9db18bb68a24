// src/inventory.rs

//! Local mod inventory
//!
//! Scans the mods directory for archives, groups descriptors by mod id
//! (case-insensitive), and collapses each group to a single authoritative
//! copy: the highest version wins, everything else is queued for deletion.
//! Duplicate removal runs before any remote lookup so a later download never
//! races a stale copy.

use crate::descriptor::{self, ModDescriptor};
use crate::error::Result;
use crate::version;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// The deduplicated view of a mods directory
#[derive(Debug)]
pub struct Inventory {
    /// One descriptor per mod id, the highest local version of each
    pub retained: Vec<ModDescriptor>,
    /// Superseded copies scheduled for deletion
    pub duplicates: Vec<ModDescriptor>,
}

/// Scan a directory for mod archives.
///
/// Reads only regular `.zip` files directly inside `dir` (non-recursive);
/// archives without a parseable descriptor are skipped silently. Entries are
/// visited in file-name order so duplicate tie-breaking is stable.
pub fn scan(dir: &Path) -> Result<Vec<ModDescriptor>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_zip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if is_zip {
            paths.push(path);
        }
    }
    paths.sort();

    let mods: Vec<ModDescriptor> = paths
        .iter()
        .filter_map(|path| descriptor::read_descriptor(path))
        .collect();

    debug!(
        "Scanned {}: {} archives, {} mods",
        dir.display(),
        paths.len(),
        mods.len()
    );
    Ok(mods)
}

impl Inventory {
    /// Group descriptors by mod id and pick the copy to keep per group.
    ///
    /// Within a group the maximum version is retained; on a version tie the
    /// last descriptor in enumeration order wins (implementation-defined).
    pub fn build(mods: Vec<ModDescriptor>) -> Self {
        // Group while preserving first-seen order of ids
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<ModDescriptor>> = HashMap::new();
        for descriptor in mods {
            let key = descriptor.id.to_lowercase();
            if !groups.contains_key(&key) {
                order.push(key.clone());
            }
            groups.entry(key).or_default().push(descriptor);
        }

        let mut retained = Vec::new();
        let mut duplicates = Vec::new();
        for key in order {
            let group = groups.remove(&key).unwrap_or_default();

            let mut best: Option<ModDescriptor> = None;
            let mut rest = Vec::new();
            for candidate in group {
                match best.take() {
                    None => best = Some(candidate),
                    Some(current) => {
                        if version::compare(&candidate.version, &current.version)
                            != Ordering::Less
                        {
                            rest.push(current);
                            best = Some(candidate);
                        } else {
                            rest.push(candidate);
                            best = Some(current);
                        }
                    }
                }
            }

            if let Some(keep) = best {
                retained.push(keep);
            }
            duplicates.extend(rest);
        }

        Self {
            retained,
            duplicates,
        }
    }

    /// Delete the superseded duplicate archives.
    ///
    /// Failures are logged and skipped, never retried: the duplicate stays
    /// discoverable, so the next run reattempts naturally. Returns the number
    /// of archives actually removed.
    pub fn remove_duplicates(&self) -> usize {
        let mut removed = 0;
        for duplicate in &self.duplicates {
            match fs::remove_file(&duplicate.path) {
                Ok(()) => {
                    info!(
                        "Removed duplicate {} {} ({})",
                        duplicate.id,
                        duplicate.version,
                        duplicate.path.display()
                    );
                    removed += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to remove duplicate {}: {}",
                        duplicate.path.display(),
                        e
                    );
                }
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn descriptor(id: &str, version: &str, path: &str) -> ModDescriptor {
        ModDescriptor {
            id: id.to_string(),
            version: version.to_string(),
            name: id.to_string(),
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_build_retains_highest_version() {
        let inventory = Inventory::build(vec![
            descriptor("foo", "1.0", "a.zip"),
            descriptor("foo", "1.2", "b.zip"),
            descriptor("foo", "1.1", "c.zip"),
        ]);

        assert_eq!(inventory.retained.len(), 1);
        assert_eq!(inventory.retained[0].version, "1.2");
        assert_eq!(inventory.duplicates.len(), 2);
    }

    #[test]
    fn test_build_groups_case_insensitively() {
        let inventory = Inventory::build(vec![
            descriptor("Foo", "1.0", "a.zip"),
            descriptor("foo", "2.0", "b.zip"),
        ]);

        assert_eq!(inventory.retained.len(), 1);
        assert_eq!(inventory.retained[0].version, "2.0");
        assert_eq!(inventory.duplicates.len(), 1);
    }

    #[test]
    fn test_build_version_tie_keeps_last() {
        let inventory = Inventory::build(vec![
            descriptor("foo", "1.0", "first.zip"),
            descriptor("foo", "1.0", "second.zip"),
        ]);

        assert_eq!(inventory.retained[0].path, PathBuf::from("second.zip"));
        assert_eq!(inventory.duplicates[0].path, PathBuf::from("first.zip"));
    }

    #[test]
    fn test_build_singletons_have_no_duplicates() {
        let inventory = Inventory::build(vec![
            descriptor("foo", "1.0", "foo.zip"),
            descriptor("bar", "2.0", "bar.zip"),
        ]);

        assert_eq!(inventory.retained.len(), 2);
        assert!(inventory.duplicates.is_empty());
    }

    #[test]
    fn test_build_preserves_enumeration_order() {
        let inventory = Inventory::build(vec![
            descriptor("zeta", "1.0", "z.zip"),
            descriptor("alpha", "1.0", "a.zip"),
        ]);

        assert_eq!(inventory.retained[0].id, "zeta");
        assert_eq!(inventory.retained[1].id, "alpha");
    }

    #[test]
    fn test_scan_skips_non_archives_and_non_mods() {
        use std::io::Write;
        use zip::write::FileOptions;

        let dir = tempfile::tempdir().unwrap();

        // A valid mod archive
        let mod_path = dir.path().join("real.zip");
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&mod_path).unwrap());
        writer
            .start_file("modinfo.json", FileOptions::default())
            .unwrap();
        writer
            .write_all(br#"{"modid": "real", "version": "1.0.0"}"#)
            .unwrap();
        writer.finish().unwrap();

        // A zip with no modinfo and a non-zip file
        let plain_path = dir.path().join("plain.zip");
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&plain_path).unwrap());
        writer
            .start_file("data.txt", FileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        writer.finish().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

        let mods = scan(dir.path()).unwrap();
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].id, "real");
    }

    #[test]
    fn test_remove_duplicates_deletes_files() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("foo-1.2.zip");
        let stale = dir.path().join("foo-1.0.zip");
        std::fs::write(&keep, b"keep").unwrap();
        std::fs::write(&stale, b"stale").unwrap();

        let inventory = Inventory {
            retained: vec![descriptor("foo", "1.2", keep.to_str().unwrap())],
            duplicates: vec![descriptor("foo", "1.0", stale.to_str().unwrap())],
        };

        assert_eq!(inventory.remove_duplicates(), 1);
        assert!(keep.exists());
        assert!(!stale.exists());
    }

    #[test]
    fn test_remove_duplicates_tolerates_missing_file() {
        let inventory = Inventory {
            retained: vec![],
            duplicates: vec![descriptor("foo", "1.0", "/nonexistent/foo.zip")],
        };

        assert_eq!(inventory.remove_duplicates(), 0);
    }
}
