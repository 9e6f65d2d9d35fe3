use super::UnitIndex;
use crate::error::BuildError;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

/// File-name suffix of a persisted unit snapshot.
pub const SNAPSHOT_SUFFIX: &str = ".diffbind.json";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

///
/// Snapshot
///

#[derive(Deserialize, Serialize)]
struct Snapshot<T> {
    version: u32,

    #[serde(flatten)]
    index: T,
}

#[must_use]
pub fn snapshot_path(dir: &Path, unit: &str) -> PathBuf {
    dir.join(format!("{unit}{SNAPSHOT_SUFFIX}"))
}

/// Phase 1: write the unit's index to the shared directory. The file is
/// written in full under a temporary name, then renamed into place.
pub fn persist_snapshot(index: &UnitIndex, dir: &Path) -> Result<PathBuf, BuildError> {
    fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;

    let path = snapshot_path(dir, &index.unit);
    let json = serde_json::to_vec_pretty(&Snapshot {
        version: SNAPSHOT_VERSION,
        index,
    })
    .map_err(|source| BuildError::Snapshot {
        path: path.clone(),
        source,
    })?;

    let staging = path.with_extension("tmp");
    fs::write(&staging, json).map_err(|e| BuildError::io(&staging, e))?;
    fs::rename(&staging, &path).map_err(|e| BuildError::io(&path, e))?;

    debug!(
        unit = %index.unit,
        engines = index.engines.len(),
        dispatchers = index.dispatchers.len(),
        path = %path.display(),
        "persisted snapshot"
    );

    Ok(path)
}

/// Snapshot files in `dir`, sorted by file name. A missing directory holds
/// no snapshots.
pub fn snapshot_files(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(BuildError::io(dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BuildError::io(dir, e))?.path();
        let is_snapshot = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(SNAPSHOT_SUFFIX));

        if is_snapshot && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Read one snapshot. Any failure is returned as a message, since a bad
/// snapshot only degrades the merge.
pub fn read_snapshot(path: &Path) -> Result<UnitIndex, String> {
    let source = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let snapshot: Snapshot<UnitIndex> =
        serde_json::from_str(&source).map_err(|e| e.to_string())?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            snapshot.version
        ));
    }

    Ok(snapshot.index)
}
