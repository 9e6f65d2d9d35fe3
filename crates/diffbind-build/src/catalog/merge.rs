use super::{UnitIndex, read_snapshot, snapshot_files};
use crate::{
    config::CollisionPolicy,
    error::{BuildError, EntryKind, MergeWarning},
};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

///
/// CatalogEntry
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CatalogEntry {
    pub reference: String,

    /// Unit that registered the surviving reference.
    pub unit: String,
}

///
/// MergedCatalog
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MergedCatalog {
    pub engines: BTreeMap<String, CatalogEntry>,
    pub dispatchers: BTreeMap<String, CatalogEntry>,

    /// Instructor key to model key.
    pub instructors: BTreeMap<String, CatalogEntry>,
}

impl MergedCatalog {
    /// Union one unit's index into the catalog. Identical re-registrations
    /// are silent; differing ones are settled by `policy` and reported.
    pub fn union(
        &mut self,
        index: &UnitIndex,
        policy: CollisionPolicy,
        warnings: &mut Vec<MergeWarning>,
    ) {
        let unit = index.unit.as_str();

        union_map(&mut self.engines, EntryKind::Engine, unit, &index.engines, policy, warnings);
        union_map(
            &mut self.dispatchers,
            EntryKind::Dispatcher,
            unit,
            &index.dispatchers,
            policy,
            warnings,
        );
        union_map(
            &mut self.instructors,
            EntryKind::Instructor,
            unit,
            &index.instructors,
            policy,
            warnings,
        );
    }

    /// Key to reference view of the engines, ignoring origin units.
    #[must_use]
    pub fn engine_references(&self) -> BTreeMap<&str, &str> {
        references(&self.engines)
    }

    /// Key to reference view of the dispatchers, ignoring origin units.
    #[must_use]
    pub fn dispatcher_references(&self) -> BTreeMap<&str, &str> {
        references(&self.dispatchers)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty() && self.dispatchers.is_empty()
    }
}

fn references(map: &BTreeMap<String, CatalogEntry>) -> BTreeMap<&str, &str> {
    map.iter()
        .map(|(k, e)| (k.as_str(), e.reference.as_str()))
        .collect()
}

fn union_map(
    target: &mut BTreeMap<String, CatalogEntry>,
    kind: EntryKind,
    unit: &str,
    source: &BTreeMap<String, String>,
    policy: CollisionPolicy,
    warnings: &mut Vec<MergeWarning>,
) {
    for (key, reference) in source {
        let incoming = CatalogEntry {
            reference: reference.clone(),
            unit: unit.to_string(),
        };

        let Some(existing) = target.get_mut(key) else {
            target.insert(key.clone(), incoming);
            continue;
        };

        if existing.reference == incoming.reference {
            continue;
        }

        let (kept, dropped) = match policy {
            CollisionPolicy::FirstWins => (existing.clone(), incoming),
            CollisionPolicy::LastWins => {
                let previous = std::mem::replace(existing, incoming.clone());
                (incoming, previous)
            }
        };

        warnings.push(MergeWarning::Collision {
            kind,
            key: key.clone(),
            kept: kept.reference,
            kept_unit: kept.unit,
            dropped: dropped.reference,
            dropped_unit: dropped.unit,
        });
    }
}

///
/// MergeReport
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MergeReport {
    /// Units merged, local unit first, then snapshots in file-name order.
    pub units: Vec<String>,

    /// Snapshot files consumed (and deleted), including malformed ones.
    pub consumed: Vec<PathBuf>,
    pub warnings: Vec<MergeWarning>,
}

/// Phase 2: union the local index with every snapshot in `dir`, then delete
/// the snapshots. A malformed snapshot is reported, deleted, and skipped.
pub fn merge_snapshots(
    dir: &Path,
    local: &UnitIndex,
    policy: CollisionPolicy,
) -> Result<(MergedCatalog, MergeReport), BuildError> {
    let mut catalog = MergedCatalog::default();
    let mut report = MergeReport::default();

    catalog.union(local, policy, &mut report.warnings);
    report.units.push(local.unit.clone());

    for path in snapshot_files(dir)? {
        match read_snapshot(&path) {
            Ok(index) => {
                catalog.union(&index, policy, &mut report.warnings);
                report.units.push(index.unit);
            }
            Err(message) => report.warnings.push(MergeWarning::MalformedSnapshot {
                path: path.clone(),
                message,
            }),
        }

        report.consumed.push(path);
    }

    remove_consumed(&report.consumed)?;

    for warning in &report.warnings {
        warn!("{warning}");
    }
    info!(
        units = report.units.len(),
        engines = catalog.engines.len(),
        dispatchers = catalog.dispatchers.len(),
        warnings = report.warnings.len(),
        "merged catalog"
    );

    Ok((catalog, report))
}

/// One-shot merge: nothing consumed may survive into the next build.
/// Every file is attempted; the first failure is returned afterwards.
pub(crate) fn remove_consumed(paths: &[PathBuf]) -> Result<(), BuildError> {
    let mut first_err = None;

    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), "failed to remove consumed snapshot: {e}");
            first_err.get_or_insert_with(|| BuildError::io(path, e));
        }
    }

    first_err.map_or(Ok(()), Err)
}
