//! pfd-storage-json
//!
//! JSON file backend for [`SnapshotStorage`].

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use pfd_core::{snapshot_warnings, CoreError, CoreResult, Snapshot, SnapshotStorage};
use tracing::{debug, warn};

const SNAPSHOT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// A previous snapshot kept next to the live file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotBackup {
    pub id: String,
    pub created_at: Option<NaiveDateTime>,
    pub path: PathBuf,
}

/// Snapshot persisted as one pretty-printed JSON document. Every save first
/// copies the current file into the backups directory.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStorage {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonSnapshotStorage {
    pub fn new(path: PathBuf) -> Self {
        let backups_dir = path
            .parent()
            .map(|parent| parent.join("backups"))
            .unwrap_or_else(|| PathBuf::from("backups"));
        Self::with_backups(path, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_backups(path: PathBuf, backups_dir: PathBuf, retention: usize) -> Self {
        Self {
            path,
            backups_dir,
            retention: retention.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Newest first.
    pub fn list_backups(&self) -> CoreResult<Vec<SnapshotBackup>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                backups.push(SnapshotBackup {
                    id: name.to_string(),
                    created_at: parse_backup_timestamp(name),
                    path: path.clone(),
                });
            }
        }
        backups.sort_by_key(|backup| Reverse((backup.created_at, backup_counter(&backup.id))));
        Ok(backups)
    }

    pub fn restore_backup(&self, backup: &SnapshotBackup) -> CoreResult<Snapshot> {
        if !backup.path.is_file() {
            return Err(CoreError::Storage(format!("backup `{}` not found", backup.id)));
        }
        let snapshot = read_snapshot(&backup.path)?;
        self.save(&snapshot)?;
        Ok(snapshot)
    }

    fn backup_existing(&self) -> CoreResult<()> {
        if !self.path.is_file() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let stem = self
            .path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("snapshot");
        let timestamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let target = self.free_backup_path(stem, &timestamp);
        fs::copy(&self.path, target)?;
        self.prune_backups()
    }

    /// `<stem>_<date>_<time+millis>.json`, with `-<n>` appended while the
    /// name is already taken.
    fn free_backup_path(&self, stem: &str, timestamp: &str) -> PathBuf {
        let mut candidate = self
            .backups_dir
            .join(format!("{stem}_{timestamp}.{SNAPSHOT_EXTENSION}"));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self
                .backups_dir
                .join(format!("{stem}_{timestamp}-{counter}.{SNAPSHOT_EXTENSION}"));
            counter += 1;
        }
        candidate
    }

    fn prune_backups(&self) -> CoreResult<()> {
        for stale in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                warn!(backup = %stale.id, error = %err, "failed to prune snapshot backup");
            }
        }
        Ok(())
    }
}

impl SnapshotStorage for JsonSnapshotStorage {
    fn load(&self) -> CoreResult<Snapshot> {
        let snapshot = read_snapshot(&self.path)?;
        debug!(
            path = %self.path.display(),
            transactions = snapshot.transactions.len(),
            categories = snapshot.categories.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &Snapshot) -> CoreResult<()> {
        self.backup_existing()?;
        write_snapshot(snapshot, &self.path)?;
        debug!(path = %self.path.display(), "saved snapshot");
        Ok(())
    }

    fn export_to_path(&self, snapshot: &Snapshot, path: &Path) -> CoreResult<()> {
        write_snapshot(snapshot, path)
    }

    fn import_from_path(&self, path: &Path) -> CoreResult<Snapshot> {
        read_snapshot(path)
    }
}

/// Reads, upgrades and sanity-checks a snapshot file.
pub fn read_snapshot(path: &Path) -> CoreResult<Snapshot> {
    let data = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => {
            CoreError::Storage(format!("snapshot not found at {}", path.display()))
        }
        _ => CoreError::Io(err),
    })?;
    let mut snapshot: Snapshot =
        serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    snapshot.migrate()?;
    let warnings = snapshot_warnings(&snapshot);
    if !warnings.is_empty() {
        warn!(
            path = %path.display(),
            count = warnings.len(),
            "snapshot contains dangling references"
        );
    }
    Ok(snapshot)
}

/// Writes through a temporary sibling file and renames it into place.
pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(snapshot).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn parse_backup_timestamp(name: &str) -> Option<NaiveDateTime> {
    let trimmed = name.strip_suffix(SNAPSHOT_EXTENSION)?.strip_suffix('.')?;
    let mut segments = trimmed.rsplitn(3, '_');
    let time = segments.next()?;
    let date = segments.next()?;
    let time = time.split_once('-').map_or(time, |(time, _)| time);
    if !is_digits(date, 8) {
        return None;
    }
    let (clock, millis) = match time.len() {
        6 => (time, "000"),
        9 => time.split_at(6),
        _ => return None,
    };
    if !is_digits(clock, 6) || !is_digits(millis, 3) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{clock}.{millis}"), "%Y%m%d%H%M%S%.3f").ok()
}

/// The `-<n>` disambiguator of a backup name; 0 when absent.
fn backup_counter(name: &str) -> u32 {
    name.strip_suffix(SNAPSHOT_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .and_then(|stem| stem.rsplit_once('-'))
        .and_then(|(_, counter)| counter.parse().ok())
        .unwrap_or(0)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
