use std::{
    cmp::Reverse,
    ffi::OsString,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime, Timelike};

use crate::{model::resolve_base_dir, Config, ConfigError};

const CONFIG_FILE: &str = "config.json";
const BACKUPS_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "config";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A saved copy of the analytics preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBackup {
    /// File name inside the backups directory; pass it to [`ConfigManager::restore`].
    pub name: String,
    pub created_at: NaiveDateTime,
    pub note: Option<String>,
}

impl ConfigBackup {
    fn file_name(created_at: NaiveDateTime, note: Option<&str>) -> String {
        let stamp = created_at.format(BACKUP_TIMESTAMP_FORMAT);
        match note {
            Some(note) => format!("{BACKUP_PREFIX}_{stamp}_{note}.json"),
            None => format!("{BACKUP_PREFIX}_{stamp}.json"),
        }
    }

    /// Recognises `config_<yyyymmdd>_<hhmmss>[_<note>].json`.
    fn parse(name: &str) -> Option<Self> {
        let stem = name
            .strip_prefix(BACKUP_PREFIX)?
            .strip_prefix('_')?
            .strip_suffix(".json")?;
        let (date, rest) = stem.split_once('_')?;
        let (time, note) = match rest.split_once('_') {
            Some((time, note)) => (time, Some(note.to_string())),
            None => (rest, None),
        };
        let created_at =
            NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S").ok()?;
        Some(Self {
            name: name.to_string(),
            created_at,
            note,
        })
    }
}

/// Reads and writes [`Config`] under a base directory and keeps
/// timestamped copies next to it.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// Lays out `<base>/config.json` and `<base>/backups/`.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let manager = Self::new(base.join(CONFIG_FILE), base.join(BACKUPS_DIR));
        fs::create_dir_all(&manager.backups_dir)?;
        Ok(manager)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_base_dir(resolve_base_dir())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Defaults when no file has been written yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        read_validated(&self.config_path)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        persist(config, &self.config_path)
    }

    /// Stores a copy stamped with the local time; the optional note is
    /// reduced to a lowercase slug.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<ConfigBackup, ConfigError> {
        let now = Local::now().naive_local();
        let created_at = now.with_nanosecond(0).unwrap_or(now);
        let note = note.and_then(slug);
        let name = ConfigBackup::file_name(created_at, note.as_deref());
        persist(config, &self.backups_dir.join(&name))?;
        Ok(ConfigBackup {
            name,
            created_at,
            note,
        })
    }

    /// Loads a backup by file name. The live file is left untouched.
    pub fn restore(&self, name: &str) -> Result<Config, ConfigError> {
        let path = self.backups_dir.join(name);
        if !path.is_file() {
            return Err(ConfigError::BackupNotFound(name.to_string()));
        }
        read_validated(&path)
    }

    /// Newest first. Files that do not follow the backup naming are skipped.
    pub fn list_backups(&self) -> Result<Vec<ConfigBackup>, ConfigError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut backups = fs::read_dir(&self.backups_dir)?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect::<Result<Vec<OsString>, _>>()?
            .into_iter()
            .filter_map(|name| name.to_str().and_then(ConfigBackup::parse))
            .collect::<Vec<_>>();
        backups.sort_by_key(|backup| Reverse(backup.created_at));
        Ok(backups)
    }
}

fn read_validated(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path)?;
    let config: Config =
        serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Serialises into `<path>.tmp` and renames over `path`.
fn persist(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    let mut writer = BufWriter::new(File::create(&staging)?);
    serde_json::to_writer_pretty(&mut writer, config)
        .map_err(|err| ConfigError::Serde(err.to_string()))?;
    writer.flush()?;
    drop(writer);
    fs::rename(&staging, path)?;
    Ok(())
}

fn slug(note: &str) -> Option<String> {
    let words: Vec<String> = note
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    (!words.is_empty()).then(|| words.join("-"))
}
