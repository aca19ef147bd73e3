use pfd_config::{Config, ConfigError, ConfigManager};
use pfd_core::MissingCategoryPolicy;
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.base_currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert_eq!(cfg.top_transactions_limit, 5);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(manager.backups_dir().is_dir());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let cfg = Config {
        base_currency: "GBP".to_string(),
        locale: "en-GB".to_string(),
        missing_category_policy: MissingCategoryPolicy::Uncategorized,
        ..Config::default()
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn invalid_config_is_not_written() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    let cfg = Config {
        trend_months: 0,
        ..Config::default()
    };

    assert!(matches!(manager.save(&cfg), Err(ConfigError::Invalid(_))));
    assert!(!manager.config_path().exists());
}

#[test]
fn backups_round_trip_and_list() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    let cfg = Config {
        trend_months: 12,
        ..Config::default()
    };

    let backup = manager.backup(&cfg, Some("year view")).expect("backup");
    assert!(backup.name.ends_with("_year-view.json"));
    assert_eq!(backup.note.as_deref(), Some("year-view"));
    assert_eq!(manager.list_backups().expect("list"), vec![backup.clone()]);
    assert_eq!(manager.restore(&backup.name).expect("restore").trend_months, 12);
    assert!(matches!(
        manager.restore("config_missing.json"),
        Err(ConfigError::BackupNotFound(_))
    ));
}
