use faceit_h2h::aggregate::{MapStat, PlayerMetrics, PlayerStat};
use faceit_h2h::config::Config;
use faceit_h2h::settings::{self, JsonFileSettings, MemorySettings, SettingsStore};
use faceit_h2h::ui::{self, ColumnPrefs, DEFAULT_VISIBLE};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use tempdir::TempDir;

#[test]
fn missing_file_reads_as_empty() {
    let dir = TempDir::new("faceit-h2h").unwrap();
    let store = JsonFileSettings::new(dir.path().join("settings.json"));
    assert_eq!(store.get("apiKey"), None);
    assert_eq!(settings::api_key(&store), None);
}

#[test]
fn file_store_round_trips_and_keeps_other_keys() {
    let dir = TempDir::new("faceit-h2h").unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let mut store = JsonFileSettings::new(&path);

    settings::set_api_key(&mut store, "  KEY-1 ").unwrap();
    store.set("theme", json!("dark")).unwrap();

    let reopened = JsonFileSettings::new(&path);
    assert_eq!(settings::api_key(&reopened).as_deref(), Some("KEY-1"));
    assert_eq!(reopened.get("theme"), Some(json!("dark")));

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["apiKey"], "KEY-1");
}

#[test]
fn corrupt_file_reads_as_unset_but_refuses_writes() {
    let dir = TempDir::new("faceit-h2h").unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut store = JsonFileSettings::new(&path);
    assert_eq!(store.get("apiKey"), None);
    assert!(store.set("apiKey", json!("x")).is_err());
}

#[test]
fn blank_api_key_is_unset() {
    let mut store = MemorySettings::new();
    store.set("apiKey", json!("   ")).unwrap();
    assert_eq!(settings::api_key(&store), None);
    store.set("apiKey", json!(42)).unwrap();
    assert_eq!(settings::api_key(&store), None);
}

#[test]
fn hidden_columns_round_trip_and_reset() {
    let mut store = MemorySettings::new();
    assert_eq!(settings::hidden_columns(&store), None);

    let hidden: BTreeSet<String> = ["adr".to_string(), "mvps".to_string()].into_iter().collect();
    settings::set_hidden_columns(&mut store, &hidden).unwrap();
    assert_eq!(settings::hidden_columns(&store), Some(hidden));

    settings::clear_hidden_columns(&mut store).unwrap();
    assert_eq!(settings::hidden_columns(&store), None);
}

#[test]
fn default_columns_without_preference() {
    let prefs = ColumnPrefs::from_hidden(None);
    let visible: Vec<&str> = prefs.visible().into_iter().map(|(k, _)| k).collect();
    assert_eq!(visible.len(), DEFAULT_VISIBLE.len());
    for key in DEFAULT_VISIBLE {
        assert!(visible.contains(key));
    }
    assert_eq!(ColumnPrefs::show_all().visible().len(), 45);
}

#[test]
fn saved_preference_drives_visible_columns() {
    let mut prefs = ColumnPrefs::show_all();
    prefs.hide("adr");
    prefs.hide("kills");
    prefs.show("kills");
    let visible: Vec<&str> = prefs.visible().into_iter().map(|(k, _)| k).collect();
    assert!(!visible.contains(&"adr"));
    assert!(visible.contains(&"kills"));
    assert_eq!(visible.len(), 44);
}

#[test]
fn unknown_columns_are_reported() {
    let keys = vec!["kills".to_string(), "elo".to_string()];
    assert_eq!(ui::unknown_columns(&keys), vec!["elo"]);
}

#[test]
fn config_defaults_and_overrides() {
    let cfg = Config::from_lookup(|_| None);
    assert_eq!(cfg.api_base, "https://open.faceit.com/data/v4");
    assert_eq!(cfg.api_key, None);
    assert_eq!(cfg.settings_path, std::path::PathBuf::from("settings.json"));
    assert_eq!(cfg.http_timeout.as_secs(), 15);

    let cfg = Config::from_lookup(|k| match k {
        "FACEIT_API_KEY" => Some("env-key".into()),
        "FACEIT_HTTP_TIMEOUT_SECS" => Some("30".into()),
        "FACEIT_API_BASE" => Some("http://localhost:9000".into()),
        _ => None,
    });
    assert_eq!(cfg.api_key.as_deref(), Some("env-key"));
    assert_eq!(cfg.http_timeout.as_secs(), 30);
    assert_eq!(cfg.api_base, "http://localhost:9000");
}

#[test]
fn tables_format_two_decimals() {
    let mut metrics = PlayerMetrics::default();
    metrics.kills = 15.0;
    metrics.kd_ratio = 0.933;
    let players = BTreeMap::from([("p1".to_string(), PlayerStat { nickname: "alpha".into(), matches: 3, metrics })]);
    let rendered = ui::player_table(&players, &ColumnPrefs::default()).to_string();
    assert!(rendered.contains("alpha"));
    assert!(rendered.contains("15.00"));
    assert!(rendered.contains("0.93"));

    let maps = BTreeMap::from([(
        "de_mirage".to_string(),
        MapStat { played: 3, wins: 2, scores: vec!["13/8".into(), "11/13".into(), "13/5".into()] },
    )]);
    let rendered = ui::map_table(&maps).to_string();
    assert!(rendered.contains("66.67%"));
    assert!(rendered.contains("13/8 || 11/13 || 13/5"));
}
