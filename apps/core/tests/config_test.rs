use launchsearch_core::config::{Config, HiddenAppsInSearch, WebSearchProvider};

#[test]
fn rejects_max_app_results_out_of_range() {
    let cfg = Config {
        max_app_results: 200,
        ..Default::default()
    };
    assert!(launchsearch_core::config::validate(&cfg).is_err());
}

#[test]
fn accepts_default_config() {
    let cfg = Config::default();
    assert_eq!(cfg.max_app_results, 5);
    assert_eq!(cfg.max_recent_results, 5);
    assert!(!cfg.fuzzy_search);
    assert_eq!(cfg.hidden_apps_in_search, HiddenAppsInSearch::Off);
    assert!(cfg.history_db_path.to_string_lossy().contains("launchsearch"));
    assert!(launchsearch_core::config::validate(&cfg).is_ok());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let cfg = launchsearch_core::config::load(Some(&path)).unwrap();

    assert_eq!(cfg.config_path, path);
    assert_eq!(cfg.max_app_results, Config::default().max_app_results);
}

#[test]
fn loads_partial_toml_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
fuzzy_search = true
max_app_results = 8
hidden_apps = ["com.x.secret"]
hidden_apps_in_search = "if_name_full"
web_search_provider = "kagi"
"#,
    )
    .unwrap();

    let cfg = launchsearch_core::config::load(Some(&path)).unwrap();

    assert!(cfg.fuzzy_search);
    assert_eq!(cfg.max_app_results, 8);
    assert!(cfg.hidden_apps.contains("com.x.secret"));
    assert_eq!(cfg.hidden_apps_in_search, HiddenAppsInSearch::IfNameFull);
    assert_eq!(cfg.web_search_provider, WebSearchProvider::Kagi);
    assert_eq!(cfg.max_file_results, 3);
}

#[test]
fn loads_json5_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json5");
    std::fs::write(&path, "{ max_recent_results: 9, /* comment */ market_search_available: true, }").unwrap();

    let cfg = launchsearch_core::config::load(Some(&path)).unwrap();

    assert_eq!(cfg.max_recent_results, 9);
    assert!(cfg.market_search_available);
}

#[test]
fn invalid_values_in_file_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "max_recent_results = 0\n").unwrap();

    let error = launchsearch_core::config::load(Some(&path)).unwrap_err();
    assert!(error.to_string().contains("max_recent_results"));
}

#[test]
fn save_then_load_keeps_values() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        config_path: dir.path().join("nested").join("config.toml"),
        max_web_suggestions: 7,
        custom_web_search_url: "https://example.com/?q=%s".into(),
        ..Config::default()
    };

    launchsearch_core::config::save(&cfg).unwrap();
    let loaded = launchsearch_core::config::load(Some(&cfg.config_path)).unwrap();

    assert_eq!(loaded.max_web_suggestions, 7);
    assert_eq!(loaded.custom_web_search_url, "https://example.com/?q=%s");
}
