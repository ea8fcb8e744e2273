use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.toml";
const HOME_ENV: &str = "LAUNCHSEARCH_HOME";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid toml in '{path}': {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid json in '{path}': {message}")]
    Json { path: PathBuf, message: String },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenAppsInSearch {
    #[default]
    Off,
    /// Surface a hidden app only when the query spells out its full name.
    IfNameFull,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebSearchProvider {
    Google,
    Duckduckgo,
    Kagi,
    #[default]
    Startpage,
    Custom,
}

impl WebSearchProvider {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Self::Google,
            "duckduckgo" => Self::Duckduckgo,
            "kagi" => Self::Kagi,
            "custom" => Self::Custom,
            _ => Self::Startpage,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Duckduckgo => "duckduckgo",
            Self::Kagi => "kagi",
            Self::Startpage => "startpage",
            Self::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Duckduckgo => "DuckDuckGo",
            Self::Kagi => "Kagi",
            Self::Startpage => "Startpage",
            Self::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_app_results: u16,
    pub max_shortcut_results: u16,
    pub max_recent_results: u16,
    pub max_file_results: u16,
    pub max_contact_results: u16,
    pub max_settings_results: u16,
    pub max_web_suggestions: u16,
    pub fuzzy_search: bool,
    pub hidden_apps: BTreeSet<String>,
    pub hidden_apps_in_search: HiddenAppsInSearch,
    pub search_result_files: bool,
    pub search_result_contacts: bool,
    pub search_result_settings: bool,
    pub search_result_calculator: bool,
    pub search_result_web_suggestions: bool,
    pub web_search_provider: WebSearchProvider,
    pub custom_web_search_name: String,
    /// Search URL template; `%s` is replaced by the encoded query.
    pub custom_web_search_url: String,
    pub custom_web_suggestions_url: String,
    pub market_search_available: bool,
    pub market_search_uri: String,
    pub file_search_roots: Vec<PathBuf>,
    pub file_search_max_depth: usize,
    pub history_db_path: PathBuf,
    pub contacts_db_path: PathBuf,
    pub apps_manifest_path: PathBuf,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            max_app_results: 5,
            max_shortcut_results: 5,
            max_recent_results: 5,
            max_file_results: 3,
            max_contact_results: 3,
            max_settings_results: 3,
            max_web_suggestions: 3,
            fuzzy_search: false,
            hidden_apps: BTreeSet::new(),
            hidden_apps_in_search: HiddenAppsInSearch::Off,
            search_result_files: true,
            search_result_contacts: true,
            search_result_settings: true,
            search_result_calculator: true,
            search_result_web_suggestions: true,
            web_search_provider: WebSearchProvider::Startpage,
            custom_web_search_name: String::new(),
            custom_web_search_url: String::new(),
            custom_web_suggestions_url: String::new(),
            market_search_available: false,
            market_search_uri: "market://search?q=%s".to_string(),
            file_search_roots: Vec::new(),
            file_search_max_depth: 6,
            history_db_path: base.join("history.sqlite3"),
            contacts_db_path: base.join("contacts.sqlite3"),
            apps_manifest_path: base.join("apps.json"),
            config_path: base.join(CONFIG_FILE_NAME),
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    match std::env::var_os(HOME_ENV) {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => std::env::temp_dir().join("launchsearch"),
    }
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    check_range("max_app_results", cfg.max_app_results, 1, 100)?;
    check_range("max_shortcut_results", cfg.max_shortcut_results, 0, 20)?;
    check_range("max_recent_results", cfg.max_recent_results, 1, 50)?;
    check_range("max_file_results", cfg.max_file_results, 1, 50)?;
    check_range("max_contact_results", cfg.max_contact_results, 1, 50)?;
    check_range("max_settings_results", cfg.max_settings_results, 1, 50)?;
    check_range("max_web_suggestions", cfg.max_web_suggestions, 1, 20)?;

    if cfg.file_search_max_depth == 0 {
        return Err("file_search_max_depth must be at least 1".into());
    }

    if cfg.history_db_path.as_os_str().is_empty() {
        return Err("history_db_path is required".into());
    }

    Ok(())
}

fn check_range(name: &str, value: u16, min: u16, max: u16) -> Result<(), String> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("{name} must be between {min} and {max}"))
    }
}

pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| stable_app_data_dir().join(CONFIG_FILE_NAME));

    if !path.exists() {
        return Ok(Config {
            config_path: path,
            ..Config::default()
        });
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let mut cfg = parse(&raw, &path)?;
    cfg.config_path = path;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let encoded = toml::to_string_pretty(cfg)?;
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Write {
        path: cfg.config_path.clone(),
        source,
    })
}

fn parse(raw: &str, path: &Path) -> Result<Config, ConfigError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("json5"));

    if is_json {
        json5::from_str(raw).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    } else {
        toml::from_str(raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}
