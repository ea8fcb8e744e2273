use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::model::{
    AppInfo, Calculation, ContactInfo, FileInfo, RecentKeyword, SettingInfo, ShortcutInfo,
};
use crate::result::{ActionResult, SearchResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum SearchTarget {
    App {
        app: AppInfo,
        as_row: bool,
    },
    Shortcut {
        shortcut: ShortcutInfo,
    },
    Header {
        title: String,
        package_name: Option<String>,
    },
    Divider,
    WebSuggestion {
        suggestion: String,
        provider: String,
    },
    Calculator {
        calculation: Calculation,
    },
    Contact {
        contact: ContactInfo,
    },
    Setting {
        setting: SettingInfo,
    },
    File {
        file: FileInfo,
    },
    History {
        keyword: RecentKeyword,
    },
    MarketSearch {
        query: String,
        uri: String,
    },
    WebSearch {
        query: String,
        provider_name: String,
        search_url: String,
    },
}

impl SearchTarget {
    fn is_list_row(&self) -> bool {
        !matches!(
            self,
            Self::App { as_row: false, .. } | Self::Header { .. } | Self::Divider
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionLabels {
    pub suggestions: String,
    pub calculator: String,
    pub contacts: String,
    pub settings: String,
    pub files: String,
    pub history: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            suggestions: "Suggestions".into(),
            calculator: "Calculator".into(),
            contacts: "Contacts".into(),
            settings: "Settings".into(),
            files: "Files".into(),
            history: "Recent searches".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TargetFactory {
    pub labels: SectionLabels,
    market_search_uri: String,
}

impl Default for TargetFactory {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl TargetFactory {
    pub fn new(cfg: &Config) -> Self {
        Self {
            labels: SectionLabels::default(),
            market_search_uri: cfg.market_search_uri.clone(),
        }
    }

    pub fn with_labels(mut self, labels: SectionLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn create_app_target(&self, app: &AppInfo, as_row: bool) -> SearchTarget {
        SearchTarget::App {
            app: app.clone(),
            as_row,
        }
    }

    pub fn create_shortcut_target(&self, shortcut: &ShortcutInfo) -> SearchTarget {
        SearchTarget::Shortcut {
            shortcut: shortcut.clone(),
        }
    }

    pub fn create_header_target(&self, title: &str) -> SearchTarget {
        SearchTarget::Header {
            title: title.to_string(),
            package_name: None,
        }
    }

    pub fn create_package_header_target(&self, package_name: &str, title: &str) -> SearchTarget {
        SearchTarget::Header {
            title: title.to_string(),
            package_name: Some(package_name.to_string()),
        }
    }

    pub fn create_web_suggestion_target(&self, suggestion: &str, provider: &str) -> SearchTarget {
        SearchTarget::WebSuggestion {
            suggestion: suggestion.to_string(),
            provider: provider.to_string(),
        }
    }

    pub fn create_calculator_target(&self, calculation: &Calculation) -> SearchTarget {
        SearchTarget::Calculator {
            calculation: calculation.clone(),
        }
    }

    pub fn create_contact_target(&self, contact: &ContactInfo) -> SearchTarget {
        SearchTarget::Contact {
            contact: contact.clone(),
        }
    }

    pub fn create_setting_target(&self, setting: &SettingInfo) -> Option<SearchTarget> {
        if setting.action.trim().is_empty() {
            return None;
        }
        Some(SearchTarget::Setting {
            setting: setting.clone(),
        })
    }

    pub fn create_file_target(&self, file: &FileInfo) -> SearchTarget {
        SearchTarget::File { file: file.clone() }
    }

    pub fn create_history_target(&self, keyword: &RecentKeyword) -> SearchTarget {
        SearchTarget::History {
            keyword: keyword.clone(),
        }
    }

    pub fn create_market_search_target(&self, query: &str) -> Option<SearchTarget> {
        if !self.market_search_uri.contains("%s") {
            return None;
        }
        let encoded = urlencoding::encode(query.trim());
        Some(SearchTarget::MarketSearch {
            query: query.to_string(),
            uri: self.market_search_uri.replace("%s", &encoded),
        })
    }

    pub fn create_web_search_target(
        &self,
        query: &str,
        provider_name: &str,
        search_url: &str,
    ) -> SearchTarget {
        SearchTarget::WebSearch {
            query: query.to_string(),
            provider_name: provider_name.to_string(),
            search_url: search_url.to_string(),
        }
    }
}

pub trait SectionBuilder: Send + Sync {
    fn name(&self) -> &'static str;
    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget>;
}

fn with_header(header: SearchTarget, rows: Vec<SearchTarget>) -> Vec<SearchTarget> {
    if rows.is_empty() {
        return rows;
    }
    let mut out = Vec::with_capacity(rows.len() + 1);
    out.push(header);
    out.extend(rows);
    out
}

pub struct AppsSection;

impl SectionBuilder for AppsSection {
    fn name(&self) -> &'static str {
        "apps"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        let apps: Vec<&AppInfo> = results
            .iter()
            .filter_map(|r| match r {
                SearchResult::App(app) => Some(app),
                _ => None,
            })
            .collect();
        let shortcuts: Vec<&ShortcutInfo> = results
            .iter()
            .filter_map(|r| match r {
                SearchResult::Shortcut(shortcut) => Some(shortcut),
                _ => None,
            })
            .collect();

        if let ([app], false) = (apps.as_slice(), shortcuts.is_empty()) {
            let mut out = vec![factory.create_app_target(app, true)];
            out.extend(shortcuts.into_iter().map(|s| factory.create_shortcut_target(s)));
            return out;
        }
        apps.into_iter()
            .map(|app| factory.create_app_target(app, false))
            .collect()
    }
}

pub struct DividerSection;

impl SectionBuilder for DividerSection {
    fn name(&self) -> &'static str {
        "divider"
    }

    fn build(&self, results: &[SearchResult], _factory: &TargetFactory) -> Vec<SearchTarget> {
        let has_divider_action = results
            .iter()
            .any(|r| matches!(r, SearchResult::Action(ActionResult::Divider)));
        let has_apps = results.iter().any(SearchResult::is_app_family);
        let has_others = results.iter().any(|r| !r.is_app_family());
        if has_divider_action || (has_apps && has_others) {
            vec![SearchTarget::Divider]
        } else {
            Vec::new()
        }
    }
}

pub struct WebSuggestionsSection;

impl SectionBuilder for WebSuggestionsSection {
    fn name(&self) -> &'static str {
        "web_suggestions"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        let rows = results
            .iter()
            .filter_map(|r| match r {
                SearchResult::WebSuggestion {
                    suggestion,
                    provider,
                } => Some(factory.create_web_suggestion_target(suggestion, provider)),
                _ => None,
            })
            .collect();
        with_header(factory.create_header_target(&factory.labels.suggestions), rows)
    }
}

pub struct CalculatorSection;

impl SectionBuilder for CalculatorSection {
    fn name(&self) -> &'static str {
        "calculator"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        let first = results.iter().find_map(|r| match r {
            SearchResult::Calculation(calculation) => Some(calculation),
            _ => None,
        });
        let rows = first
            .map(|c| factory.create_calculator_target(c))
            .into_iter()
            .collect();
        with_header(factory.create_header_target(&factory.labels.calculator), rows)
    }
}

pub struct ContactsSection;

impl SectionBuilder for ContactsSection {
    fn name(&self) -> &'static str {
        "contacts"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        let rows = results
            .iter()
            .filter_map(|r| match r {
                SearchResult::Contact(contact) => Some(factory.create_contact_target(contact)),
                _ => None,
            })
            .collect();
        with_header(factory.create_header_target(&factory.labels.contacts), rows)
    }
}

pub struct SettingsSection;

impl SectionBuilder for SettingsSection {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        let rows = results
            .iter()
            .filter_map(|r| match r {
                SearchResult::Setting(setting) => factory.create_setting_target(setting),
                _ => None,
            })
            .collect();
        with_header(factory.create_header_target(&factory.labels.settings), rows)
    }
}

pub struct FilesSection;

impl SectionBuilder for FilesSection {
    fn name(&self) -> &'static str {
        "files"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        let rows = results
            .iter()
            .filter_map(|r| match r {
                SearchResult::File(file) => Some(factory.create_file_target(file)),
                _ => None,
            })
            .collect();
        with_header(factory.create_header_target(&factory.labels.files), rows)
    }
}

pub struct HistorySection;

impl SectionBuilder for HistorySection {
    fn name(&self) -> &'static str {
        "history"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        let rows = results
            .iter()
            .filter_map(|r| match r {
                SearchResult::History(keyword) => Some(factory.create_history_target(keyword)),
                _ => None,
            })
            .collect();
        with_header(factory.create_header_target(&factory.labels.history), rows)
    }
}

pub struct MarketSearchSection;

impl SectionBuilder for MarketSearchSection {
    fn name(&self) -> &'static str {
        "market_search"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        results
            .iter()
            .find_map(|r| match r {
                SearchResult::Action(ActionResult::MarketSearch { query }) => Some(query),
                _ => None,
            })
            .and_then(|query| factory.create_market_search_target(query))
            .into_iter()
            .collect()
    }
}

pub struct WebSearchSection;

impl SectionBuilder for WebSearchSection {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        results
            .iter()
            .find_map(|r| match r {
                SearchResult::Action(ActionResult::WebSearch {
                    query,
                    provider_name,
                    search_url,
                }) => Some(factory.create_web_search_target(query, provider_name, search_url)),
                _ => None,
            })
            .into_iter()
            .collect()
    }
}

pub struct ActionHeadersSection;

impl SectionBuilder for ActionHeadersSection {
    fn name(&self) -> &'static str {
        "action_headers"
    }

    fn build(&self, results: &[SearchResult], factory: &TargetFactory) -> Vec<SearchTarget> {
        results
            .iter()
            .filter_map(|r| match r {
                SearchResult::Action(ActionResult::Header {
                    package_name,
                    title,
                }) => Some(factory.create_package_header_target(package_name, title)),
                _ => None,
            })
            .collect()
    }
}

pub fn default_builders() -> Vec<Arc<dyn SectionBuilder>> {
    vec![
        Arc::new(AppsSection),
        Arc::new(DividerSection),
        Arc::new(WebSuggestionsSection),
        Arc::new(CalculatorSection),
        Arc::new(ContactsSection),
        Arc::new(SettingsSection),
        Arc::new(FilesSection),
        Arc::new(HistorySection),
        Arc::new(MarketSearchSection),
        Arc::new(WebSearchSection),
        Arc::new(ActionHeadersSection),
    ]
}

pub fn translate(
    results: &[SearchResult],
    builders: &[Arc<dyn SectionBuilder>],
    factory: &TargetFactory,
) -> Vec<SearchTarget> {
    builders
        .iter()
        .flat_map(|builder| builder.build(results, factory))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoration {
    Single,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterItem {
    pub target: SearchTarget,
    pub decoration: Option<Decoration>,
}

pub fn transform_search_results(targets: Vec<SearchTarget>) -> Vec<AdapterItem> {
    let rows: Vec<bool> = targets.iter().map(SearchTarget::is_list_row).collect();
    targets
        .into_iter()
        .enumerate()
        .map(|(i, target)| {
            let decoration = rows[i].then(|| {
                let prev = i > 0 && rows[i - 1];
                let next = rows.get(i + 1).copied().unwrap_or(false);
                match (prev, next) {
                    (false, false) => Decoration::Single,
                    (false, true) => Decoration::Top,
                    (true, true) => Decoration::Middle,
                    (true, false) => Decoration::Bottom,
                }
            });
            AdapterItem { target, decoration }
        })
        .collect()
}
