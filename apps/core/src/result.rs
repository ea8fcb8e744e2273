use serde::{Deserialize, Serialize};

use crate::model::{
    AppInfo, Calculation, ContactInfo, FileInfo, RecentKeyword, SettingInfo, ShortcutInfo,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionResult {
    Divider,
    WebSearch {
        query: String,
        provider_name: String,
        search_url: String,
    },
    MarketSearch {
        query: String,
    },
    Header {
        package_name: String,
        title: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SearchResult {
    App(AppInfo),
    Contact(ContactInfo),
    File(FileInfo),
    Setting(SettingInfo),
    Shortcut(ShortcutInfo),
    WebSuggestion { suggestion: String, provider: String },
    History(RecentKeyword),
    Calculation(Calculation),
    Action(ActionResult),
}

impl SearchResult {
    pub fn is_app_family(&self) -> bool {
        matches!(self, Self::App(_) | Self::Shortcut(_))
    }
}
