use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutInfo {
    pub id: String,
    pub package_name: String,
    pub short_label: String,
    #[serde(default)]
    pub long_label: String,
}

impl ShortcutInfo {
    pub fn new(id: &str, package_name: &str, short_label: &str) -> Self {
        Self {
            id: id.to_string(),
            package_name: package_name.to_string(),
            short_label: short_label.to_string(),
            long_label: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub package_name: String,
    #[serde(default)]
    pub class_name: String,
    pub title: String,
    #[serde(default)]
    pub section_name: String,
    #[serde(default)]
    pub user: u32,
    #[serde(default)]
    pub shortcuts: Vec<ShortcutInfo>,
}

impl AppInfo {
    pub fn new(package_name: &str, title: &str) -> Self {
        let section_name = title
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default();
        Self {
            package_name: package_name.to_string(),
            class_name: format!("{package_name}.MainActivity"),
            title: title.to_string(),
            section_name,
            user: 0,
            shortcuts: Vec::new(),
        }
    }

    pub fn with_shortcuts(mut self, shortcuts: Vec<ShortcutInfo>) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    pub fn component_key(&self) -> String {
        format!("{}/{}", self.package_name, self.class_name)
    }

    pub fn is_hidden_by(&self, hidden: &BTreeSet<String>) -> bool {
        hidden.contains(&self.package_name) || hidden.contains(&self.component_key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub title: String,
    pub size: u64,
    pub modified_epoch_millis: i64,
    pub mime_type: Option<String>,
    pub kind: FileKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingInfo {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentKeyword {
    pub keyword: String,
    pub last_used_epoch_secs: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    pub equation: String,
    pub result: String,
    pub is_valid: bool,
}

pub fn normalize_for_search(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_match_accepts_package_or_component_key() {
        let app = AppInfo::new("com.x.secret", "Secret Vault");
        let by_package: BTreeSet<String> = ["com.x.secret".to_string()].into();
        let by_component: BTreeSet<String> = [app.component_key()].into();
        let other: BTreeSet<String> = ["com.x.other".to_string()].into();

        assert!(app.is_hidden_by(&by_package));
        assert!(app.is_hidden_by(&by_component));
        assert!(!app.is_hidden_by(&other));
    }

    #[test]
    fn section_name_defaults_to_first_letter() {
        assert_eq!(AppInfo::new("com.x.calc", "calculator").section_name, "C");
    }
}
