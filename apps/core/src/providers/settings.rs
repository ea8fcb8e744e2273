use crate::model::{normalize_for_search, SettingInfo};
use crate::providers::{ResultStream, SearchContext, SearchProvider};
use crate::result::SearchResult;

#[derive(Debug, Clone, Copy)]
pub struct SettingEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub action: &'static str,
    pub keywords: &'static [&'static str],
}

pub fn device_settings() -> &'static [SettingEntry] {
    &[
        SettingEntry {
            id: "wifi",
            title: "Wi-Fi",
            subtitle: "Network & internet",
            action: "android.settings.WIFI_SETTINGS",
            keywords: &["wifi", "wireless", "network", "internet"],
        },
        SettingEntry {
            id: "bluetooth",
            title: "Bluetooth",
            subtitle: "Connected devices",
            action: "android.settings.BLUETOOTH_SETTINGS",
            keywords: &["bluetooth", "pair", "devices"],
        },
        SettingEntry {
            id: "display",
            title: "Display",
            subtitle: "Brightness, dark theme, font size",
            action: "android.settings.DISPLAY_SETTINGS",
            keywords: &["brightness", "screen", "dark", "theme", "font"],
        },
        SettingEntry {
            id: "sound",
            title: "Sound & vibration",
            subtitle: "Volume, ringtone, do not disturb",
            action: "android.settings.SOUND_SETTINGS",
            keywords: &["volume", "ringtone", "vibration", "silent"],
        },
        SettingEntry {
            id: "battery",
            title: "Battery",
            subtitle: "Usage, battery saver",
            action: "android.intent.action.POWER_USAGE_SUMMARY",
            keywords: &["power", "saver", "charge"],
        },
        SettingEntry {
            id: "apps",
            title: "Apps",
            subtitle: "Default apps, app permissions",
            action: "android.settings.APPLICATION_SETTINGS",
            keywords: &["applications", "default", "permissions", "uninstall"],
        },
        SettingEntry {
            id: "location",
            title: "Location",
            subtitle: "Location services",
            action: "android.settings.LOCATION_SOURCE_SETTINGS",
            keywords: &["gps", "location"],
        },
        SettingEntry {
            id: "security",
            title: "Security & privacy",
            subtitle: "Screen lock, fingerprint",
            action: "android.settings.SECURITY_SETTINGS",
            keywords: &["lock", "fingerprint", "password", "pin", "privacy"],
        },
        SettingEntry {
            id: "storage",
            title: "Storage",
            subtitle: "Free up space",
            action: "android.settings.INTERNAL_STORAGE_SETTINGS",
            keywords: &["space", "disk", "memory"],
        },
        SettingEntry {
            id: "date_time",
            title: "Date & time",
            subtitle: "System",
            action: "android.settings.DATE_SETTINGS",
            keywords: &["clock", "timezone", "time", "date"],
        },
        SettingEntry {
            id: "language",
            title: "Languages & input",
            subtitle: "System",
            action: "android.settings.LOCALE_SETTINGS",
            keywords: &["language", "keyboard", "input", "locale"],
        },
        SettingEntry {
            id: "accessibility",
            title: "Accessibility",
            subtitle: "Screen readers, display, interaction controls",
            action: "android.settings.ACCESSIBILITY_SETTINGS",
            keywords: &["talkback", "magnification", "accessibility"],
        },
        SettingEntry {
            id: "developer",
            title: "Developer options",
            subtitle: "System",
            action: "android.settings.APPLICATION_DEVELOPMENT_SETTINGS",
            keywords: &["developer", "debugging", "usb"],
        },
    ]
}

pub struct SettingsSearchProvider;

impl SearchProvider for SettingsSearchProvider {
    fn id(&self) -> &'static str {
        "settings"
    }

    fn search(&self, ctx: &SearchContext, query: &str) -> ResultStream {
        if query.trim().is_empty() || !ctx.config.search_result_settings {
            return ResultStream::ready(Vec::new());
        }
        let max = ctx.config.max_settings_results as usize;
        let results = search_settings(query, max)
            .into_iter()
            .map(SearchResult::Setting)
            .collect();
        ResultStream::ready(results)
    }
}

pub fn search_settings(query: &str, limit: usize) -> Vec<SettingInfo> {
    let normalized = normalize_for_search(query);
    if normalized.is_empty() || limit == 0 {
        return Vec::new();
    }

    device_settings()
        .iter()
        .filter(|entry| {
            normalize_for_search(entry.title).contains(&normalized)
                || entry
                    .keywords
                    .iter()
                    .any(|kw| normalize_for_search(kw).starts_with(&normalized))
        })
        .take(limit)
        .map(|entry| SettingInfo {
            id: entry.id.to_string(),
            title: entry.title.to_string(),
            subtitle: entry.subtitle.to_string(),
            action: entry.action.to_string(),
        })
        .collect()
}
