use crate::providers::SearchContext;
use crate::result::SearchResult;

pub struct ShortcutSearchProvider;

impl ShortcutSearchProvider {
    pub const ID: &'static str = "shortcuts";

    pub fn search(&self, ctx: &SearchContext, app_results: &[SearchResult]) -> Vec<SearchResult> {
        let mut apps = app_results.iter().filter_map(|result| match result {
            SearchResult::App(app) => Some(app),
            _ => None,
        });
        let (Some(app), None) = (apps.next(), apps.next()) else {
            return Vec::new();
        };

        app.shortcuts
            .iter()
            .take(ctx.config.max_shortcut_results as usize)
            .cloned()
            .map(SearchResult::Shortcut)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::model::{AppInfo, ShortcutInfo};
    use crate::providers::Permissions;

    fn ctx(max: u16) -> SearchContext {
        let cfg = Config {
            max_shortcut_results: max,
            ..Config::default()
        };
        SearchContext::new(Arc::new(cfg), Permissions::default())
    }

    fn app_with_shortcuts(pkg: &str, count: usize) -> SearchResult {
        let shortcuts = (0..count)
            .map(|i| ShortcutInfo::new(&format!("s{i}"), pkg, &format!("Shortcut {i}")))
            .collect();
        SearchResult::App(AppInfo::new(pkg, "App").with_shortcuts(shortcuts))
    }

    #[test]
    fn single_app_yields_capped_shortcuts() {
        let results = vec![app_with_shortcuts("com.x.a", 4)];
        assert_eq!(ShortcutSearchProvider.search(&ctx(2), &results).len(), 2);
    }

    #[test]
    fn multiple_apps_yield_nothing() {
        let results = vec![app_with_shortcuts("com.x.a", 2), app_with_shortcuts("com.x.b", 2)];
        assert!(ShortcutSearchProvider.search(&ctx(5), &results).is_empty());
    }
}
