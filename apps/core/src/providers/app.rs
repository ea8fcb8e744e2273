use std::collections::BTreeSet;

use crate::config::HiddenAppsInSearch;
use crate::model::AppInfo;
use crate::providers::SearchContext;
use crate::result::SearchResult;
use crate::search::{matches_title, weighted_ratio, FUZZY_CUTOFF};

pub struct AppSearchProvider;

impl AppSearchProvider {
    pub const ID: &'static str = "apps";

    pub fn search(&self, ctx: &SearchContext, query: &str, apps: &[AppInfo]) -> Vec<SearchResult> {
        let cfg = &ctx.config;
        let max = cfg.max_app_results as usize;
        let hits = if cfg.fuzzy_search {
            fuzzy_search(apps, query, max, &cfg.hidden_apps, cfg.hidden_apps_in_search)
        } else {
            normal_search(apps, query, max, &cfg.hidden_apps, cfg.hidden_apps_in_search)
        };
        hits.into_iter().cloned().map(SearchResult::App).collect()
    }
}

pub fn normal_search<'a>(
    apps: &'a [AppInfo],
    query: &str,
    max: usize,
    hidden: &BTreeSet<String>,
    mode: HiddenAppsInSearch,
) -> Vec<&'a AppInfo> {
    let query_lower = query.to_lowercase();
    apps.iter()
        .filter(|app| matches_title(&query_lower, &app.title))
        .filter(|app| is_visible(app, &query_lower, hidden, mode))
        .take(max)
        .collect()
}

pub fn fuzzy_search<'a>(
    apps: &'a [AppInfo],
    query: &str,
    max: usize,
    hidden: &BTreeSet<String>,
    mode: HiddenAppsInSearch,
) -> Vec<&'a AppInfo> {
    let query_lower = query.to_lowercase();
    let mut scored: Vec<(u8, usize, &AppInfo)> = apps
        .iter()
        .filter(|app| is_visible(app, &query_lower, hidden, mode))
        .enumerate()
        .filter_map(|(index, app)| {
            let target = format!("{}{}", app.section_name, app.title);
            let score = weighted_ratio(&query_lower, &target);
            (score >= FUZZY_CUTOFF).then_some((score, index, app))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.into_iter().take(max).map(|(_, _, app)| app).collect()
}

fn is_visible(
    app: &AppInfo,
    query_lower: &str,
    hidden: &BTreeSet<String>,
    mode: HiddenAppsInSearch,
) -> bool {
    if !app.is_hidden_by(hidden) {
        return true;
    }
    match mode {
        HiddenAppsInSearch::Always => true,
        HiddenAppsInSearch::IfNameFull => app.title.to_lowercase() == query_lower.trim(),
        HiddenAppsInSearch::Off => false,
    }
}
