use crate::config::{Config, WebSearchProvider};
use crate::providers::SearchContext;
use crate::result::{ActionResult, SearchResult};

const STARTPAGE_SEARCH_TEMPLATE: &str =
    "https://www.startpage.com/do/search?segment=startpage.lawnchair&query=%s&cat=web";

pub fn generate_action_results(ctx: &SearchContext, query: &str) -> Vec<SearchResult> {
    let cfg = &ctx.config;
    let mut out = vec![SearchResult::Action(ActionResult::Divider)];

    if cfg.search_result_web_suggestions {
        if let Some(search_url) = web_search_url(cfg, query) {
            out.push(SearchResult::Action(ActionResult::WebSearch {
                query: query.to_string(),
                provider_name: provider_display_name(cfg),
                search_url,
            }));
        }
    }

    if cfg.market_search_available {
        out.push(SearchResult::Action(ActionResult::MarketSearch {
            query: query.to_string(),
        }));
    }

    out
}

pub fn web_search_url(cfg: &Config, query: &str) -> Option<String> {
    let encoded = urlencoding::encode(query.trim());
    let url = match cfg.web_search_provider {
        WebSearchProvider::Google => format!("https://google.com/search?q={encoded}"),
        WebSearchProvider::Duckduckgo => format!("https://duckduckgo.com/search?q={encoded}"),
        WebSearchProvider::Kagi => format!("https://kagi.com/search?q={encoded}"),
        WebSearchProvider::Startpage => STARTPAGE_SEARCH_TEMPLATE.replace("%s", &encoded),
        WebSearchProvider::Custom => {
            let template = cfg.custom_web_search_url.trim();
            if template.is_empty() || !template.contains("%s") {
                return None;
            }
            template.replace("%s", &encoded)
        }
    };
    Some(url)
}

fn provider_display_name(cfg: &Config) -> String {
    match cfg.web_search_provider {
        WebSearchProvider::Custom if !cfg.custom_web_search_name.trim().is_empty() => {
            cfg.custom_web_search_name.trim().to_string()
        }
        provider => provider.label().to_string(),
    }
}
