use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{Config, WebSearchProvider};
use crate::providers::{ProviderError, ResultStream, SearchContext, SearchProvider};
use crate::result::SearchResult;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait SuggestionClient: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ProviderError>;
}

pub struct HttpSuggestionClient {
    client: reqwest::Client,
}

impl HttpSuggestionClient {
    pub fn new() -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("launchsearch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SuggestionClient for HttpSuggestionClient {
    async fn fetch(&self, url: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))
    }
}

pub struct WebSuggestionProvider {
    client: Arc<dyn SuggestionClient>,
}

impl WebSuggestionProvider {
    pub fn new(client: Arc<dyn SuggestionClient>) -> Self {
        Self { client }
    }
}

impl SearchProvider for WebSuggestionProvider {
    fn id(&self) -> &'static str {
        "web_suggestions"
    }

    fn search(&self, ctx: &SearchContext, query: &str) -> ResultStream {
        let cfg = &ctx.config;
        if query.trim().is_empty() || !cfg.search_result_web_suggestions {
            return ResultStream::ready(Vec::new());
        }
        let Some(url) = suggestions_url(cfg, query) else {
            return ResultStream::ready(Vec::new());
        };

        let client = Arc::clone(&self.client);
        let provider = cfg.web_search_provider.id();
        let max = cfg.max_web_suggestions as usize;
        ResultStream::spawn(self.id(), ctx, async move {
            let body = client.fetch(&url).await?;
            let suggestions = parse_suggestions(&body, max)?;
            Ok(suggestions
                .into_iter()
                .map(|suggestion| SearchResult::WebSuggestion {
                    suggestion,
                    provider: provider.to_string(),
                })
                .collect())
        })
    }
}

pub fn suggestions_url(cfg: &Config, query: &str) -> Option<String> {
    let encoded = urlencoding::encode(query.trim());
    let url = match cfg.web_search_provider {
        WebSearchProvider::Google => format!(
            "https://www.google.com/complete/search?client=firefox&q={encoded}&callback=json"
        ),
        WebSearchProvider::Duckduckgo => {
            format!("https://ac.duckduckgo.com/ac/?q={encoded}&type=list")
        }
        WebSearchProvider::Kagi => format!("https://kagi.com/api/autosuggest?q={encoded}"),
        WebSearchProvider::Startpage => format!(
            "https://www.startpage.com/suggestions?q={encoded}&segment=startpage.lawnchair&partner=lawnchair&format=opensearch"
        ),
        WebSearchProvider::Custom => {
            let template = cfg.custom_web_suggestions_url.trim();
            if template.is_empty() || !template.contains("%s") {
                return None;
            }
            template.replace("%s", &encoded)
        }
    };
    Some(url)
}

pub fn parse_suggestions(body: &str, max: usize) -> Result<Vec<String>, ProviderError> {
    let trimmed = body.trim();
    let payload = if trimmed.starts_with('[') {
        trimmed
    } else {
        let start = trimmed
            .find('(')
            .ok_or_else(|| ProviderError::Parse("expected a json array".into()))?;
        let end = trimmed
            .rfind(')')
            .filter(|end| *end > start)
            .ok_or_else(|| ProviderError::Parse("unterminated callback".into()))?;
        &trimmed[start + 1..end]
    };

    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| ProviderError::Parse(e.to_string()))?;
    let Some(items) = value.get(1).and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(|item| item.as_str())
        .take(max)
        .map(str::to_string)
        .collect())
}
