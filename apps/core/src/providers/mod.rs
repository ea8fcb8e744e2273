pub mod app;
pub mod calculator;
pub mod contacts;
pub mod files;
pub mod history;
pub mod settings;
pub mod shortcut;
pub mod web;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::result::SearchResult;

pub use app::AppSearchProvider;
pub use calculator::CalculatorSearchProvider;
pub use contacts::{ContactsSearchProvider, ContactsSource, SqliteContactsSource};
pub use files::FileSearchProvider;
pub use history::{HistoryStore, SqliteHistoryStore, StoreError};
pub use settings::SettingsSearchProvider;
pub use shortcut::ShortcutSearchProvider;
pub use web::{HttpSuggestionClient, SuggestionClient, WebSuggestionProvider};

const BATCH_CAPACITY: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),
    #[error("provider task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub contacts: bool,
    pub files: bool,
}

impl Permissions {
    pub fn all() -> Self {
        Self {
            contacts: true,
            files: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchContext {
    pub config: Arc<Config>,
    pub permissions: Permissions,
    /// Fires when in-flight provider work should stop, not merely be ignored.
    pub interrupt: CancellationToken,
}

impl SearchContext {
    pub fn new(config: Arc<Config>, permissions: Permissions) -> Self {
        Self {
            config,
            permissions,
            interrupt: CancellationToken::new(),
        }
    }

    pub fn with_interrupt(mut self, interrupt: CancellationToken) -> Self {
        self.interrupt = interrupt;
        self
    }
}

pub trait SearchProvider: Send + Sync {
    fn id(&self) -> &'static str;
    fn search(&self, ctx: &SearchContext, query: &str) -> ResultStream;
}

pub type BatchSender = mpsc::Sender<Vec<SearchResult>>;

#[derive(Debug)]
pub struct ResultStream {
    rx: mpsc::Receiver<Vec<SearchResult>>,
}

impl ResultStream {
    pub fn channel() -> (BatchSender, Self) {
        let (tx, rx) = mpsc::channel(BATCH_CAPACITY);
        (tx, Self { rx })
    }

    pub fn empty() -> Self {
        let (_, stream) = Self::channel();
        stream
    }

    pub fn ready(results: Vec<SearchResult>) -> Self {
        let (tx, stream) = Self::channel();
        let _ = tx.try_send(results);
        stream
    }

    pub fn spawn<F>(provider_id: &'static str, ctx: &SearchContext, work: F) -> Self
    where
        F: Future<Output = Result<Vec<SearchResult>, ProviderError>> + Send + 'static,
    {
        let (tx, stream) = Self::channel();
        let interrupt = ctx.interrupt.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = interrupt.cancelled() => {
                    debug!(provider = provider_id, "provider interrupted");
                    return;
                }
                outcome = work => outcome,
            };
            let batch = match outcome {
                Ok(results) => results,
                Err(error) => {
                    warn!(provider = provider_id, %error, "provider failed, emitting no results");
                    Vec::new()
                }
            };
            let _ = tx.send(batch).await;
        });
        stream
    }

    pub fn spawn_blocking<F>(provider_id: &'static str, ctx: &SearchContext, work: F) -> Self
    where
        F: FnOnce(&CancellationToken) -> Result<Vec<SearchResult>, ProviderError> + Send + 'static,
    {
        let interrupt = ctx.interrupt.clone();
        Self::spawn(provider_id, ctx, async move {
            tokio::task::spawn_blocking(move || work(&interrupt))
                .await
                .map_err(|e| ProviderError::Task(e.to_string()))?
        })
    }

    pub async fn next_batch(&mut self) -> Option<Vec<SearchResult>> {
        self.rx.recv().await
    }

    pub async fn first_batch(mut self) -> Vec<SearchResult> {
        self.next_batch().await.unwrap_or_default()
    }
}

pub fn default_providers(
    contacts: Arc<dyn ContactsSource>,
    suggestions: Arc<dyn SuggestionClient>,
) -> Vec<Arc<dyn SearchProvider>> {
    vec![
        Arc::new(SettingsSearchProvider),
        Arc::new(FileSearchProvider),
        Arc::new(ContactsSearchProvider::new(contacts)),
        Arc::new(WebSuggestionProvider::new(suggestions)),
    ]
}
