use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tracing::info;

use crate::aggregator::SearchAggregator;
use crate::config::{validate, Config};
use crate::contract::{
    AcceptedResponse, CoreEvent, CoreRequest, CoreResponse, RecordHistoryResponse, ResultsEvent,
};
use crate::launcher_model::{load_manifest, LauncherModel, ModelError};
use crate::providers::{
    default_providers, HistoryStore, HttpSuggestionClient, Permissions, ProviderError,
    SearchProvider, SqliteContactsSource, SqliteHistoryStore, StoreError,
};
use crate::sections::AdapterItem;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type EventSink = mpsc::UnboundedSender<CoreEvent>;

pub struct CoreService {
    config: Config,
    model: LauncherModel,
    history: Arc<dyn HistoryStore>,
    aggregator: SearchAggregator,
}

impl CoreService {
    /// Opens every store named by `config`. Must run inside a tokio runtime.
    pub fn new(config: Config, permissions: Permissions) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let apps = load_manifest(&config.apps_manifest_path)?;
        info!(apps = apps.len(), "loaded apps manifest");
        let model = LauncherModel::spawn(apps);
        let history: Arc<dyn HistoryStore> =
            Arc::new(SqliteHistoryStore::open_from_config(&config)?);
        let contacts = SqliteContactsSource::open(&config.contacts_db_path)?;
        let suggestions = HttpSuggestionClient::new()?;
        let providers = default_providers(Arc::new(contacts), Arc::new(suggestions));
        Self::with_parts(config, permissions, model, history, providers)
    }

    pub fn with_parts(
        config: Config,
        permissions: Permissions,
        model: LauncherModel,
        history: Arc<dyn HistoryStore>,
        providers: Vec<Arc<dyn SearchProvider>>,
    ) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let aggregator = SearchAggregator::new(
            model.clone(),
            Arc::clone(&history),
            providers,
            config.clone(),
            permissions,
        );
        Ok(Self {
            config,
            model,
            history,
            aggregator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model(&self) -> &LauncherModel {
        &self.model
    }

    pub fn aggregator(&self) -> &SearchAggregator {
        &self.aggregator
    }

    pub fn set_permissions(&self, permissions: Permissions) {
        self.aggregator.set_permissions(permissions);
    }

    pub fn handle_command(
        &self,
        request: CoreRequest,
        events: &EventSink,
    ) -> Result<CoreResponse, ServiceError> {
        match request {
            CoreRequest::Search(request) => {
                self.aggregator.do_search(&request.query, forward_to(events));
                Ok(CoreResponse::Search(AcceptedResponse {
                    job: request.query,
                }))
            }
            CoreRequest::ZeroState => {
                self.aggregator.do_zero_state_search(forward_to(events));
                Ok(CoreResponse::ZeroState(AcceptedResponse { job: String::new() }))
            }
            CoreRequest::Cancel(request) => {
                self.aggregator.cancel(request.interrupt);
                Ok(CoreResponse::Cancel)
            }
            CoreRequest::RecordHistory(request) => {
                let recorded = self.record_history(&request.keyword)?;
                Ok(CoreResponse::RecordHistory(RecordHistoryResponse { recorded }))
            }
        }
    }

    pub fn record_history(&self, keyword: &str) -> Result<bool, ServiceError> {
        if keyword.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("keyword must not be empty".into()));
        }
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.history.record(keyword, now)?;
        Ok(true)
    }
}

fn forward_to(events: &EventSink) -> impl Fn(&str, Vec<AdapterItem>) + Send + Sync + 'static {
    let events = events.clone();
    move |query: &str, items: Vec<AdapterItem>| {
        let _ = events.send(CoreEvent::Results(ResultsEvent {
            query: query.to_string(),
            items,
        }));
    }
}
