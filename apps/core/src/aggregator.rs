use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::action_registry::generate_action_results;
use crate::config::Config;
use crate::launcher_model::LauncherModel;
use crate::providers::{
    AppSearchProvider, CalculatorSearchProvider, HistoryStore, Permissions, ResultStream,
    SearchContext, SearchProvider, ShortcutSearchProvider,
};
use crate::result::SearchResult;
use crate::sections::{
    default_builders, transform_search_results, translate, AdapterItem, SectionBuilder,
    TargetFactory,
};

/// Called while the aggregator holds its job slot; implementations must not
/// call back into the same aggregator synchronously. Hand the items off to
/// another task instead (see [`delivery_channel`]).
pub trait SearchCallback: Send + Sync + 'static {
    fn on_search_result(&self, query: &str, items: Vec<AdapterItem>);
}

impl<F> SearchCallback for F
where
    F: Fn(&str, Vec<AdapterItem>) + Send + Sync + 'static,
{
    fn on_search_result(&self, query: &str, items: Vec<AdapterItem>) {
        self(query, items)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDelivery {
    pub query: String,
    pub items: Vec<AdapterItem>,
}

pub fn delivery_channel() -> (
    impl SearchCallback + Clone,
    mpsc::UnboundedReceiver<SearchDelivery>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback = move |query: &str, items: Vec<AdapterItem>| {
        let _ = tx.send(SearchDelivery {
            query: query.to_string(),
            items,
        });
    };
    (callback, rx)
}

struct ActiveJob {
    id: u64,
    delivery: CancellationToken,
    // Parent of `delivery`.
    interrupt: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ActiveJob {
    fn cancel(mut self, interrupt: bool) {
        self.delivery.cancel();
        if interrupt {
            self.interrupt.cancel();
            if let Some(handle) = self.handle.take() {
                handle.abort();
            }
        }
    }
}

type JobSlot = Arc<Mutex<Option<ActiveJob>>>;

fn lock_slot(slot: &Mutex<Option<ActiveJob>>) -> MutexGuard<'_, Option<ActiveJob>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone)]
struct JobInputs {
    id: u64,
    ctx: SearchContext,
    delivery: CancellationToken,
    slot: JobSlot,
    builders: Arc<Vec<Arc<dyn SectionBuilder>>>,
    callback: Arc<dyn SearchCallback>,
}

impl JobInputs {
    fn finish(&self, query: &str, results: &[SearchResult]) {
        let factory = TargetFactory::new(&self.ctx.config);
        let targets = translate(results, &self.builders, &factory);
        let items = transform_search_results(targets);

        // Only the installed job may deliver.
        let mut slot = lock_slot(&self.slot);
        let current = slot.as_ref().is_some_and(|job| job.id == self.id);
        if !current || self.delivery.is_cancelled() {
            debug!(job = self.id, "dropping results of cancelled search");
            return;
        }
        *slot = None;
        debug!(job = self.id, items = items.len(), "delivering search results");
        self.callback.on_search_result(query, items);
    }
}

pub struct SearchAggregator {
    model: LauncherModel,
    history: Arc<dyn HistoryStore>,
    providers: Arc<Vec<Arc<dyn SearchProvider>>>,
    calculator: Arc<dyn SearchProvider>,
    builders: Arc<Vec<Arc<dyn SectionBuilder>>>,
    config: RwLock<Arc<Config>>,
    permissions: RwLock<Permissions>,
    runtime: Handle,
    scope: CancellationToken,
    slot: JobSlot,
    next_job: AtomicU64,
}

impl SearchAggregator {
    pub fn new(
        model: LauncherModel,
        history: Arc<dyn HistoryStore>,
        providers: Vec<Arc<dyn SearchProvider>>,
        config: Config,
        permissions: Permissions,
    ) -> Self {
        Self {
            model,
            history,
            providers: Arc::new(providers),
            calculator: Arc::new(CalculatorSearchProvider),
            builders: Arc::new(default_builders()),
            config: RwLock::new(Arc::new(config)),
            permissions: RwLock::new(permissions),
            runtime: Handle::current(),
            scope: CancellationToken::new(),
            slot: Arc::new(Mutex::new(None)),
            next_job: AtomicU64::new(1),
        }
    }

    pub fn with_sections(mut self, builders: Vec<Arc<dyn SectionBuilder>>) -> Self {
        self.builders = Arc::new(builders);
        self
    }

    pub fn with_calculator(mut self, calculator: Arc<dyn SearchProvider>) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn set_config(&self, config: Config) {
        *self.config.write().unwrap_or_else(|p| p.into_inner()) = Arc::new(config);
    }

    pub fn set_permissions(&self, permissions: Permissions) {
        *self.permissions.write().unwrap_or_else(|p| p.into_inner()) = permissions;
    }

    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config.read().unwrap_or_else(|p| p.into_inner()))
    }

    pub fn do_search(&self, query: &str, callback: impl SearchCallback) {
        let query = query.to_string();
        let model = self.model.clone();
        let providers = Arc::clone(&self.providers);
        let calculator = Arc::clone(&self.calculator);

        self.start_job(Arc::new(callback), move |job| async move {
            let apps = match model.snapshot().await {
                Ok(apps) => apps,
                Err(error) => {
                    warn!(%error, "app snapshot unavailable, searching without apps");
                    Arc::new(Vec::new())
                }
            };
            let ctx = &job.ctx;
            let app_results = AppSearchProvider.search(ctx, &query, &apps);
            let shortcut_results = ShortcutSearchProvider.search(ctx, &app_results);

            let streams: Vec<(&'static str, ResultStream)> = providers
                .iter()
                .map(|provider| (provider.id(), guarded_search(provider.as_ref(), ctx, &query)))
                .collect();
            let calc_stream = guarded_search(calculator.as_ref(), ctx, &query);

            let (slow_results, calc_results) =
                tokio::join!(join_first_batches(streams), calc_stream.first_batch());

            let mut merged = app_results;
            merged.extend(shortcut_results);
            merged.extend(calc_results);
            merged.extend(slow_results);
            merged.extend(generate_action_results(ctx, &query));

            job.finish(&query, &merged);
        });
    }

    pub fn do_zero_state_search(&self, callback: impl SearchCallback) {
        let history = Arc::clone(&self.history);

        self.start_job(Arc::new(callback), move |job| async move {
            let limit = job.ctx.config.max_recent_results as usize;
            let recent = tokio::task::spawn_blocking(move || history.recent(limit)).await;
            let keywords = match recent {
                Ok(Ok(keywords)) => keywords,
                Ok(Err(error)) => {
                    warn!(%error, "recent history unavailable");
                    Vec::new()
                }
                Err(error) => {
                    warn!(%error, "recent history task failed");
                    Vec::new()
                }
            };
            let results: Vec<SearchResult> =
                keywords.into_iter().map(SearchResult::History).collect();
            job.finish("", &results);
        });
    }

    /// With `interrupt_active_requests` the job's provider work is stopped too,
    /// not just kept from delivering.
    pub fn cancel(&self, interrupt_active_requests: bool) {
        if let Some(job) = lock_slot(&self.slot).take() {
            debug!(job = job.id, interrupt_active_requests, "cancelling search");
            job.cancel(interrupt_active_requests);
        }
    }

    fn start_job<F, Fut>(&self, callback: Arc<dyn SearchCallback>, body: F)
    where
        F: FnOnce(JobInputs) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let config = self.config();
        let permissions = *self.permissions.read().unwrap_or_else(|p| p.into_inner());
        let id = self.next_job.fetch_add(1, Ordering::Relaxed);
        let interrupt = self.scope.child_token();
        let delivery = interrupt.child_token();

        let inputs = JobInputs {
            id,
            ctx: SearchContext::new(config, permissions).with_interrupt(interrupt.clone()),
            delivery: delivery.clone(),
            slot: Arc::clone(&self.slot),
            builders: Arc::clone(&self.builders),
            callback,
        };
        let future = body(inputs);
        let stop = delivery.clone();

        let mut slot = lock_slot(&self.slot);
        if let Some(previous) = slot.take() {
            debug!(job = previous.id, superseded_by = id, "superseding search");
            previous.cancel(true);
        }
        let handle = self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = stop.cancelled() => {}
                _ = future => {}
            }
        });
        *slot = Some(ActiveJob {
            id,
            delivery,
            interrupt,
            handle: Some(handle),
        });
    }
}

impl Drop for SearchAggregator {
    fn drop(&mut self) {
        self.cancel(true);
        self.scope.cancel();
    }
}

fn guarded_search(provider: &dyn SearchProvider, ctx: &SearchContext, query: &str) -> ResultStream {
    match std::panic::catch_unwind(AssertUnwindSafe(|| provider.search(ctx, query))) {
        Ok(stream) => stream,
        Err(_) => {
            warn!(provider = provider.id(), "provider panicked, emitting no results");
            ResultStream::empty()
        }
    }
}

async fn join_first_batches(streams: Vec<(&'static str, ResultStream)>) -> Vec<SearchResult> {
    let mut merged = Vec::new();
    for (id, stream) in streams {
        let batch = stream.first_batch().await;
        debug!(provider = id, count = batch.len(), "provider answered");
        merged.extend(batch);
    }
    merged
}
