use std::sync::Arc;
use std::time::Duration;

use launchsearch_core::config::Config;
use launchsearch_core::contract::{
    CancelRequest, CoreEvent, CoreRequest, CoreResponse, RecordHistoryRequest, SearchRequest,
};
use launchsearch_core::core_service::{CoreService, ServiceError};
use launchsearch_core::launcher_model::LauncherModel;
use launchsearch_core::model::AppInfo;
use launchsearch_core::providers::{HistoryStore, Permissions, SqliteHistoryStore};
use launchsearch_core::sections::SearchTarget;
use tokio::sync::mpsc;

fn service(apps: Vec<AppInfo>, history: Arc<dyn HistoryStore>) -> CoreService {
    let config = Config {
        search_result_web_suggestions: false,
        ..Config::default()
    };
    CoreService::with_parts(
        config,
        Permissions::default(),
        LauncherModel::spawn(apps),
        history,
        Vec::new(),
    )
    .unwrap()
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<CoreEvent>) -> CoreEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event should arrive")
        .expect("event channel should stay open")
}

#[tokio::test]
async fn search_command_is_accepted_and_results_follow() {
    let service = service(
        vec![
            AppInfo::new("com.x.calc", "Calculator"),
            AppInfo::new("com.x.cal", "Calendar"),
        ],
        Arc::new(SqliteHistoryStore::open_memory().unwrap()),
    );
    let (events, mut rx) = mpsc::unbounded_channel();

    let response = service
        .handle_command(
            CoreRequest::Search(SearchRequest {
                query: "calc".into(),
            }),
            &events,
        )
        .unwrap();
    assert!(matches!(response, CoreResponse::Search(ref accepted) if accepted.job == "calc"));

    let CoreEvent::Results(results) = next_event(&mut rx).await;
    assert_eq!(results.query, "calc");
    assert!(matches!(
        &results.items[0].target,
        SearchTarget::App { app, .. } if app.title == "Calculator"
    ));
}

#[tokio::test]
async fn recorded_history_shows_up_in_zero_state() {
    let service = service(
        Vec::new(),
        Arc::new(SqliteHistoryStore::open_memory().unwrap()),
    );
    let (events, mut rx) = mpsc::unbounded_channel();

    let response = service
        .handle_command(
            CoreRequest::RecordHistory(RecordHistoryRequest {
                keyword: "weather".into(),
            }),
            &events,
        )
        .unwrap();
    assert!(matches!(response, CoreResponse::RecordHistory(ref r) if r.recorded));

    service
        .handle_command(CoreRequest::ZeroState, &events)
        .unwrap();
    let CoreEvent::Results(results) = next_event(&mut rx).await;
    assert_eq!(results.query, "");
    assert!(results.items.iter().any(
        |item| matches!(&item.target, SearchTarget::History { keyword } if keyword.keyword == "weather")
    ));
}

#[tokio::test]
async fn blank_history_keyword_is_rejected() {
    let service = service(
        Vec::new(),
        Arc::new(SqliteHistoryStore::open_memory().unwrap()),
    );

    let error = service.record_history("   ").unwrap_err();
    assert!(matches!(error, ServiceError::InvalidRequest(_)));
}

#[tokio::test]
async fn cancel_command_suppresses_pending_results() {
    let service = service(
        vec![AppInfo::new("com.x.maps", "Maps")],
        Arc::new(SqliteHistoryStore::open_memory().unwrap()),
    );
    let (events, mut rx) = mpsc::unbounded_channel();

    service
        .handle_command(
            CoreRequest::Search(SearchRequest {
                query: "maps".into(),
            }),
            &events,
        )
        .unwrap();
    let response = service
        .handle_command(CoreRequest::Cancel(CancelRequest { interrupt: true }), &events)
        .unwrap();
    assert_eq!(response, CoreResponse::Cancel);

    // A delivery may already have won the race; nothing may follow it.
    let _ = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(tokio::time::timeout(Duration::from_millis(200), rx.recv())
        .await
        .is_err());
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let config = Config {
        max_app_results: 0,
        ..Config::default()
    };
    let result = CoreService::with_parts(
        config,
        Permissions::default(),
        LauncherModel::spawn(Vec::new()),
        Arc::new(SqliteHistoryStore::open_memory().unwrap()),
        Vec::new(),
    );
    assert!(matches!(result, Err(ServiceError::Config(_))));
}

#[tokio::test]
async fn model_updates_are_visible_to_later_searches() {
    let service = service(
        Vec::new(),
        Arc::new(SqliteHistoryStore::open_memory().unwrap()),
    );
    service
        .model()
        .replace_all(vec![AppInfo::new("com.x.notes", "Notes")])
        .unwrap();
    let (events, mut rx) = mpsc::unbounded_channel();

    service
        .handle_command(
            CoreRequest::Search(SearchRequest {
                query: "notes".into(),
            }),
            &events,
        )
        .unwrap();
    let CoreEvent::Results(results) = next_event(&mut rx).await;
    assert!(matches!(&results.items[0].target, SearchTarget::App { .. }));
}
