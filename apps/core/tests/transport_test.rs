use std::sync::Arc;

use launchsearch_core::config::Config;
use launchsearch_core::contract::{CoreEvent, CoreRequest, CoreResponse, SearchRequest};
use launchsearch_core::core_service::CoreService;
use launchsearch_core::launcher_model::LauncherModel;
use launchsearch_core::model::AppInfo;
use launchsearch_core::providers::{Permissions, SqliteHistoryStore};
use launchsearch_core::transport::{handle_json, handle_request, ErrorCode, TransportResponse};
use tokio::sync::mpsc;

fn service_with_seed_app() -> CoreService {
    CoreService::with_parts(
        Config::default(),
        Permissions::default(),
        LauncherModel::spawn(vec![AppInfo::new("com.x.code", "Code")]),
        Arc::new(SqliteHistoryStore::open_memory().unwrap()),
        Vec::new(),
    )
    .unwrap()
}

#[tokio::test]
async fn request_handler_returns_ok_transport_response() {
    let service = service_with_seed_app();
    let (events, _rx) = mpsc::unbounded_channel::<CoreEvent>();

    let response = handle_request(
        &service,
        CoreRequest::Search(SearchRequest {
            query: "code".into(),
        }),
        &events,
    );

    match response {
        TransportResponse::Ok { response } => {
            assert!(matches!(response, CoreResponse::Search(_)));
            let encoded = serde_json::to_string(&TransportResponse::Ok { response }).unwrap();
            assert!(encoded.contains("\"status\":\"ok\""));
        }
        other => panic!("expected ok transport response, got {other:?}"),
    }
}

#[tokio::test]
async fn json_handler_reports_invalid_json() {
    let service = service_with_seed_app();
    let (events, _rx) = mpsc::unbounded_channel::<CoreEvent>();

    let raw = handle_json(&service, "{not json", &events);
    let response: TransportResponse = serde_json::from_str(&raw).unwrap();

    match response {
        TransportResponse::Err { error } => assert_eq!(error.code, ErrorCode::InvalidJson),
        other => panic!("expected error response, got {other:?}"),
    }
}

#[tokio::test]
async fn json_handler_maps_blank_keyword_to_invalid_request() {
    let service = service_with_seed_app();
    let (events, _rx) = mpsc::unbounded_channel::<CoreEvent>();

    let raw = handle_json(
        &service,
        r#"{"kind":"RecordHistory","payload":{"keyword":"  "}}"#,
        &events,
    );
    let response: TransportResponse = serde_json::from_str(&raw).unwrap();

    match response {
        TransportResponse::Err { error } => {
            assert_eq!(error.code, ErrorCode::InvalidRequest);
            assert!(error.message.contains("keyword"));
        }
        other => panic!("expected error response, got {other:?}"),
    }
}

#[tokio::test]
async fn json_search_emits_results_event() {
    let service = service_with_seed_app();
    let (events, mut rx) = mpsc::unbounded_channel::<CoreEvent>();

    let raw = handle_json(
        &service,
        r#"{"kind":"Search","payload":{"query":"code"}}"#,
        &events,
    );
    assert!(raw.contains("\"status\":\"ok\""));

    let event = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let CoreEvent::Results(results) = event;
    assert_eq!(results.query, "code");
    assert!(!results.items.is_empty());
}
