use std::sync::Arc;

use async_trait::async_trait;
use launchsearch_core::config::Config;
use launchsearch_core::model::{ContactInfo, FileKind};
use launchsearch_core::providers::{
    CalculatorSearchProvider, ContactsSearchProvider, ContactsSource, FileSearchProvider,
    Permissions, ProviderError, SearchContext, SearchProvider, SettingsSearchProvider,
    SqliteContactsSource, SuggestionClient, WebSuggestionProvider,
};
use launchsearch_core::result::SearchResult;

fn ctx_with(cfg: Config, permissions: Permissions) -> SearchContext {
    SearchContext::new(Arc::new(cfg), permissions)
}

struct FixedClient(Result<String, u16>);

#[async_trait]
impl SuggestionClient for FixedClient {
    async fn fetch(&self, _url: &str) -> Result<String, ProviderError> {
        self.0.clone().map_err(ProviderError::Status)
    }
}

#[tokio::test]
async fn calculator_emits_single_result_for_expressions() {
    let ctx = ctx_with(Config::default(), Permissions::default());

    let results = CalculatorSearchProvider.search(&ctx, "2 + 3 * 4").first_batch().await;
    match results.as_slice() {
        [SearchResult::Calculation(calc)] => {
            assert_eq!(calc.result, "14");
            assert!(calc.is_valid);
        }
        other => panic!("unexpected calculator output: {other:?}"),
    }

    let plain = CalculatorSearchProvider.search(&ctx, "maps").first_batch().await;
    assert!(plain.is_empty());
}

#[tokio::test]
async fn calculator_respects_toggle() {
    let cfg = Config {
        search_result_calculator: false,
        ..Config::default()
    };
    let ctx = ctx_with(cfg, Permissions::default());
    assert!(CalculatorSearchProvider.search(&ctx, "1+1").first_batch().await.is_empty());
}

#[tokio::test]
async fn settings_provider_caps_results() {
    let cfg = Config {
        max_settings_results: 1,
        ..Config::default()
    };
    let ctx = ctx_with(cfg, Permissions::default());

    let results = SettingsSearchProvider.search(&ctx, "wifi").first_batch().await;
    assert_eq!(results.len(), 1);
    assert!(matches!(&results[0], SearchResult::Setting(s) if s.id == "wifi"));

    assert!(SettingsSearchProvider.search(&ctx, "  ").first_batch().await.is_empty());
}

#[tokio::test]
async fn file_provider_finds_names_newest_first_and_skips_hidden() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("docs")).unwrap();
    std::fs::create_dir_all(dir.path().join(".cache")).unwrap();
    std::fs::write(dir.path().join("docs").join("report-2023.pdf"), b"old").unwrap();
    std::fs::write(dir.path().join(".cache").join("report.tmp"), b"hidden").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"other").unwrap();

    let cfg = Config {
        file_search_roots: vec![dir.path().to_path_buf()],
        ..Config::default()
    };
    let ctx = ctx_with(cfg, Permissions::all());

    let results = FileSearchProvider.search(&ctx, "REPORT").first_batch().await;
    assert_eq!(results.len(), 1);
    match &results[0] {
        SearchResult::File(file) => {
            assert_eq!(file.title, "report-2023.pdf");
            assert_eq!(file.kind, FileKind::File);
            assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn file_provider_without_permission_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("report.txt"), b"x").unwrap();
    let cfg = Config {
        file_search_roots: vec![dir.path().to_path_buf()],
        ..Config::default()
    };
    let ctx = ctx_with(cfg, Permissions::default());

    assert!(FileSearchProvider.search(&ctx, "report").first_batch().await.is_empty());
}

#[tokio::test]
async fn contacts_provider_matches_name_phone_or_email() {
    let source = SqliteContactsSource::open_memory().unwrap();
    for (id, name, phone, email) in [
        ("1", "Ada Lovelace", "+44 100", "ada@example.com"),
        ("2", "Alan Turing", "+44 200", "alan@example.com"),
        ("3", "Grace Hopper", "+1 300", "grace@navy.mil"),
    ] {
        source
            .upsert(&ContactInfo {
                id: id.into(),
                display_name: name.into(),
                phone: phone.into(),
                email: email.into(),
            })
            .unwrap();
    }
    let provider = ContactsSearchProvider::new(Arc::new(source));
    let ctx = ctx_with(Config::default(), Permissions::all());

    let by_name = provider.search(&ctx, "ada").first_batch().await;
    assert_eq!(by_name.len(), 1);

    let by_phone = provider.search(&ctx, "+44").first_batch().await;
    assert_eq!(by_phone.len(), 2);

    let by_email = provider.search(&ctx, "navy").first_batch().await;
    assert!(matches!(&by_email[0], SearchResult::Contact(c) if c.display_name == "Grace Hopper"));
}

#[test]
fn contact_wildcards_match_literally() {
    let source = SqliteContactsSource::open_memory().unwrap();
    for (id, name, email) in [
        ("1", "Ada Lovelace", "ada@example.com"),
        ("2", "Alan Turing", "alan@example.com"),
        ("3", "deal_bot", "50%off@shop.example"),
    ] {
        source
            .upsert(&ContactInfo {
                id: id.into(),
                display_name: name.into(),
                phone: String::new(),
                email: email.into(),
            })
            .unwrap();
    }

    let percent = source.query("%", 10).unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].id, "3");

    let underscore = source.query("_", 10).unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].id, "3");

    assert!(source.query("\\", 10).unwrap().is_empty());
}

#[test]
fn contacts_store_reports_unusable_directory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let result = SqliteContactsSource::open(&blocker.join("nested").join("contacts.sqlite3"));
    assert!(matches!(result, Err(ProviderError::Io(_))));
}

#[tokio::test]
async fn contacts_permission_denial_yields_empty_batch() {
    let source = SqliteContactsSource::open_memory().unwrap();
    let provider = ContactsSearchProvider::new(Arc::new(source));
    let ctx = ctx_with(Config::default(), Permissions::default());

    assert!(provider.search(&ctx, "ada").first_batch().await.is_empty());
}

#[tokio::test]
async fn web_suggestions_parse_and_cap() {
    let body = r#"["rust", ["rust lang", "rust book", "rustup", "rust analyzer"]]"#;
    let provider = WebSuggestionProvider::new(Arc::new(FixedClient(Ok(body.to_string()))));
    let ctx = ctx_with(Config::default(), Permissions::default());

    let results = provider.search(&ctx, "rust").first_batch().await;
    let suggestions: Vec<&str> = results
        .iter()
        .filter_map(|r| match r {
            SearchResult::WebSuggestion { suggestion, provider } => {
                assert_eq!(provider, "startpage");
                Some(suggestion.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(suggestions, vec!["rust lang", "rust book", "rustup"]);
}

#[tokio::test]
async fn web_suggestion_failures_become_empty() {
    let ctx = ctx_with(Config::default(), Permissions::default());

    let failing = WebSuggestionProvider::new(Arc::new(FixedClient(Err(503))));
    assert!(failing.search(&ctx, "rust").first_batch().await.is_empty());

    let garbage = WebSuggestionProvider::new(Arc::new(FixedClient(Ok("<html>".into()))));
    assert!(garbage.search(&ctx, "rust").first_batch().await.is_empty());
}

#[tokio::test]
async fn interrupted_provider_closes_without_emitting() {
    let ctx = ctx_with(Config::default(), Permissions::default());
    ctx.interrupt.cancel();

    let provider = WebSuggestionProvider::new(Arc::new(FixedClient(Ok(r#"["a",["b"]]"#.into()))));
    let mut stream = provider.search(&ctx, "rust");
    assert_eq!(stream.next_batch().await, None);
}
