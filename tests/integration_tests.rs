//! Integration tests for Open Library Search
//!
//! These drive the search controller against a mock HTTP server standing in
//! for the Open Library search endpoint, and check what the renderer shows.

use mockito::Matcher;
use openlibrary_search::config::ApiConfig;
use openlibrary_search::controller::{ResultState, SearchController, SearchFailure};
use openlibrary_search::models::SearchCategory;
use openlibrary_search::render::{render, CatalogLinks, View, UNKNOWN_AUTHOR};
use openlibrary_search::sources::{OpenLibrarySource, SEARCH_PATH};

fn source_for(server: &mockito::Server) -> OpenLibrarySource {
    let config = ApiConfig {
        base_url: server.url(),
        ..ApiConfig::default()
    };
    OpenLibrarySource::from_config(&config).unwrap()
}

const TWO_SPACE_BOOKS: &str = r#"{
    "numFound": 5412,
    "start": 0,
    "docs": [
        {
            "key": "/works/OL17930368W",
            "title": "The Martian",
            "author_name": ["Andy Weir"],
            "cover_i": 11447888
        },
        {
            "key": "/works/OL46125W",
            "title": "Cosmos",
            "author_name": ["Carl Sagan", "Ann Druyan"]
        }
    ]
}"#;

#[tokio::test]
async fn test_subject_search_scenario() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Exact("subject=space&limit=24".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TWO_SPACE_BOOKS)
        .expect(1)
        .create_async()
        .await;

    let source = source_for(&server);
    let mut controller = SearchController::new();
    controller.set_category(SearchCategory::Subject);
    controller.set_input("space");

    assert!(controller.submit_and_run(&source).await);
    mock.assert_async().await;

    let links = CatalogLinks::default();
    let view = render(controller.state(), &links);
    let cards = view.cards().expect("grid view");
    assert_eq!(cards.len(), 2);

    assert_eq!(cards[0].title, "The Martian");
    assert_eq!(cards[0].authors, "Andy Weir");
    assert_eq!(
        cards[0].cover.src(),
        "https://covers.openlibrary.org/b/id/11447888-L.jpg"
    );
    assert_eq!(cards[0].link, "https://openlibrary.org/works/OL17930368W");

    assert_eq!(cards[1].title, "Cosmos");
    assert_eq!(cards[1].authors, "Carl Sagan, Ann Druyan");
    assert!(cards[1].cover.is_placeholder());
    assert_eq!(cards[1].link, "https://openlibrary.org/works/OL46125W");
}

#[tokio::test]
async fn test_empty_docs_is_no_results_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"numFound": 0, "docs": []}"#)
        .create_async()
        .await;

    let source = source_for(&server);
    let mut controller = SearchController::new();
    controller.set_input("qwxzvbnm");
    controller.submit_and_run(&source).await;

    assert_eq!(
        controller.state(),
        &ResultState::Error(SearchFailure::EmptyResult)
    );
    assert_eq!(
        render(controller.state(), &CatalogLinks::default()),
        View::Message {
            text: "No books found. Try a different search.".to_string()
        }
    );
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let source = source_for(&server);
    let mut controller = SearchController::new();
    controller.set_input("dune");
    controller.submit_and_run(&source).await;

    assert_eq!(controller.state().failure(), Some(SearchFailure::Transport));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_failure() {
    let config = ApiConfig {
        // reserved port on localhost, nothing listens there
        base_url: "http://127.0.0.1:9".to_string(),
        ..ApiConfig::default()
    };
    let source = OpenLibrarySource::from_config(&config).unwrap();

    let mut controller = SearchController::new();
    controller.set_input("dune");
    controller.submit_and_run(&source).await;

    assert_eq!(controller.state().failure(), Some(SearchFailure::Transport));
}

#[tokio::test]
async fn test_one_request_per_committed_pair() {
    let mut server = mockito::Server::new_async().await;
    let title_mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::UrlEncoded("title".into(), "dune".into()))
        .with_status(200)
        .with_body(r#"{"docs": [{"key": "/works/OL893415W", "title": "Dune"}]}"#)
        .expect(1)
        .create_async()
        .await;
    let author_mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::UrlEncoded("author".into(), "dune".into()))
        .with_status(200)
        .with_body(r#"{"docs": []}"#)
        .expect(1)
        .create_async()
        .await;

    let source = source_for(&server);
    let mut controller = SearchController::new();

    controller.set_input("dune");
    assert!(controller.submit_and_run(&source).await);
    controller.set_input("  dune");
    assert!(!controller.submit_and_run(&source).await);

    controller.set_category(SearchCategory::Author);
    assert!(controller.submit_and_run(&source).await);
    assert!(!controller.submit_and_run(&source).await);

    title_mock.assert_async().await;
    author_mock.assert_async().await;
    assert_eq!(controller.requests_issued(), 2);
}

#[tokio::test]
async fn test_blank_submission_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let source = source_for(&server);
    let mut controller = SearchController::new();

    assert!(matches!(
        render(controller.state(), &CatalogLinks::default()),
        View::Welcome { .. }
    ));

    controller.set_input("   ");
    assert!(!controller.submit_and_run(&source).await);

    assert!(controller.committed().is_none());
    assert!(matches!(
        render(controller.state(), &CatalogLinks::default()),
        View::Welcome { .. }
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_author_and_cover_render_defaults() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"docs": [{"key": "/works/OL1W", "title": "Beowulf"}]}"#)
        .create_async()
        .await;

    let config = ApiConfig {
        base_url: server.url(),
        placeholder_cover_url: "https://example.com/no-cover.png".to_string(),
        ..ApiConfig::default()
    };
    let source = OpenLibrarySource::from_config(&config).unwrap();

    let mut controller = SearchController::new();
    controller.set_input("beowulf");
    controller.submit_and_run(&source).await;

    let links = CatalogLinks::from(&config);
    let view = render(controller.state(), &links);
    let card = &view.cards().unwrap()[0];
    assert_eq!(card.authors, UNKNOWN_AUTHOR);
    assert_eq!(card.cover.src(), "https://example.com/no-cover.png");
    assert_eq!(card.link, format!("{}/works/OL1W", server.url()));
}
