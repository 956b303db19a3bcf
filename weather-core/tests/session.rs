//! Integration tests for QuerySession publication rules.

mod common;

use std::time::Duration;

use common::*;
use weatherly_core::{Config, QueryError, QuerySession};
use wiremock::MockServer;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_search_publishes_result_and_clears_error() {
    let server = MockServer::start().await;
    mount_geo(&server, "Lisbon", geo_body("Lisbon", 38.72, -9.14), Duration::ZERO).await;
    mount_lookups(&server, "38.72", 20.0, 30, 1).await;

    let session = QuerySession::new(pipeline_for(&server, TIMEOUT));

    let err = session.search("   ").await.unwrap_err();
    assert!(matches!(err, QueryError::Validation));
    assert_eq!(session.snapshot().error, Some("Please enter a city or village."));

    let result = session.search("Lisbon").await.unwrap();
    let snapshot = session.snapshot();

    assert_eq!(snapshot.query, "Lisbon");
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.result.as_deref(), Some(result.as_ref()));
}

#[tokio::test]
async fn test_newer_search_wins_over_slower_older_one() {
    let server = MockServer::start().await;
    mount_geo(&server, "Slowtown", geo_body("Slowtown", 10.5, 1.0), Duration::from_millis(800)).await;
    mount_geo(&server, "Fasttown", geo_body("Fasttown", 20.5, 2.0), Duration::ZERO).await;
    mount_lookups(&server, "10.5", 5.0, 10, 3).await;
    mount_lookups(&server, "20.5", 25.0, 10, 1).await;

    let session = QuerySession::new(pipeline_for(&server, TIMEOUT));

    let (first, second) = tokio::join!(session.search("Slowtown"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.search("Fasttown").await
    });

    assert!(first.unwrap_err().is_cancelled());
    let second = second.unwrap();
    assert_eq!(second.place.name, "Fasttown");

    // Give any straggling response time to land; it must not be published.
    tokio::time::sleep(Duration::from_millis(900)).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.query, "Fasttown");
    assert_eq!(snapshot.result.map(|r| r.place.name.clone()).as_deref(), Some("Fasttown"));
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn test_not_found_is_published_as_user_error() {
    let server = MockServer::start().await;
    mount_geo(&server, "Zzqxnotaplace", serde_json::json!([]), Duration::ZERO).await;

    let session = QuerySession::new(pipeline_for(&server, TIMEOUT));
    let err = session.search("Zzqxnotaplace").await.unwrap_err();

    assert!(matches!(err, QueryError::NotFound(_)));
    let snapshot = session.snapshot();
    assert_eq!(snapshot.error, Some("City not found. Try another name."));
    assert!(snapshot.result.is_none());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_clear_discards_in_flight_search() {
    let server = MockServer::start().await;
    mount_geo(&server, "Slowtown", geo_body("Slowtown", 10.5, 1.0), Duration::from_millis(500)).await;
    mount_lookups(&server, "10.5", 5.0, 10, 3).await;

    let session = QuerySession::new(pipeline_for(&server, TIMEOUT));

    let (outcome, ()) = tokio::join!(session.search("Slowtown"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.clear();
    });

    assert!(outcome.unwrap_err().is_cancelled());
    let snapshot = session.snapshot();
    assert!(snapshot.result.is_none());
    assert!(snapshot.query.is_empty());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_dropped_search_does_not_leave_loading_set() {
    let server = MockServer::start().await;
    mount_geo(&server, "Slowtown", geo_body("Slowtown", 10.5, 1.0), Duration::from_millis(500)).await;
    mount_geo(&server, "Lisbon", geo_body("Lisbon", 38.72, -9.14), Duration::ZERO).await;
    mount_lookups(&server, "10.5", 5.0, 10, 3).await;
    mount_lookups(&server, "38.72", 20.0, 30, 1).await;

    let session = QuerySession::new(pipeline_for(&server, TIMEOUT));

    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), session.search("Slowtown")).await;
    assert!(timed_out.is_err());

    let snapshot = session.snapshot();
    assert!(!snapshot.loading);
    assert!(snapshot.result.is_none());
    assert_eq!(snapshot.error, None);

    // The abandoned geocode response arriving later changes nothing.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(!session.snapshot().loading);
    assert!(session.snapshot().result.is_none());

    let result = session.search("Lisbon").await.unwrap();
    assert_eq!(result.place.name, "Lisbon");
    assert!(!session.snapshot().loading);
}

#[tokio::test]
async fn test_session_from_config_uses_base_url() {
    let server = MockServer::start().await;
    mount_geo(&server, "Lisbon", geo_body("Lisbon", 38.72, -9.14), Duration::ZERO).await;
    mount_lookups(&server, "38.72", 20.0, 30, 1).await;

    let mut config = Config { base_url: server.uri(), ..Config::default() };
    config.set_api_key(API_KEY.to_string());

    let session = QuerySession::from_config(&config).expect("session");
    let result = session.search("Lisbon").await.unwrap();
    assert_eq!(result.place.country, "PT");
}
