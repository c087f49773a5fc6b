//! HTTP tests for country metadata, saved preferences and derived views.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{fixtures, TestFixture};
use pickbook_core::{MetadataError, PreferenceError};

fn ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("items array")
        .iter()
        .filter_map(|item| item["id"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/health").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_get_metadata() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/countries/tr/metadata").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["country_id"], "tr");
    assert_eq!(response.body["categories"].as_array().unwrap().len(), 3);
    assert_eq!(response.body["categories"][0]["id"], "ottoman");
    assert_eq!(response.body["sort_options"][1]["field_name"], "extPick");
    assert_eq!(response.body["sort_options"][1]["is_required"], true);
}

#[tokio::test]
async fn test_unknown_country_has_empty_metadata() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/countries/xx/metadata").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["categories"], json!([]));
    assert_eq!(response.body["types"], json!([]));
}

#[tokio::test]
async fn test_metadata_failure_is_server_error() {
    let fixture = TestFixture::new().await;
    fixture
        .metadata
        .set_next_error(MetadataError::Database("disk I/O error".to_string()))
        .await;

    let response = fixture.get("/api/v1/countries/tr/metadata").await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("disk I/O error"));
}

#[tokio::test]
async fn test_get_preference() {
    let fixture = TestFixture::new().await;
    fixture
        .preferences
        .set_preference("u1", "tr", fixtures::saved_preference())
        .await;

    let response = fixture.get("/api/v1/countries/tr/preferences/u1").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["selected_categories"], json!(["first"]));
    assert_eq!(response.body["selected_sort_options"], json!(["sort-newest"]));
}

#[tokio::test]
async fn test_missing_preference_is_not_found() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/v1/countries/tr/preferences/nobody").await;

    assert_status!(response, StatusCode::NOT_FOUND);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_preference_failure_is_server_error() {
    let fixture = TestFixture::new().await;
    fixture
        .preferences
        .set_next_error(PreferenceError::Unavailable("offline".to_string()))
        .await;

    let response = fixture.get("/api/v1/countries/tr/preferences/u1").await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_view_with_defaults() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/countries/tr/view",
            json!({ "items": fixtures::turkey_records() }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["loading"], false);
    assert_eq!(response.body["filters"]["sort"], json!(["sultan", "extPick"]));
    assert_eq!(ids(&response.body["items"]), vec!["n2", "n1", "n4", "n6"]);

    let groups = response.body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0]["category"], "Ottoman Empire");
    assert_eq!(groups[0]["sultan_groups"][0]["sultan"], "Abdulmecid");
}

#[tokio::test]
async fn test_view_uses_saved_preference() {
    let fixture = TestFixture::new().await;
    fixture
        .preferences
        .set_preference("u1", "tr", fixtures::saved_preference())
        .await;

    let response = fixture
        .post(
            "/api/v1/countries/tr/view",
            json!({ "user_id": "u1", "items": fixtures::turkey_records() }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["filters"]["categories"], json!(["first"]));
    assert_eq!(response.body["filters"]["sort"], json!(["newest", "extPick"]));
    assert_eq!(ids(&response.body["items"]), vec!["n4"]);
    assert_eq!(
        fixture.preferences.recorded_gets().await,
        vec![("u1".to_string(), "tr".to_string())]
    );
}

#[tokio::test]
async fn test_view_applies_filter_changes() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/countries/tr/view",
            json!({
                "items": fixtures::turkey_records(),
                "filters": { "types": ["specimen", "trial"], "sort": ["faceValue"] }
            }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(
        response.body["filters"]["sort"],
        json!(["faceValue", "extPick"])
    );
    assert_eq!(ids(&response.body["items"]), vec!["col-1", "n3"]);
}

#[tokio::test]
async fn test_view_search_spans_fields() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/v1/countries/tr/view",
            json!({
                "items": fixtures::turkey_records(),
                "filters": { "search": "1927" }
            }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(ids(&response.body["items"]), vec!["n4"]);
}

#[tokio::test]
async fn test_view_without_items() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/v1/countries/gr/view", json!({})).await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["items"], json!([]));
    assert_eq!(response.body["groups"], json!([]));
    assert_eq!(response.body["filters"]["country_id"], "gr");
}

#[tokio::test]
async fn test_metrics_count_api_requests() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/v1/countries/tr/metadata").await;

    let response = fixture.get("/metrics").await;

    assert_status!(response, StatusCode::OK);
    assert!(response
        .text
        .contains("/api/v1/countries/{country_id}/metadata"));
}
