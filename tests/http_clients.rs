//! Wire-level tests for the two HTTP collaborator clients, against a
//! local wiremock server.

use recording_ingestor::api::{HttpIngestionApiClient, IngestionApiClient};
use recording_ingestor::model::Metadata;
use recording_ingestor::storage::{BlobStorageClient, SourceStorageClient};

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_metadata() -> Metadata {
    Metadata {
        folder: "court-a".to_string(),
        filename: "case-1_2020-07-16-10.07.31.680-UTC_0.mp4".to_string(),
        source_url: "https://store/recordings/abc".to_string(),
        content_hash: "cafebabe".to_string(),
        case_ref: "case-1".to_string(),
        recording_datetime: Utc.with_ymd_and_hms(2020, 7, 16, 10, 7, 31).unwrap(),
        segment: 0,
    }
}

#[tokio::test]
async fn storage_client_lists_folders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/folders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["court-a", "court-b"])))
        .mount(&server)
        .await;

    let client = BlobStorageClient::new(server.uri(), None).unwrap();
    let folders = client.list_folders().await.unwrap();

    assert_eq!(folders, vec!["court-a".to_string(), "court-b".to_string()]);
}

#[tokio::test]
async fn storage_client_lists_items_with_and_without_checksums() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/folders/court-a/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "filename": "a.mp4", "uri": "https://store/a", "content_hash": "abc" },
            { "filename": "b.mp4", "uri": "https://store/b" }
        ])))
        .mount(&server)
        .await;

    let client = BlobStorageClient::new(server.uri(), None).unwrap();
    let set = client.list_items("court-a").await.unwrap();

    assert_eq!(set.len(), 2);
    let without_hash = set
        .items
        .iter()
        .find(|i| i.filename == "b.mp4")
        .expect("b.mp4 listed");
    assert!(without_hash.content_hash.is_empty());
}

#[tokio::test]
async fn storage_client_rejects_listings_with_duplicate_filenames() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/folders/court-a/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "filename": "a.mp4", "uri": "https://store/a1" },
            { "filename": "a.mp4", "uri": "https://store/a2" }
        ])))
        .mount(&server)
        .await;

    let client = BlobStorageClient::new(server.uri(), None).unwrap();

    assert!(client.list_items("court-a").await.is_err());
}

#[tokio::test]
async fn storage_client_appends_the_sas_token_to_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/folders"))
        .and(wiremock::matchers::query_param("sig", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = BlobStorageClient::new(server.uri(), Some("sig=tok".to_string())).unwrap();
    let folders = client.list_folders().await.unwrap();

    assert!(folders.is_empty());
}

#[tokio::test]
async fn storage_client_reads_content_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recordings/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"recording".to_vec()))
        .mount(&server)
        .await;

    let client = BlobStorageClient::new(server.uri(), None).unwrap();
    let content = client
        .read_content(&format!("{}/recordings/abc", server.uri()))
        .await
        .unwrap();

    assert_eq!(content, b"recording");
}

#[tokio::test]
async fn api_client_fetches_ingested_filenames_with_subscription_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/folders/court-a"))
        .and(header("Ocp-Apim-Subscription-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "folder-name": "court-a",
            "filenames": ["a.mp4", "b.mp4"]
        })))
        .mount(&server)
        .await;

    let client = HttpIngestionApiClient::new(server.uri(), "secret").unwrap();
    let set = client.ingested_filenames("court-a").await.unwrap();

    assert_eq!(set.len(), 2);
    assert!(set.contains("a.mp4"));
}

#[tokio::test]
async fn api_client_surfaces_status_and_body_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/folders/court-a"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .mount(&server)
        .await;

    let client = HttpIngestionApiClient::new(server.uri(), "secret").unwrap();
    let err = client.ingested_filenames("court-a").await.unwrap_err();

    assert_eq!(err.code, 503);
    assert_eq!(err.body, "maintenance window");
}

#[tokio::test]
async fn api_client_submits_metadata_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/segments"))
        .and(header("Ocp-Apim-Subscription-Key", "secret"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpIngestionApiClient::new(server.uri(), "secret").unwrap();

    client.submit(&sample_metadata()).await.unwrap();
}

#[tokio::test]
async fn api_client_turns_rejected_submissions_into_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/segments"))
        .respond_with(ResponseTemplate::new(409).set_body_string("segment already present"))
        .mount(&server)
        .await;

    let client = HttpIngestionApiClient::new(server.uri(), "secret").unwrap();
    let err = client.submit(&sample_metadata()).await.unwrap_err();

    assert_eq!(err.code, 409);
    assert_eq!(err.body, "segment already present");
}
