// Lambda invocation tests
//
// Drives `handle_event` with synthetic LambdaEvents against in-memory and
// filesystem-backed stores.

use archdiagram_core::{DiagramHandler, HandlerConfig, MemoryStore};
use archdiagram_lambda::handle_event;
use archdiagram_storage::OpendalStore;
use lambda_runtime::{Context, LambdaEvent};
use serde_json::{json, Value};

fn event(payload: Value) -> LambdaEvent<Value> {
    LambdaEvent::new(payload, Context::default())
}

#[tokio::test]
async fn returns_success_envelope() {
    let handler = DiagramHandler::new(
        MemoryStore::new(),
        HandlerConfig::new(Some("review-files".to_string())),
    );

    let output = handle_event(event(json!({ "documentId": "doc-1" })), &handler)
        .await
        .unwrap();
    let value = serde_json::to_value(&output).unwrap();

    assert_eq!(value["output"]["documentId"], "doc-1");
    assert_eq!(value["output"]["bucket"], "review-files");
    let key = value["output"]["s3Key"].as_str().unwrap();
    assert!(key.starts_with("diagrams/doc-1/architecture-") && key.ends_with(".mmd"));
    assert!(value["output"]["mermaidCode"]
        .as_str()
        .unwrap()
        .contains("Okta SSO"));
    assert_eq!(handler.store().len(), 1);
}

#[tokio::test]
async fn validation_error_is_not_a_runtime_error() {
    let handler = DiagramHandler::new(
        MemoryStore::new(),
        HandlerConfig::new(Some("review-files".to_string())),
    );

    let output = handle_event(event(json!({})), &handler).await.unwrap();
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({ "output": { "error": "documentId is required" } })
    );
    assert!(handler.store().is_empty());
}

#[tokio::test]
async fn missing_bucket_reports_store_failure() {
    let dir = tempfile::tempdir().unwrap();
    let handler = DiagramHandler::new(OpendalStore::fs(dir.path()), HandlerConfig::new(None));

    let output = handle_event(event(json!({ "documentId": "doc-4" })), &handler)
        .await
        .unwrap();
    let error = output.output.error().expect("error envelope");
    assert!(error.contains("bucket name is empty"), "{error}");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn writes_artifact_through_opendal() {
    let dir = tempfile::tempdir().unwrap();
    let handler = DiagramHandler::new(
        OpendalStore::fs(dir.path()),
        HandlerConfig::new(Some("review-files".to_string())),
    );

    let output = handle_event(
        event(json!({ "documentId": "doc-2", "diagramType": "generic" })),
        &handler,
    )
    .await
    .unwrap();
    let value = serde_json::to_value(&output).unwrap();
    let key = value["output"]["s3Key"].as_str().unwrap();

    let written = std::fs::read_to_string(dir.path().join("review-files").join(key)).unwrap();
    assert!(written.contains("CloudFront"));
    assert_eq!(written, value["output"]["mermaidCode"].as_str().unwrap());
}

#[tokio::test]
async fn document_id_cannot_escape_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    let handler = DiagramHandler::new(
        OpendalStore::fs(&root),
        HandlerConfig::new(Some("b".to_string())),
    );

    let output = handle_event(
        event(json!({ "documentId": "../../../escaped" })),
        &handler,
    )
    .await
    .unwrap();
    assert!(!output.is_success());
    assert!(!dir.path().join("escaped").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
