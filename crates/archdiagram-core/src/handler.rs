// Diagram request handler
//
// Linear flow per invocation: extract request, render template, build key,
// upload, build viewer link. Failures are folded into the `{ output }`
// envelope; the handler never fails outward.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::DiagramError;
use crate::key::storage_key;
use crate::request::DiagramRequest;
use crate::response::{DiagramResponse, DiagramSuccess, HandlerOutput, SUCCESS_MESSAGE};
use crate::storage::ObjectStore;
use crate::template::DiagramKind;
use crate::viewer::{view_url, DEFAULT_VIEWER_BASE_URL};
use crate::DIAGRAM_CONTENT_TYPE;

/// Per-process settings the handler needs at call time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Destination bucket. `None` is passed to the store as an empty name and
    /// surfaces as a storage error on each invocation.
    pub bucket: Option<String>,
    pub viewer_base_url: String,
}

impl HandlerConfig {
    pub fn new(bucket: Option<String>) -> Self {
        Self {
            bucket,
            viewer_base_url: DEFAULT_VIEWER_BASE_URL.to_string(),
        }
    }

    pub fn with_viewer_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.viewer_base_url = base_url.into();
        self
    }

    fn bucket_name(&self) -> &str {
        self.bucket.as_deref().unwrap_or_default()
    }
}

/// Generates, stores, and links architecture diagrams
pub struct DiagramHandler<S> {
    store: S,
    config: HandlerConfig,
}

impl<S: ObjectStore> DiagramHandler<S> {
    pub fn new(store: S, config: HandlerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one invocation event at the current time
    pub async fn handle(&self, event: &Value) -> HandlerOutput {
        self.handle_at(event, Utc::now()).await
    }

    /// Handle one invocation event as if it arrived at `now`
    #[tracing::instrument(
        name = "diagram.generate",
        skip_all,
        fields(
            document_id = tracing::field::Empty,
            diagram_type = tracing::field::Empty,
            s3_key = tracing::field::Empty,
        )
    )]
    pub async fn handle_at(&self, event: &Value, now: DateTime<Utc>) -> HandlerOutput {
        tracing::info!(event = %event, "Received diagram request");

        let result = self.generate(event, now).await;
        match &result {
            Ok(success) => {
                tracing::info!(s3_key = %success.s3_key, "Diagram generated");
            }
            Err(err) if err.is_validation() => {
                tracing::warn!(error = %err, "Rejected diagram request");
            }
            Err(err) => {
                tracing::error!(error = %err, "Diagram generation failed");
            }
        }
        DiagramResponse::from(result).into()
    }

    /// Run the generation steps, returning the success payload or the first failure
    pub async fn generate(
        &self,
        event: &Value,
        now: DateTime<Utc>,
    ) -> Result<DiagramSuccess, DiagramError> {
        let request = DiagramRequest::from_event(event)?;
        let span = tracing::Span::current();
        span.record("document_id", request.document_id.as_str());
        span.record("diagram_type", request.diagram_type.as_str());

        let kind = DiagramKind::from_type_name(&request.diagram_type);
        let mermaid_code = kind.render(&request.description);

        let s3_key = storage_key(&request.document_id, now);
        span.record("s3_key", s3_key.as_str());

        let bucket = self.config.bucket_name();
        self.store
            .put_object(
                bucket,
                &s3_key,
                mermaid_code.as_bytes().to_vec(),
                DIAGRAM_CONTENT_TYPE,
            )
            .await?;
        tracing::debug!(bucket, bytes = mermaid_code.len(), template = %kind, "Uploaded diagram");

        let view_url = view_url(&self.config.viewer_base_url, &mermaid_code)?;

        Ok(DiagramSuccess {
            message: SUCCESS_MESSAGE.to_string(),
            document_id: request.document_id,
            s3_key,
            bucket: bucket.to_string(),
            mermaid_code,
            view_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn handler() -> DiagramHandler<MemoryStore> {
        DiagramHandler::new(
            MemoryStore::new(),
            HandlerConfig::new(Some("architecture-files".to_string())),
        )
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 15).unwrap()
    }

    #[tokio::test]
    async fn stores_one_artifact_per_success() {
        let handler = handler();
        let success = handler
            .generate(&json!({ "documentId": "doc-1" }), fixed_time())
            .await
            .unwrap();

        assert_eq!(success.s3_key, "diagrams/doc-1/architecture-20240601-093015.mmd");
        assert_eq!(success.bucket, "architecture-files");
        assert_eq!(success.message, SUCCESS_MESSAGE);

        let objects = handler.store().objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].key, success.s3_key);
        assert_eq!(objects[0].content_type, "text/plain");
        assert_eq!(objects[0].body, success.mermaid_code.as_bytes());
    }

    #[tokio::test]
    async fn validation_failure_writes_nothing() {
        let handler = handler();
        let output = handler.handle_at(&json!({}), fixed_time()).await;
        assert_eq!(output.output.error(), Some("documentId is required"));
        assert!(handler.store().is_empty());
    }

    #[tokio::test]
    async fn custom_viewer_base_url_is_used() {
        let handler = DiagramHandler::new(
            MemoryStore::new(),
            HandlerConfig::new(Some("bucket".to_string()))
                .with_viewer_base_url("http://localhost:8080/edit#pako:"),
        );
        let success = handler
            .generate(&json!({ "documentId": "doc" }), fixed_time())
            .await
            .unwrap();
        assert!(success
            .view_url
            .starts_with("http://localhost:8080/edit#pako:"));
    }

    #[tokio::test]
    async fn storage_failure_becomes_error_payload() {
        let handler = handler();
        handler.store().fail_with("AccessDenied");
        let output = handler
            .handle_at(&json!({ "documentId": "doc-1" }), fixed_time())
            .await;
        let error = output.output.error().unwrap();
        assert!(error.contains("AccessDenied"));
        assert!(error.contains("diagrams/doc-1/architecture-20240601-093015.mmd"));
    }
}
