//! Extraction of a diagram request from a raw invocation event
//!
//! Events arrive as loosely typed JSON. Extraction never fails on unexpected
//! shapes for the optional fields; they fall back to defaults or, for
//! `diagramType`, to a value that selects the generic template.

use serde_json::Value;

use crate::error::DiagramError;

pub const DEFAULT_DIAGRAM_TYPE: &str = "quicksight-bi";
pub const DEFAULT_DESCRIPTION: &str = "AWS Architecture";

/// A validated diagram request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRequest {
    pub document_id: String,
    pub diagram_type: String,
    pub description: String,
}

impl DiagramRequest {
    /// Extract a request from an invocation event.
    ///
    /// Returns [`DiagramError::MissingDocumentId`] when the event is not an
    /// object or `documentId` is absent, empty, or not a string.
    ///
    /// Ids are never stringified: `{"documentId": 12345}` is rejected rather
    /// than stored under `diagrams/12345/`, unlike a truthiness check on the
    /// raw value would allow.
    pub fn from_event(event: &Value) -> Result<Self, DiagramError> {
        let document_id = event
            .get("documentId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(DiagramError::MissingDocumentId)?;

        let diagram_type = match event.get("diagramType") {
            None => DEFAULT_DIAGRAM_TYPE.to_string(),
            Some(Value::String(kind)) => kind.clone(),
            // Non-string values never match a template name
            Some(other) => other.to_string(),
        };

        let description = event
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string();

        Ok(Self {
            document_id: document_id.to_string(),
            diagram_type,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn applies_defaults_for_optional_fields() {
        let request = DiagramRequest::from_event(&json!({ "documentId": "doc-1" })).unwrap();
        assert_eq!(request.document_id, "doc-1");
        assert_eq!(request.diagram_type, "quicksight-bi");
        assert_eq!(request.description, "AWS Architecture");
    }

    #[test]
    fn keeps_explicit_fields() {
        let request = DiagramRequest::from_event(&json!({
            "documentId": "doc-2",
            "diagramType": "generic",
            "description": "Checkout service",
        }))
        .unwrap();
        assert_eq!(request.diagram_type, "generic");
        assert_eq!(request.description, "Checkout service");
    }

    #[test]
    fn rejects_missing_or_empty_document_id() {
        for event in [
            json!({}),
            json!({ "documentId": "" }),
            json!({ "documentId": null }),
            json!({ "documentId": 42 }),
            json!({ "diagramType": "generic" }),
            json!(["documentId"]),
            json!("doc-1"),
        ] {
            let err = DiagramRequest::from_event(&event).unwrap_err();
            assert!(err.is_validation(), "expected validation error for {event}");
        }
    }

    #[test]
    fn non_string_diagram_type_does_not_match_a_template_name() {
        let request =
            DiagramRequest::from_event(&json!({ "documentId": "doc", "diagramType": null }))
                .unwrap();
        assert_eq!(request.diagram_type, "null");
    }

    #[test]
    fn non_string_description_falls_back_to_default() {
        let request =
            DiagramRequest::from_event(&json!({ "documentId": "doc", "description": 7 }))
                .unwrap();
        assert_eq!(request.description, DEFAULT_DESCRIPTION);
    }
}
