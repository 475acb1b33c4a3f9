// Response envelope returned to the invoker
//
// Every invocation answers with `{ "output": ... }`, carrying either the
// success payload or `{ "error": message }`.

use serde::{Deserialize, Serialize};

use crate::error::DiagramError;

pub const SUCCESS_MESSAGE: &str = "Mermaid diagram generated successfully";

/// Successful generation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSuccess {
    pub message: String,
    pub document_id: String,
    pub s3_key: String,
    pub bucket: String,
    pub mermaid_code: String,
    pub view_url: String,
}

/// Body of the `output` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagramResponse {
    Success(DiagramSuccess),
    Failure { error: String },
}

impl DiagramResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: message.into(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => Some(error),
        }
    }
}

impl From<Result<DiagramSuccess, DiagramError>> for DiagramResponse {
    fn from(result: Result<DiagramSuccess, DiagramError>) -> Self {
        match result {
            Ok(success) => Self::Success(success),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}

/// Top-level envelope: `{ "output": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerOutput {
    pub output: DiagramResponse,
}

impl HandlerOutput {
    pub fn is_success(&self) -> bool {
        matches!(self.output, DiagramResponse::Success(_))
    }
}

impl From<DiagramResponse> for HandlerOutput {
    fn from(output: DiagramResponse) -> Self {
        Self { output }
    }
}
