// archdiagram-core - Architecture diagram generation
//
// Platform-agnostic pieces of the diagram handler:
// - request extraction from a raw JSON event
// - fixed Mermaid templates
// - storage key and viewer link construction
// - the ObjectStore seam and the handler that drives it
//
// Runtimes (Lambda, local CLI) supply the store and the configuration.

pub mod error;
pub mod handler;
pub mod key;
pub mod request;
pub mod response;
pub mod storage;
pub mod template;
pub mod viewer;

pub use error::{DiagramError, StorageError};
pub use handler::{DiagramHandler, HandlerConfig};
pub use key::{format_timestamp, storage_key};
pub use request::DiagramRequest;
pub use response::{DiagramResponse, DiagramSuccess, HandlerOutput};
pub use storage::{MemoryStore, ObjectStore, StoredObject};
pub use template::DiagramKind;
pub use viewer::{encode_diagram, view_url, DEFAULT_VIEWER_BASE_URL};

/// Media type declared for persisted diagram artifacts
pub const DIAGRAM_CONTENT_TYPE: &str = "text/plain";
