// AWS Lambda runtime adapter
//
// Receives the raw JSON invocation event, runs the diagram handler against
// OpenDAL S3 storage, and always answers with the `{ output }` envelope.
//
// Philosophy: Use lambda_runtime's provided tokio

use anyhow::Context as _;
use archdiagram_config::{LogFormat, RuntimeConfig};
use archdiagram_core::{DiagramHandler, HandlerOutput, ObjectStore};
use archdiagram_storage::OpendalStore;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

/// Lambda handler for diagram generation events
pub async fn handle_event<S: ObjectStore>(
    event: LambdaEvent<Value>,
    handler: &DiagramHandler<S>,
) -> Result<HandlerOutput, Error> {
    let (payload, context) = event.into_parts();
    tracing::debug!(request_id = %context.request_id, "Lambda invocation");

    // Failures are part of the envelope, never a runtime error
    Ok(handler.handle(&payload).await)
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    let config = RuntimeConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        built_at = env!("BUILD_TIMESTAMP"),
        backend = %config.storage.backend,
        bucket = config.bucket().unwrap_or("<unset>"),
        "Lambda runtime starting"
    );
    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    let store = OpendalStore::from_config(&config.storage);
    let handler = Arc::new(DiagramHandler::new(store, config.handler_config()));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move { handle_event(event, &*handler).await }
    }))
    .await
}

/// Initialize tracing for CloudWatch: no ANSI colors, no timestamps (the
/// platform stamps each line).
pub fn init_tracing(config: &RuntimeConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    // Ignore error if a subscriber is already set
    let _ = match config.log.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_ansi(false).without_time()),
        ),
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().with_ansi(false).without_time()),
        ),
    };
}
