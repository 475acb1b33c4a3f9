// AWS Lambda binary entry point
//
// Build with: cargo build -p archdiagram-lambda --release
// The binary is named `bootstrap` for the provided.al2023 runtime.

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    archdiagram_lambda::run().await
}
