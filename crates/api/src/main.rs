use std::env;

use anyhow::Result;
use nearby_api::build_app;
use nearby_observability::init_tracing;
use nearby_pipeline::ServiceConfig;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("nearby_api");

    let bind = env::var("NEARBY_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let config = ServiceConfig::from_env();

    let app = build_app(config)?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, "nearby concierge api started");

    axum::serve(listener, app).await?;
    Ok(())
}
