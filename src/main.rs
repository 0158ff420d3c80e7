//! appshelf crate entrypoint.
//!
//! Starts the Tokio runtime and launches the catalog web server defined in
//! the `server` module. Keep this file minimal — most application logic
//! lives in `server`, `config`, `db`, and `render`.
//!
/// HTTP server implementation and request handling
mod server;
/// Configuration management and settings
mod config;
/// SQLite persistence: pool, models, queries
mod db;
/// HTML template rendering
mod render;
/// First-boot example catalog
mod seed;

/// Entry point for the async Tokio runtime
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env();
    server::run(config).await
}
