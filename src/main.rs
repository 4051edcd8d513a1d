//! Jiskefet command-line client
//!
//! Resolves a logbook path against the session's route table, loads the page
//! from the API and prints its view model as JSON.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jiskefet_client::app::App;
use jiskefet_client::auth::store_session_token;
use jiskefet_client::config::{Config, LogFormat};
use jiskefet_client::storage::{ClientStorage, FileStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging; stdout carries the page, logs go to stderr
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    tracing::info!("Starting Jiskefet client");
    tracing::info!("API URL: {}", config.api_url);
    tracing::info!("Storage path: {:?}", config.storage_path);

    // Open client storage
    let storage = Arc::new(FileStorage::open(&config.storage_path)?);
    if let Some(token) = &config.session_token {
        store_session_token(storage.as_ref(), token)?;
    }
    let storage: Arc<dyn ClientStorage> = storage;

    let mut app = App::new(&config, storage)?;
    app.start();

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let screen = app.navigate(&path).await;
    println!("{}", serde_json::to_string_pretty(&screen)?);

    app.shutdown().await;
    Ok(())
}
