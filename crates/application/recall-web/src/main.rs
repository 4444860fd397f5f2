//! recall-web server
//!
//! ## Usage
//!
//! ```bash
//! GOOGLE_API_KEY=... recall-web                 # http://127.0.0.1:5000
//! recall-web --bind 0.0.0.0:8080                # Listen on all interfaces
//! recall-web --fixture recalls.json             # Offline, canned recall data
//! ```

use anyhow::Context;
use clap::Parser;
use recall_store::VehicleStore;
use recall_web::{serve, AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recall_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    if config.print_routes {
        recall_web::routes::print_routes();
        return Ok(());
    }

    let chatbot = config
        .text_generator()
        .context("Chatbot is not configured")?;
    let recalls = config
        .recall_source()
        .context("Recall source is not configured")?;
    let store = VehicleStore::at_path(config.data_file.clone());

    tracing::info!(
        data_file = %config.data_file.display(),
        recall_source = recalls.name(),
        model = chatbot.name(),
        "Starting recall-web"
    );

    let state = Arc::new(AppState::new(store, recalls, chatbot));
    serve(state, &config.bind).await
}
