use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warp::Filter;

mod agents;
mod api;
mod config;
mod error;
mod formatter;
mod metrics;
mod middleware;
mod models;
mod session;
mod state;

use agents::retriever::VectaraRetriever;
use agents::scorer::HhemScorer;
use metrics::Metrics;
use session::SessionStore;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also pulls in .env, so RUST_LOG there applies)
    let config = config::Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.log_level))
        .json()
        .init();

    info!("Starting Parent Quest AI");
    info!(
        "Configuration loaded (chat style: {}, greeting: {}, max sessions: {})",
        config.chat_style.as_str(),
        config.greeting.is_some(),
        config.max_sessions
    );
    for name in config.missing_credentials() {
        warn!("{} is not set; requests needing it will be rejected upstream", name);
    }

    let metrics = Metrics::new()?;
    let state = AppState {
        sessions: SessionStore::new(config.greeting.clone(), config.max_sessions),
        retriever: Arc::new(VectaraRetriever::new(config.vectara.clone())?),
        scorer: Arc::new(HhemScorer::new(config.hhem.clone())?),
        metrics: metrics.clone(),
        chat_style: config.chat_style,
    };

    // Build API routes
    let api_routes = api::routes(state)
        .with(warp::log("api"))
        .with(middleware::cors());

    // Health check route
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    // Metrics route
    let metrics_route = warp::path("metrics").and(warp::get()).map(move || {
        match metrics.render() {
            Ok((buffer, content_type)) => warp::reply::with_status(
                warp::reply::with_header(buffer, "Content-Type", content_type),
                warp::http::StatusCode::OK,
            ),
            Err(e) => {
                tracing::error!("Failed to encode metrics: {}", e);
                warp::reply::with_status(
                    warp::reply::with_header(Vec::new(), "Content-Type", String::from("text/plain")),
                    warp::http::StatusCode::INTERNAL_SERVER_ERROR,
                )
            }
        }
    });

    let routes = health
        .or(metrics_route)
        .or(api_routes)
        .recover(error::handle_rejection);

    // Start server
    let addr = ([0, 0, 0, 0], config.port);
    info!("Server listening on {}", addr.1);

    warp::serve(routes).run(addr).await;

    Ok(())
}

/// `RUST_LOG` wins; otherwise `LOG_LEVEL`, and `info` if that does not parse.
fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
