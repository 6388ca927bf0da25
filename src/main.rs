use anyhow::Context;
use cast_sweep::app;
use cast_sweep::state::{AppConfig, AppState};
use std::net::SocketAddr;
use sweeper::NeynarGateway;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_key = std::env::var("NEYNAR_API_KEY").context("NEYNAR_API_KEY must be set")?;

    let neynar_api_url =
        std::env::var("NEYNAR_API_URL").unwrap_or_else(|_| "https://api.neynar.com".to_string());

    let page_size = std::env::var("SEARCH_PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(sweeper::DEFAULT_PAGE_SIZE);
    let max_pages = std::env::var("SEARCH_MAX_PAGES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(sweeper::DEFAULT_MAX_PAGES);

    let http_client = reqwest::Client::builder()
        .user_agent("cast-sweep/0.1")
        .build()
        .expect("Failed to build HTTP client");

    let config = AppConfig {
        neynar_api_url,
        page_size,
        max_pages,
    };

    let app_state = AppState {
        gateway: NeynarGateway::new(http_client, config.neynar_api_url.as_str(), api_key),
        config,
    };

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("cast-sweep listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
