//! Mirror Gateway
//!
//! Session gateway for smart-mirror devices.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mirror_gateway::{
    routes, AppState, Config, HttpProviderGateway, HttpRecognitionGateway, InMemorySessionStore,
    InMemoryUserStore, ProviderGateway, RecognitionGateway, SessionStore, SqliteStore, UserStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mirror_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(?config, "Loaded configuration");

    // One client for every collaborator: shared auth header and timeout
    let client = config.http_client()?;
    let recognition = HttpRecognitionGateway::new(client.clone(), &config.recognition_url);
    let timeline = HttpProviderGateway::new("twitter", client.clone(), &config.twitter_url);
    let mail = HttpProviderGateway::new("google", client, &config.google_url);

    match config.database_url.as_deref() {
        Some(url) => {
            let store = Arc::new(SqliteStore::open(url)?);
            tracing::info!(database = url, "Using SQLite store");
            serve(&config, AppState::new(store.clone(), store, recognition, timeline, mail)).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            serve(
                &config,
                AppState::new(
                    InMemoryUserStore::new(),
                    InMemorySessionStore::new(),
                    recognition,
                    timeline,
                    mail,
                ),
            )
            .await
        }
    }
}

async fn serve<U, S, R, P>(config: &Config, state: AppState<U, S, R, P>) -> Result<()>
where
    U: UserStore + 'static,
    S: SessionStore + 'static,
    R: RecognitionGateway + 'static,
    P: ProviderGateway + 'static,
{
    let app = routes::create_router(Arc::new(state));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
