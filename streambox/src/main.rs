//! StreamBox headless client.
//!
//! Boots the sync core against the configured backends, prints the first
//! route and the current trending list. Useful for checking credentials
//! and the on-disk store without a UI.

use std::time::Duration;
use streambox::{AppEnvironment, ClientConfig, ListKind, Route, StreamBox, TimeWindow};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,streambox=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    info!(
        identity_url = %config.identity_url,
        catalog_url = %config.catalog_url,
        timeout_ms = config.request_timeout.as_millis(),
        "Configuration loaded"
    );

    let client = StreamBox::new(AppEnvironment::production(&config)?);

    let route = client.start().await?;
    match route {
        Route::Main => {
            let user = client
                .select(|s| s.auth.current().map(|session| session.user.display_name()))
                .await;
            info!(user = ?user, "Signed in");
        },
        Route::Auth => info!("No stored session, sign-in required"),
        Route::Splash => warn!("Still on splash after start"),
    }

    client.fetch(ListKind::Trending(TimeWindow::Week), 1).await?;
    client.settle(config.request_timeout + Duration::from_secs(1)).await?;

    let trending = client.select(|s| s.movies.trending.clone()).await;
    if let Some(error) = trending.error() {
        warn!(%error, "Could not load trending movies");
    } else {
        for movie in &trending.data.results {
            info!(id = %movie.id, title = %movie.title, "Trending");
        }
    }

    let favorites = client.select(|s| s.favorites.ids.len()).await;
    info!(favorites, theme = ?client.color_scheme().await, "Done");

    client.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
