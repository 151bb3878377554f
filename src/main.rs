use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use haven::adapters::{
    CoinGeckoClient, JsonFilePreferences, ProbeConnectivity, StubArticleSource, StubStorySource,
};
use haven::bootstrap::{BootstrapSequencer, BootstrapState};
use haven::feed::FeedController;
use haven::market::MarketTracker;
use haven::models::Story;
use haven::profile::ProfileCoordinator;
use haven::theme::ThemeCoordinator;
use haven::traits::PreferenceStore;

/// Headless walkthrough of the orchestration layer: boot, load the first
/// catalog page and article page, fetch the default coin. The real screens
/// drive the same components through their watch receivers.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let prefs_path = JsonFilePreferences::default_path()
        .ok_or_else(|| eyre!("no platform data directory available"))?;
    let store: Arc<dyn PreferenceStore> = Arc::new(JsonFilePreferences::new(prefs_path));

    let theme = ThemeCoordinator::new(Arc::clone(&store));
    let profile = ProfileCoordinator::new(Arc::clone(&store));
    if let Err(err) = profile.load().await {
        tracing::warn!(%err, "profile load failed, defaults apply");
    }

    let monitor = ProbeConnectivity::spawn();
    let sequencer = BootstrapSequencer::start(&monitor, theme.clone());

    let mut states = sequencer.subscribe();
    let state = *states
        .wait_for(|s| *s != BootstrapState::Loading)
        .await
        .map_err(|_| eyre!("bootstrap driver stopped"))?;
    tracing::info!(?state, dark_theme = theme.is_dark(), "bootstrap complete");

    if state == BootstrapState::Offline {
        tracing::warn!("no connectivity, staying on the offline screen");
        sequencer.shutdown();
        monitor.shutdown();
        return Ok(());
    }

    // First page of the story catalog.
    let stories = FeedController::new(Arc::new(StubStorySource::new(Story::stub_corpus())));
    let mut catalog_rx = stories.subscribe();
    stories.load_next();
    let snapshot = catalog_rx
        .wait_for(|s| !s.in_flight)
        .await
        .map_err(|_| eyre!("catalog feed closed"))?
        .clone();
    for story in &snapshot.items {
        tracing::info!(title = %story.title, chapters = story.chapters, "catalog");
    }

    // First page of finance articles.
    let articles = FeedController::new(Arc::new(StubArticleSource::with_latency(
        Duration::from_millis(200),
    )));
    let mut articles_rx = articles.subscribe();
    articles.load_next();
    let snapshot = articles_rx
        .wait_for(|s| !s.in_flight)
        .await
        .map_err(|_| eyre!("article feed closed"))?
        .clone();
    tracing::info!(count = snapshot.items.len(), "article page loaded");

    // Default coin for the market panel.
    let tracker = MarketTracker::new(Arc::new(CoinGeckoClient::new()));
    let mut market_rx = tracker.subscribe();
    tracker.refresh();
    let view = market_rx
        .wait_for(|v| !v.loading)
        .await
        .map_err(|_| eyre!("market tracker closed"))?
        .clone();
    match (&view.pair, &view.last_error) {
        (Some(pair), _) => tracing::info!(
            coin = %pair.snapshot.name,
            price = pair.snapshot.current_price,
            samples = pair.series.len(),
            "market snapshot"
        ),
        (None, Some(err)) => tracing::warn!(%err, "market fetch failed"),
        (None, None) => {}
    }

    sequencer.shutdown();
    monitor.shutdown();
    Ok(())
}
