//! `machwatch-poller` -- live machine view daemon.
//!
//! Polls the backend for one machine's latest sensor reading (every 5 s by
//! default) and current status (every 30 s), holding the last good state
//! across backend outages. SIGHUP triggers a debounced manual refresh of
//! both; SIGINT/SIGTERM shut the poller down.

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use machwatch_poller::client::ApiClient;
use machwatch_poller::config::PollerConfig;
use machwatch_poller::session::LiveView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "machwatch_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PollerConfig::from_env()?;
    tracing::info!(
        base_url = %config.base_url,
        machine_id = config.machine_id,
        sensor_secs = config.sensor_interval.as_secs(),
        status_secs = config.status_interval.as_secs(),
        "Starting machwatch-poller"
    );

    let mut client = ApiClient::new(config.base_url.clone());
    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        client.login(username, password).await?;
    }

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received SIGINT, shutting down");
            signal_cancel.cancel();
        }
    });

    run(client, config, cancel).await;
    Ok(())
}

/// Drive the poll loop until cancelled.
async fn run(client: ApiClient, config: PollerConfig, cancel: CancellationToken) {
    let mut view = LiveView::new(config.refresh_debounce);
    let mut sensor_ticker = tokio::time::interval(config.sensor_interval);
    let mut status_ticker = tokio::time::interval(config.status_interval);

    #[cfg(unix)]
    let mut refresh_signal =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
            .expect("Failed to install SIGHUP handler");

    loop {
        #[cfg(unix)]
        let refresh = refresh_signal.recv();
        #[cfg(not(unix))]
        let refresh = std::future::pending::<Option<()>>();

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Poller stopping");
                break;
            }
            _ = sensor_ticker.tick() => {
                fetch_reading(&client, &config, &mut view).await;
            }
            _ = status_ticker.tick() => {
                fetch_status(&client, &config, &mut view).await;
            }
            _ = refresh => {
                // In-flight timer fetches are not raced against; whichever
                // response lands last wins, which is fine for a live view.
                if view.try_manual_refresh(Instant::now()) {
                    tracing::info!("Manual refresh triggered");
                    fetch_reading(&client, &config, &mut view).await;
                    fetch_status(&client, &config, &mut view).await;
                } else {
                    tracing::debug!("Manual refresh suppressed by debounce");
                }
            }
        }
    }
}

/// Fetch the latest reading; on failure keep the held state and log how
/// stale it is.
async fn fetch_reading(client: &ApiClient, config: &PollerConfig, view: &mut LiveView) {
    let now = Instant::now();
    match client.fetch_latest_reading(config.machine_id).await {
        Ok(reading) => {
            tracing::info!(
                temperature1 = reading.temperature1,
                speed1 = reading.speed1,
                door1_open = reading.door1_open,
                recorded_at = %reading.recorded_at,
                "Live reading updated"
            );
            view.apply_reading(reading, now);
        }
        Err(e) => {
            let stale_secs = view
                .reading_staleness(now)
                .map_or(0, |d| d.as_secs());
            tracing::warn!(error = %e, stale_secs, "Reading fetch failed, keeping last state");
        }
    }
}

/// Fetch the current status; same failure policy as readings.
async fn fetch_status(client: &ApiClient, config: &PollerConfig, view: &mut LiveView) {
    let now = Instant::now();
    match client.fetch_current_status(config.machine_id).await {
        Ok(status) => {
            tracing::info!(status = %status.status, "Machine status updated");
            view.apply_status(status, now);
        }
        Err(e) => {
            let stale_secs = view
                .status_staleness(now)
                .map_or(0, |d| d.as_secs());
            tracing::warn!(error = %e, stale_secs, "Status fetch failed, keeping last state");
        }
    }
}
