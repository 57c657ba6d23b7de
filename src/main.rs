use chrono::Utc;
use tracing::{info, warn, error, debug};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod services;
mod utils;

use api::history::HistoryClient;
use config::Config;
use services::{dashboard_service, notify_service};
use utils::AppError;

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    debug!(
        "Config: base_url={}, chart_output={}, chart_points={}, webhook={}",
        config.base_url,
        config.chart_output.display(),
        config.dashboard.chart_points,
        if config.webhook_url.is_some() { "set" } else { "unset" },
    );

    // Load history
    let client = HistoryClient::new(config.base_url.clone());
    info!("Loading history from {}", client.history_url());
    let history = client.load_history().await?;

    if let Some(last) = history.last() {
        match last.timestamp() {
            Some(ts) => {
                let age = Utc::now().signed_duration_since(ts);
                info!("Latest quote at {} ({} min ago)", ts.to_rfc3339(), age.num_minutes());
            }
            None => warn!("Latest quote has an unparseable timestamp: '{}'", last.timestamp_iso),
        }
    }

    // Render dashboard and chart
    let (summary, table) = dashboard_service::render_dashboard_file(
        &history,
        &config.dashboard,
        &config.chart_output,
        config.chart_size,
    )?;
    info!("✓ Chart written to {}", config.chart_output.display());
    println!("{}", table.render());

    let Some(summary) = summary else {
        info!("No observations yet; skipping notification");
        return Ok(());
    };

    // Notification
    match &config.webhook_url {
        Some(webhook_url) if config.thresholds.should_notify(summary.last.bid) => {
            let message = notify_service::build_message(&summary, &config.thresholds);
            notify_service::notify_discord(webhook_url, &message).await?;
        }
        Some(_) => {
            info!("Bid {} is inside the alert thresholds; no notification sent", summary.last.bid);
        }
        None => {
            info!("DISCORD_WEBHOOK_URL not configured; dashboard rendered without notification");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("usdbrl_dash=debug".parse().unwrap())
            .add_directive("serenity=warn".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("💵 Starting USD/BRL dashboard...");

    if let Err(e) = run().await {
        error!("Dashboard failed: {}", e);
        std::process::exit(1);
    }

    info!("Done");
}
