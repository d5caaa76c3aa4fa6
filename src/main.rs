//! straybot - Straylight chat relay bot.

use straybot::bot::Bot;
use straybot::config::Config;
use straybot::db::Database;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        channel = %config.bot.channel,
        name = %config.bot.name,
        server = %config.server.host,
        "Starting straybot"
    );

    // Initialize the database before any network activity. A storage failure
    // here aborts the process instead of running without a store.
    let db_path = config
        .database
        .as_ref()
        .map(|d| d.path.as_str())
        .unwrap_or("straybot.db");
    let db = Database::new(db_path).await?;

    let mut bot = Bot::new(config, db);
    bot.run().await?;

    info!("straybot stopped");
    Ok(())
}
