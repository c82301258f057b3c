use std::sync::Arc;

use anyhow::Context;

use fitness_bot::bot::FitnessBot;
use fitness_bot::channels::{Channel, CliChannel, TelegramChannel};
use fitness_bot::config::BotConfig;
use fitness_bot::dialog::DialogController;
use fitness_bot::session::SessionStore;
use fitness_bot::store::{LibSqlBackend, ProfileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().context("Invalid configuration")?;

    eprintln!("🏋️ Fitness Bot v{}", env!("CARGO_PKG_VERSION"));

    // ── Database ─────────────────────────────────────────────────────────
    let store: Arc<dyn ProfileStore> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?,
    );
    eprintln!("   Database: {}", config.db_path.display());

    // ── Channel ──────────────────────────────────────────────────────────
    let channel: Arc<dyn Channel> = match config.telegram_token.clone() {
        Some(token) => {
            eprintln!(
                "   Telegram: enabled (allowed: {})",
                if config.allows_everyone() {
                    "everyone".to_string()
                } else {
                    config.allowed_users.join(", ")
                }
            );
            Arc::new(TelegramChannel::new(token, config.allowed_users.clone()))
        }
        None => {
            eprintln!("   TELEGRAM_BOT_TOKEN not set, using the console. Type /start.\n");
            Arc::new(CliChannel::new())
        }
    };

    let controller = DialogController::new(store, SessionStore::new());
    let bot = FitnessBot::new(channel, controller, config.turn_timeout);
    bot.run().await?;

    Ok(())
}
