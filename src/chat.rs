//! Chat loop - drives a session's read stream and reacts to what arrives.
//!
//! The loop is the single logical thread of the bot: one line is read,
//! classified, dispatched, and then the loop sleeps the configured pacing
//! delay before the next read. It never retries on its own; transport
//! failures surface to the controller.

use crate::config::BotConfig;
use crate::db::{Database, Sighting};
use crate::error::BotError;
use crate::proto::{self, ChatEvent, Command};
use crate::session::Session;
use tracing::{debug, info, warn};

/// Run the chat loop until the transport dies or the owner shuts the bot
/// down.
///
/// Returns `Ok(())` on an owner-issued shutdown and `Err(ChannelRead)` when
/// the transport fails (including a clean remote close). Reconnecting is the
/// controller's responsibility.
pub async fn run(
    session: &mut Session,
    db: &Database,
    config: &BotConfig,
) -> Result<(), BotError> {
    info!(channel = %session.channel(), "Watching channel");

    let mut line = String::new();
    loop {
        if session.read_line(&mut line).await.is_err() {
            session.disconnect();
            return Err(BotError::ChannelRead);
        }
        debug!(raw = %line, "Received line");

        match proto::classify(&line) {
            ChatEvent::Keepalive { host } => {
                // Answer immediately; a keepalive never reaches message
                // classification.
                session.pong(host).await?;
            }
            ChatEvent::Message { sender, body } => {
                if handle_message(session, db, config, sender, body).await? {
                    return Ok(());
                }
            }
            ChatEvent::Unrecognized => {}
        }

        // Crude pacing: throttles the read cadence after every line, even
        // on iterations that sent nothing.
        tokio::time::sleep(config.message_delay()).await;
    }
}

/// Handle one inbound chat message. Returns `true` when the owner asked the
/// bot to shut down.
async fn handle_message(
    session: &mut Session,
    db: &Database,
    config: &BotConfig,
    sender: &str,
    body: &str,
) -> Result<bool, BotError> {
    info!(sender = %sender, message = %body, "Chat message");

    // A failed sighting write costs one record, not the connection.
    match db.users().record_sighting(sender).await {
        Ok(Sighting::First) => info!(user = %sender, "New chatter recorded"),
        Ok(Sighting::Known) => info!(user = %sender, "Chatter already known"),
        Err(e) => warn!(user = %sender, error = %e, "Failed to record sighting"),
    }

    if let Some(cmd) = Command::parse(body) {
        // Privileged commands are owner-only; commands from anyone else are
        // never dispatched.
        if sender == config.owner() {
            if cmd.name == config.shutdown_command {
                info!(command = %cmd.name, "Shutdown command received, shutting down");
                session.disconnect();
                return Ok(true);
            }
            debug!(command = %cmd.name, "Unhandled owner command");
        }
    }

    Ok(false)
}
