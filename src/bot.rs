//! Bot controller - sequences credential loading, connection, and the chat
//! loop.

use crate::chat;
use crate::config::Config;
use crate::db::Database;
use crate::error::BotError;
use crate::session::Session;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Delay before restarting the cycle after a chat-loop failure.
const RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Top-level controller: owns the session and the storage handle.
pub struct Bot {
    config: Config,
    session: Session,
    db: Database,
}

impl Bot {
    /// Create a bot from its configuration and an initialized database.
    pub fn new(config: Config, db: Database) -> Self {
        let session = Session::new(&config);
        Self {
            config,
            session,
            db,
        }
    }

    /// Run the bot until the owner shuts it down.
    ///
    /// Credential failures abort before any network activity. A chat-loop
    /// failure triggers a full reconnect cycle, including re-authentication,
    /// after [`RECONNECT_DELAY`]; there is no retry limit and no backoff
    /// growth.
    pub async fn run(&mut self) -> Result<(), BotError> {
        self.session.load_credentials()?;

        loop {
            self.session.connect().await;
            match self.cycle().await {
                Ok(()) => {
                    info!("Chat loop finished, stopping");
                    return Ok(());
                }
                Err(e) => {
                    self.session.disconnect();
                    sleep(RECONNECT_DELAY).await;
                    warn!(error = %e, code = e.error_code(), "Chat loop failed, restarting");
                }
            }
        }
    }

    /// One connected cycle: handshake, then chat until something ends it.
    async fn cycle(&mut self) -> Result<(), BotError> {
        self.session.authenticate_and_join().await?;
        chat::run(&mut self.session, &self.db, &self.config.bot).await
    }
}
