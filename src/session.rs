//! Session - owns the transport connection, credential state, and channel
//! identity.
//!
//! A session moves between exactly two states: disconnected (no wire) and
//! connected (one wire). Authentication is not a tracked state; it is a
//! fire-and-forget write sequence performed right after connecting.

use crate::config::Config;
use crate::error::BotError;
use crate::proto::Frame;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{info, warn};

/// Delay between failed connection attempts.
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// OAuth credentials as stored on disk: a JSON object with one optional
/// `password` field. A missing field is an empty secret, not an error.
///
/// No `Debug` impl; the secret must never end up in a log.
#[derive(Default, Deserialize)]
struct OauthCredentials {
    #[serde(default)]
    password: String,
}

/// The live connection. Exists only between a successful connect and a
/// disconnect; at most one per session.
struct Wire {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    since: Instant,
}

impl Wire {
    /// Write one CRLF-terminated frame.
    async fn write_frame(&mut self, frame: Frame<'_>) -> Result<(), BotError> {
        let line = format!("{frame}\r\n");
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(BotError::Transport)
    }
}

/// A single bot session: immutable identity plus at most one live
/// connection to the chat server.
pub struct Session {
    channel: String,
    name: String,
    host: String,
    port: u16,
    credentials_path: String,
    credentials: Option<OauthCredentials>,
    wire: Option<Wire>,
}

impl Session {
    /// Create a disconnected session from the process configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            channel: config.bot.channel.clone(),
            name: config.bot.name.clone(),
            host: config.server.host.clone(),
            port: config.server.port,
            credentials_path: config.bot.credentials_path.clone(),
            credentials: None,
            wire: None,
        }
    }

    /// The channel this session joins.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Whether a live connection exists.
    pub fn is_connected(&self) -> bool {
        self.wire.is_some()
    }

    /// Load the OAuth token from the credential file.
    ///
    /// Called once before the first connect; the secret is reused across
    /// reconnects within one process run. An empty file yields an empty but
    /// valid secret.
    pub fn load_credentials(&mut self) -> Result<(), BotError> {
        let raw =
            std::fs::read_to_string(&self.credentials_path).map_err(|source| {
                BotError::CredentialLoad {
                    path: self.credentials_path.clone(),
                    source,
                }
            })?;

        let credentials = if raw.trim().is_empty() {
            OauthCredentials::default()
        } else {
            serde_json::from_str(&raw)?
        };

        self.credentials = Some(credentials);
        info!(path = %self.credentials_path, "Credentials loaded");
        Ok(())
    }

    /// Connect to the chat server, retrying until it succeeds.
    ///
    /// Connection failures are never surfaced to the caller: each failed
    /// attempt logs a warning and waits [`CONNECT_RETRY_DELAY`] before the
    /// next one.
    pub async fn connect(&mut self) {
        info!(host = %self.host, port = self.port, "Connecting");
        loop {
            match TcpStream::connect((self.host.as_str(), self.port)).await {
                Ok(stream) => {
                    let (read_half, write_half) = stream.into_split();
                    self.wire = Some(Wire {
                        reader: BufReader::new(read_half),
                        writer: write_half,
                        since: Instant::now(),
                    });
                    info!(host = %self.host, "Connected");
                    return;
                }
                Err(e) => {
                    warn!(host = %self.host, error = %e, "Cannot connect, retrying");
                    tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                }
            }
        }
    }

    /// Send the PASS/NICK/JOIN handshake.
    ///
    /// Fire-and-forget: no acknowledgement is awaited or validated.
    pub async fn authenticate_and_join(&mut self) -> Result<(), BotError> {
        let secret = self
            .credentials
            .as_ref()
            .map_or("", |c| c.password.as_str());
        let wire = self.wire.as_mut().ok_or(BotError::NotConnected)?;

        wire.write_frame(Frame::Pass(secret)).await?;
        wire.write_frame(Frame::Nick(&self.name)).await?;
        wire.write_frame(Frame::Join(&self.channel)).await?;

        info!(channel = %self.channel, name = %self.name, "Joined channel");
        Ok(())
    }

    /// Read one line from the transport into `buf` (terminator stripped).
    ///
    /// Any read error, including a clean remote close, is a
    /// [`BotError::ChannelRead`].
    pub async fn read_line(&mut self, buf: &mut String) -> Result<(), BotError> {
        let wire = self.wire.as_mut().ok_or(BotError::NotConnected)?;
        buf.clear();
        match wire.reader.read_line(buf).await {
            Ok(0) | Err(_) => Err(BotError::ChannelRead),
            Ok(_) => {
                let stripped = buf.trim_end_matches(['\r', '\n']).len();
                buf.truncate(stripped);
                Ok(())
            }
        }
    }

    /// Send a chat message to the joined channel.
    pub async fn send(&mut self, text: &str) -> Result<(), BotError> {
        // The empty-message guard runs before any transport access.
        if text.is_empty() {
            return Err(BotError::EmptyMessage);
        }
        let wire = self.wire.as_mut().ok_or(BotError::NotConnected)?;
        wire.write_frame(Frame::Privmsg {
            channel: &self.channel,
            text,
        })
        .await
    }

    /// Reply to a keepalive probe.
    pub async fn pong(&mut self, host: &str) -> Result<(), BotError> {
        let wire = self.wire.as_mut().ok_or(BotError::NotConnected)?;
        wire.write_frame(Frame::Pong(host)).await
    }

    /// Drop the connection. Idempotent; logs session uptime when a live
    /// connection was actually closed.
    pub fn disconnect(&mut self) {
        if let Some(wire) = self.wire.take() {
            info!(
                host = %self.host,
                uptime_secs = wire.since.elapsed().as_secs_f64(),
                "Connection closed"
            );
        }
    }
}
