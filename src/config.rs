//! Configuration loading and management.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot identity and behavior.
    pub bot: BotConfig,
    /// Chat server endpoint.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: Option<DatabaseConfig>,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Channel to join and watch (without the `#` prefix).
    pub channel: String,
    /// Nickname the bot registers under.
    pub name: String,
    /// Path to the OAuth credential file (JSON).
    pub credentials_path: String,
    /// Minimum delay between read-loop iterations, in milliseconds.
    #[serde(default = "default_message_delay_ms")]
    pub message_delay_ms: u64,
    /// Owner command that stops the bot.
    #[serde(default = "default_shutdown_command")]
    pub shutdown_command: String,
}

impl BotConfig {
    /// Read-loop pacing delay.
    pub fn message_delay(&self) -> Duration {
        Duration::from_millis(self.message_delay_ms)
    }

    /// The sender identity allowed to run privileged commands.
    ///
    /// The owner is the channel itself: only the broadcaster may control
    /// the bot from chat.
    pub fn owner(&self) -> &str {
        &self.channel
    }
}

/// Chat server endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server hostname (e.g., "irc.chat.twitch.tv").
    pub host: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file (":memory:" for tests).
    pub path: String,
}

fn default_message_delay_ms() -> u64 {
    // Twitch allows 20 messages per 30 seconds for regular bots.
    1500
}

fn default_shutdown_command() -> String {
    "tbdown".to_string()
}

fn default_port() -> u16 {
    6667
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.channel.is_empty() {
            return Err(ConfigError::Invalid("bot.channel must not be empty"));
        }
        if self.bot.name.is_empty() {
            return Err(ConfigError::Invalid("bot.name must not be empty"));
        }
        if self.bot.credentials_path.is_empty() {
            return Err(ConfigError::Invalid(
                "bot.credentials_path must not be empty",
            ));
        }
        if self.server.host.is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty"));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(toml).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn full_config_parses() {
        let config = parse(
            r#"
            [bot]
            channel = "somechannel"
            name = "somebot"
            credentials_path = "private/oauth.json"
            message_delay_ms = 500
            shutdown_command = "halt"

            [server]
            host = "irc.chat.twitch.tv"
            port = 6667

            [database]
            path = ":memory:"
            "#,
        )
        .unwrap();

        assert_eq!(config.bot.channel, "somechannel");
        assert_eq!(config.bot.owner(), "somechannel");
        assert_eq!(config.bot.message_delay(), Duration::from_millis(500));
        assert_eq!(config.bot.shutdown_command, "halt");
        assert_eq!(config.server.port, 6667);
        assert_eq!(config.database.unwrap().path, ":memory:");
    }

    #[test]
    fn defaults_apply() {
        let config = parse(
            r#"
            [bot]
            channel = "somechannel"
            name = "somebot"
            credentials_path = "private/oauth.json"

            [server]
            host = "irc.chat.twitch.tv"
            "#,
        )
        .unwrap();

        assert_eq!(config.bot.message_delay_ms, 1500);
        assert_eq!(config.bot.shutdown_command, "tbdown");
        assert_eq!(config.server.port, 6667);
        assert!(config.database.is_none());
    }

    #[test]
    fn empty_channel_rejected() {
        let err = parse(
            r#"
            [bot]
            channel = ""
            name = "somebot"
            credentials_path = "private/oauth.json"

            [server]
            host = "irc.chat.twitch.tv"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_name_rejected() {
        let err = parse(
            r#"
            [bot]
            channel = "somechannel"
            name = ""
            credentials_path = "private/oauth.json"

            [server]
            host = "irc.chat.twitch.tv"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_port_rejected() {
        let err = parse(
            r#"
            [bot]
            channel = "somechannel"
            name = "somebot"
            credentials_path = "private/oauth.json"

            [server]
            host = "irc.chat.twitch.tv"
            port = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
