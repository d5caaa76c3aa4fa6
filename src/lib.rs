//! straybot - Straylight chat relay bot.
//!
//! A single-channel Twitch IRC client: connects, authenticates, joins one
//! channel, answers keepalives, records every chatter it sees, and obeys a
//! small set of channel-owner commands.

pub mod bot;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod proto;
pub mod session;
