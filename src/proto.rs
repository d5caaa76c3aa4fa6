//! Wire protocol for the chat relay.
//!
//! Inbound lines are classified into [`ChatEvent`]s and outbound traffic is
//! rendered from [`Frame`]s. Everything here is pure: no I/O, no state, and
//! classification is total over any input line.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Matches an inbound channel message:
/// `:<sender>!<ident>@<ident>.tmi.twitch.tv PRIVMSG #<channel> :<body>`.
/// The trailing body is optional; sender and channel are word tokens.
static MSG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:(\w+)!\w+@\w+\.tmi\.twitch\.tv PRIVMSG #\w+(?: :(.*))?$")
        .expect("message regex is valid")
});

/// Matches a leading `!command` with an optional single word argument.
static CMD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!(\w+)\s?(\w+)?").expect("command regex is valid"));

/// One inbound line, classified. Borrows from the raw line and is discarded
/// after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEvent<'a> {
    /// Server liveness probe; must be answered with [`Frame::Pong`].
    Keepalive { host: &'a str },
    /// A chat message in the joined channel.
    Message { sender: &'a str, body: &'a str },
    /// Anything the bot does not react to.
    Unrecognized,
}

/// Classify one raw protocol line.
pub fn classify(line: &str) -> ChatEvent<'_> {
    if let Some(host) = line.strip_prefix("PING :") {
        return ChatEvent::Keepalive { host };
    }
    match MSG_RE.captures(line) {
        Some(caps) => ChatEvent::Message {
            sender: caps.get(1).map_or("", |m| m.as_str()),
            // absent trailing text is an empty body
            body: caps.get(2).map_or("", |m| m.as_str()),
        },
        None => ChatEvent::Unrecognized,
    }
}

/// A `!command` extracted from a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    pub name: &'a str,
    pub arg: Option<&'a str>,
}

impl<'a> Command<'a> {
    /// Extract a leading command from a message body, if present.
    ///
    /// The command token must start the body. Extraction does not look at
    /// the sender; authorization is the caller's decision.
    pub fn parse(body: &'a str) -> Option<Self> {
        let caps = CMD_RE.captures(body)?;
        Some(Self {
            name: caps.get(1).map_or("", |m| m.as_str()),
            arg: caps.get(2).map(|m| m.as_str()),
        })
    }
}

/// An outbound protocol frame.
///
/// `Display` renders the wire form without the trailing CRLF; the session
/// appends it on write. No `Debug` impl: `Pass` carries the secret and must
/// never end up in a log.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// `PASS <secret>` - authentication token.
    Pass(&'a str),
    /// `NICK <name>` - nickname registration.
    Nick(&'a str),
    /// `JOIN #<channel>` - channel join.
    Join(&'a str),
    /// `PONG :<host>` - keepalive reply.
    Pong(&'a str),
    /// `PRIVMSG #<channel> :<text>` - chat message.
    Privmsg { channel: &'a str, text: &'a str },
}

impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Pass(secret) => write!(f, "PASS {secret}"),
            Frame::Nick(name) => write!(f, "NICK {name}"),
            Frame::Join(channel) => write!(f, "JOIN #{channel}"),
            Frame::Pong(host) => write!(f, "PONG :{host}"),
            Frame::Privmsg { channel, text } => write!(f, "PRIVMSG #{channel} :{text}"),
        }
    }
}
