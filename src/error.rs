//! Unified error types for runlocal.

use std::fmt;

// ---------------------------------------------------------------------------
// ChannelError
// ---------------------------------------------------------------------------

/// Errors from the shared window-property registry.
///
/// Every variant is fatal for the process that sees it: the registry
/// connection is either unusable or has been lost.
#[derive(Debug)]
pub enum ChannelError {
    /// Could not open a connection to the display server.
    Connect(String),
    /// The connection broke while sending a request or waiting for events.
    Connection(String),
    /// The display server rejected a request.
    Request(String),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(msg) => write!(f, "cannot connect: {msg}"),
            Self::Connection(msg) => write!(f, "connection lost: {msg}"),
            Self::Request(msg) => write!(f, "request failed: {msg}"),
        }
    }
}

impl std::error::Error for ChannelError {}

impl From<x11rb::errors::ConnectError> for ChannelError {
    fn from(e: x11rb::errors::ConnectError) -> Self {
        Self::Connect(e.to_string())
    }
}

impl From<x11rb::errors::ConnectionError> for ChannelError {
    fn from(e: x11rb::errors::ConnectionError) -> Self {
        Self::Connection(e.to_string())
    }
}

impl From<x11rb::errors::ReplyError> for ChannelError {
    fn from(e: x11rb::errors::ReplyError) -> Self {
        match e {
            x11rb::errors::ReplyError::ConnectionError(inner) => Self::from(inner),
            x11rb::errors::ReplyError::X11Error(err) => Self::Request(format!("{err:?}")),
        }
    }
}

impl From<x11rb::errors::ReplyOrIdError> for ChannelError {
    fn from(e: x11rb::errors::ReplyOrIdError) -> Self {
        match e {
            x11rb::errors::ReplyOrIdError::ConnectionError(inner) => Self::from(inner),
            x11rb::errors::ReplyOrIdError::X11Error(err) => Self::Request(format!("{err:?}")),
            x11rb::errors::ReplyOrIdError::IdsExhausted => {
                Self::Request("window ids exhausted".into())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ProtocolError
// ---------------------------------------------------------------------------

/// A channel payload that does not describe a runnable command.
#[derive(Debug, PartialEq, Eq)]
pub enum ProtocolError {
    /// Fewer than the two mandatory tokens (host, program).
    TooFewTokens(usize),
    /// The program token was present but empty.
    EmptyProgram,
    /// A token contained an embedded NUL byte and cannot be encoded.
    EmbeddedNul(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewTokens(n) => {
                write!(f, "expected host and program tokens, got {n} token(s)")
            }
            Self::EmptyProgram => write!(f, "program token is empty"),
            Self::EmbeddedNul(token) => write!(f, "token contains a NUL byte: {token:?}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

// ---------------------------------------------------------------------------
// HostConfigError
// ---------------------------------------------------------------------------

/// Errors while parsing the resolver or SSH client configuration.
#[derive(Debug)]
pub enum HostConfigError {
    Io(std::io::Error),
    /// A single line exceeded the parser's line limit.
    LineTooLong { line: usize, limit: usize },
}

impl fmt::Display for HostConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::LineTooLong { line, limit } => {
                write!(f, "line {line} is longer than {limit} bytes")
            }
        }
    }
}

impl std::error::Error for HostConfigError {}

impl From<std::io::Error> for HostConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing `runlocal.toml`.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// LaunchError
// ---------------------------------------------------------------------------

/// The local subprocess could not be started.
#[derive(Debug)]
pub struct LaunchError {
    pub program: String,
    pub source: std::io::Error,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to run {}: {}", self.program, self.source)
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// ---------------------------------------------------------------------------
// RunlocalError (top-level)
// ---------------------------------------------------------------------------

/// Top-level error type for a client or server run.
#[derive(Debug)]
pub enum RunlocalError {
    Channel(ChannelError),
    Protocol(ProtocolError),
}

impl fmt::Display for RunlocalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(e) => write!(f, "channel: {e}"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
        }
    }
}

impl std::error::Error for RunlocalError {}

impl From<ChannelError> for RunlocalError {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

impl From<ProtocolError> for RunlocalError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}
