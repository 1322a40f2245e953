//! Channel payload codec.
//!
//! A payload is a sequence of NUL-separated tokens with no length prefix and
//! no escaping. A command request is `host\0program\0arg1\0arg2...`; a server
//! announces itself with [`PRESENCE_MARKER`].

use crate::error::ProtocolError;

/// Token separator on the wire.
pub const SEPARATOR: u8 = 0;

/// Value a listening server publishes on its own mailbox.
pub const PRESENCE_MARKER: &[u8] = &[SEPARATOR];

/// A command to run on the server's machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Host the client ran on.
    pub host: String,
    pub program: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    /// Build a request from `[host, program, args...]`.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self, ProtocolError> {
        let count = tokens.len();
        let mut tokens = tokens.into_iter();
        let (Some(host), Some(program)) = (tokens.next(), tokens.next()) else {
            return Err(ProtocolError::TooFewTokens(count));
        };
        if program.is_empty() {
            return Err(ProtocolError::EmptyProgram);
        }
        Ok(Self {
            host,
            program,
            args: tokens.collect(),
        })
    }

    /// Encode as NUL-joined tokens.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let tokens = std::iter::once(&self.host)
            .chain(std::iter::once(&self.program))
            .chain(self.args.iter());
        encode_tokens(tokens)
    }

    /// Decode a payload read from a mailbox.
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        Self::from_tokens(split_tokens(payload))
    }
}

/// Join tokens with NUL. Tokens containing NUL are rejected.
pub fn encode_tokens<'a, I>(tokens: I) -> Result<Vec<u8>, ProtocolError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out = Vec::new();
    for (idx, token) in tokens.into_iter().enumerate() {
        if token.as_bytes().contains(&SEPARATOR) {
            return Err(ProtocolError::EmbeddedNul(token.clone()));
        }
        if idx > 0 {
            out.push(SEPARATOR);
        }
        out.extend_from_slice(token.as_bytes());
    }
    Ok(out)
}

/// Split a payload on NUL. Invalid UTF-8 is replaced, not rejected.
pub fn split_tokens(payload: &[u8]) -> Vec<String> {
    payload
        .split(|byte| *byte == SEPARATOR)
        .map(|token| String::from_utf8_lossy(token).into_owned())
        .collect()
}

/// Whether a payload is a bare presence marker rather than a command.
pub fn is_presence_marker(payload: &[u8]) -> bool {
    payload == PRESENCE_MARKER
}
