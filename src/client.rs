//! The sending side: discover listening servers, then write the command.
//!
//! Discovery is a broadcast probe over every top-level window. Any window
//! whose slot is set counts as a live server and receives the command. More
//! than one match means more than one server, and the command runs once per
//! server; nothing here tries to pick one.

use tracing::{debug, info, warn};

use crate::channel::{ChannelAtom, PropertyChannel, WindowId};
use crate::config::ChannelConfig;
use crate::error::{ChannelError, RunlocalError};
use crate::protocol::CommandRequest;

/// Which windows received a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReport {
    pub delivered: Vec<WindowId>,
}

impl SendReport {
    /// False when no server answered the probe.
    pub fn reached_server(&self) -> bool {
        !self.delivered.is_empty()
    }
}

pub struct Client<C> {
    channel: C,
    atom: ChannelAtom,
    max_payload_bytes: u32,
}

impl<C: PropertyChannel> Client<C> {
    pub fn new(channel: C, config: &ChannelConfig) -> Result<Self, ChannelError> {
        let atom = channel.register(&config.name)?;
        Ok(Self {
            channel,
            atom,
            max_payload_bytes: config.max_payload_bytes,
        })
    }

    /// Top-level windows whose channel slot is currently set.
    pub fn discover(&self) -> Result<Vec<WindowId>, ChannelError> {
        let candidates = self.channel.enumerate(self.channel.root())?;
        let slots = self
            .channel
            .probe_all(&candidates, self.atom, self.max_payload_bytes)?;
        debug!(candidates = candidates.len(), "probed windows");
        Ok(candidates
            .into_iter()
            .zip(slots)
            .filter(|(_, slot)| slot.is_set())
            .map(|(window, _)| window)
            .collect())
    }

    /// Write `request` to every discovered server.
    ///
    /// Finding no server is reported, not treated as an error.
    pub fn send(&self, request: &CommandRequest) -> Result<SendReport, RunlocalError> {
        info!(
            host = %request.host,
            program = %request.program,
            args = ?request.args,
            "connecting"
        );
        let payload = request.encode()?;
        let servers = self.discover()?;
        for window in &servers {
            self.channel.publish(*window, self.atom, &payload)?;
            info!(window, " .. sent");
        }
        if servers.is_empty() {
            warn!(atom = self.atom, " .. server not running?");
        }
        Ok(SendReport { delivered: servers })
    }
}
