//! The listening side: one mailbox window and a blocking dispatch loop.
//!
//! Lifecycle: start (create mailbox, publish the presence marker, watch it),
//! then wait for a change notification, read and decode the payload, map
//! its file arguments and launch the program, and wait again. Only registry
//! errors end the loop.

use tracing::{debug, error, info, warn};

use crate::channel::{ChangeEvent, ChannelAtom, PropertyChannel, SlotValue, WindowId};
use crate::config::Config;
use crate::error::{ChannelError, ProtocolError};
use crate::hosts::HostResolver;
use crate::launch::Spawner;
use crate::protocol::{self, CommandRequest};
use crate::rewrite::map_file_args;

/// What one notification led to.
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The program was started with this argv.
    Launched { program: String, args: Vec<String> },
    /// The notification was for another window or channel.
    NotForUs,
    /// The slot held no command (unset, or just the presence marker).
    NoCommand,
    /// The payload could not be decoded.
    Malformed(ProtocolError),
    /// The program could not be started.
    LaunchFailed(String),
}

pub struct Server<C, S> {
    channel: C,
    spawner: S,
    atom: ChannelAtom,
    mailbox: WindowId,
    max_payload_bytes: u32,
    resolver: HostResolver,
    remote_scheme: String,
}

impl<C, S> Server<C, S>
where
    C: PropertyChannel,
    S: Spawner,
{
    /// Create and announce the mailbox.
    ///
    /// The marker is published before change events are selected so the
    /// server never sees its own announcement.
    pub fn start(channel: C, spawner: S, config: &Config) -> Result<Self, ChannelError> {
        let atom = channel.register(&config.channel.name)?;
        let mailbox = channel.create_mailbox()?;
        channel.publish(mailbox, atom, protocol::PRESENCE_MARKER)?;
        channel.watch(mailbox)?;
        info!(
            channel = %config.channel.name,
            atom,
            mailbox,
            "ready and waiting"
        );
        Ok(Self {
            channel,
            spawner,
            atom,
            mailbox,
            max_payload_bytes: config.channel.max_payload_bytes,
            resolver: HostResolver::from_config(&config.hosts),
            remote_scheme: config.hosts.remote_scheme.clone(),
        })
    }

    pub fn mailbox(&self) -> WindowId {
        self.mailbox
    }

    pub fn atom(&self) -> ChannelAtom {
        self.atom
    }

    /// Dispatch notifications until the registry connection fails.
    pub fn run(&self) -> Result<(), ChannelError> {
        loop {
            let event = self.channel.await_change(self.atom)?;
            self.handle_change(event)?;
        }
    }

    /// Act on one notification.
    pub fn handle_change(&self, event: ChangeEvent) -> Result<DispatchOutcome, ChannelError> {
        if event.window != self.mailbox || event.atom != self.atom {
            debug!(window = event.window, atom = event.atom, "notification for another slot");
            return Ok(DispatchOutcome::NotForUs);
        }
        let payload = match self
            .channel
            .read(self.mailbox, self.atom, self.max_payload_bytes)?
        {
            SlotValue::Set(payload) if !protocol::is_presence_marker(&payload) => payload,
            _ => {
                debug!("mailbox holds no command");
                return Ok(DispatchOutcome::NoCommand);
            }
        };
        Ok(self.dispatch(&payload))
    }

    fn dispatch(&self, payload: &[u8]) -> DispatchOutcome {
        let request = match CommandRequest::decode(payload) {
            Ok(request) => request,
            Err(e) => {
                warn!("dropping malformed command: {e}");
                return DispatchOutcome::Malformed(e);
            }
        };
        let args = map_file_args(&self.resolver, &self.remote_scheme, &request);
        info!(host = %request.host, program = %request.program, ?args, "executing");
        match self.spawner.spawn(&request.program, &args) {
            Ok(()) => DispatchOutcome::Launched {
                program: request.program,
                args,
            },
            Err(e) => {
                error!("{e}");
                DispatchOutcome::LaunchFailed(e.to_string())
            }
        }
    }
}
