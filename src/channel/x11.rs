//! X11 window-property implementation of [`PropertyChannel`].

use tracing::debug;
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::{
    AtomEnum, ChangeWindowAttributesAux, ConnectionExt as _, CreateWindowAux, EventMask,
    GetPropertyReply, PropMode, Property, WindowClass,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::COPY_FROM_PARENT;

use super::{ChangeEvent, ChannelAtom, PropertyChannel, SlotValue, WindowId};
use crate::error::ChannelError;

/// A connection to the X server's default screen.
pub struct X11Channel {
    conn: RustConnection,
    root: WindowId,
    root_depth: u8,
}

impl X11Channel {
    /// Connect to `display`, or to `$DISPLAY` when `None`.
    pub fn connect(display: Option<&str>) -> Result<Self, ChannelError> {
        let (conn, screen_num) = x11rb::connect(display)?;
        let (root, root_depth) = {
            let screen = conn.setup().roots.get(screen_num).ok_or_else(|| {
                ChannelError::Connect(format!("display has no screen {screen_num}"))
            })?;
            (screen.root, screen.root_depth)
        };
        debug!(screen = screen_num, root, "connected to display");
        Ok(Self {
            conn,
            root,
            root_depth,
        })
    }
}

fn long_length(max_len: u32) -> u32 {
    max_len.div_ceil(4)
}

fn slot_from_reply(window: WindowId, reply: GetPropertyReply, max_len: u32) -> SlotValue {
    if reply.format == 0 {
        return SlotValue::Unset;
    }
    let mut value = reply.value;
    if reply.bytes_after > 0 || value.len() > max_len as usize {
        debug!(window, bytes_after = reply.bytes_after, "payload truncated to {max_len} bytes");
        value.truncate(max_len as usize);
    }
    SlotValue::Set(value)
}

impl PropertyChannel for X11Channel {
    fn register(&self, name: &str) -> Result<ChannelAtom, ChannelError> {
        Ok(self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
    }

    fn root(&self) -> WindowId {
        self.root
    }

    fn enumerate(&self, root: WindowId) -> Result<Vec<WindowId>, ChannelError> {
        Ok(self.conn.query_tree(root)?.reply()?.children)
    }

    fn create_mailbox(&self) -> Result<WindowId, ChannelError> {
        let window = self.conn.generate_id()?;
        self.conn
            .create_window(
                self.root_depth,
                window,
                self.root,
                0,
                0,
                1,
                1,
                0,
                WindowClass::COPY_FROM_PARENT,
                COPY_FROM_PARENT,
                &CreateWindowAux::new(),
            )?
            .check()?;
        Ok(window)
    }

    fn publish(
        &self,
        window: WindowId,
        atom: ChannelAtom,
        payload: &[u8],
    ) -> Result<(), ChannelError> {
        self.conn
            .change_property8(PropMode::REPLACE, window, atom, AtomEnum::STRING, payload)?
            .check()?;
        Ok(())
    }

    fn read(
        &self,
        window: WindowId,
        atom: ChannelAtom,
        max_len: u32,
    ) -> Result<SlotValue, ChannelError> {
        let reply = self
            .conn
            .get_property(false, window, atom, AtomEnum::ANY, 0, long_length(max_len))?
            .reply()?;
        Ok(slot_from_reply(window, reply, max_len))
    }

    fn probe_all(
        &self,
        windows: &[WindowId],
        atom: ChannelAtom,
        max_len: u32,
    ) -> Result<Vec<SlotValue>, ChannelError> {
        // Send every request before waiting on any reply.
        let cookies = windows
            .iter()
            .map(|window| {
                self.conn
                    .get_property(false, *window, atom, AtomEnum::ANY, 0, long_length(max_len))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut slots = Vec::with_capacity(cookies.len());
        for (window, cookie) in windows.iter().zip(cookies) {
            match cookie.reply() {
                Ok(reply) => slots.push(slot_from_reply(*window, reply, max_len)),
                Err(ReplyError::X11Error(err)) => {
                    debug!(window, "probe failed, treating as unset: {err:?}");
                    slots.push(SlotValue::Unset);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(slots)
    }

    fn watch(&self, window: WindowId) -> Result<(), ChannelError> {
        let aux = ChangeWindowAttributesAux::new().event_mask(EventMask::PROPERTY_CHANGE);
        self.conn.change_window_attributes(window, &aux)?.check()?;
        Ok(())
    }

    fn await_change(&self, atom: ChannelAtom) -> Result<ChangeEvent, ChannelError> {
        loop {
            match self.conn.wait_for_event()? {
                Event::PropertyNotify(event)
                    if event.atom == atom && event.state == Property::NEW_VALUE =>
                {
                    return Ok(ChangeEvent {
                        window: event.window,
                        atom: event.atom,
                    });
                }
                other => debug!(?other, "ignoring event"),
            }
        }
    }
}
