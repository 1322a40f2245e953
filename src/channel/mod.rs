//! Shared-registry channel abstraction.
//!
//! Window properties form a globally visible key/value store with change
//! notification. A channel is one property name: each window carries its own
//! slot for it, and writes replace the slot's whole value (last write wins,
//! no queue, no authentication).

#[cfg(test)]
pub(crate) mod memory;
mod x11;

pub use x11::X11Channel;

use crate::error::ChannelError;

/// Opaque registry-side identifier of an addressable slot.
pub type WindowId = u32;

/// Interned channel handle. Only meaningful within one registry session.
pub type ChannelAtom = u32;

/// Current content of one window's slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    /// The window has never carried this channel (or it was deleted).
    Unset,
    /// The slot holds a value, possibly empty, possibly truncated to the
    /// requested read length.
    Set(Vec<u8>),
}

impl SlotValue {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }
}

/// One change notification from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub window: WindowId,
    pub atom: ChannelAtom,
}

/// Operations the client and server need from the shared registry.
///
/// Every error is fatal: it means the registry connection is unusable.
pub trait PropertyChannel {
    /// Intern `name`. The same name yields the same handle within a session.
    fn register(&self, name: &str) -> Result<ChannelAtom, ChannelError>;

    /// Root container whose direct children are discovery candidates.
    fn root(&self) -> WindowId;

    /// Snapshot of the direct children of `root` at call time.
    fn enumerate(&self, root: WindowId) -> Result<Vec<WindowId>, ChannelError>;

    /// Create a window owned by this connection, to be used as a mailbox.
    /// It disappears when the connection closes.
    fn create_mailbox(&self) -> Result<WindowId, ChannelError>;

    /// Replace the whole value of `window`'s slot for `atom`.
    fn publish(&self, window: WindowId, atom: ChannelAtom, payload: &[u8])
        -> Result<(), ChannelError>;

    /// Read at most `max_len` bytes of `window`'s slot for `atom`.
    fn read(&self, window: WindowId, atom: ChannelAtom, max_len: u32)
        -> Result<SlotValue, ChannelError>;

    /// Read the slot of every window in `windows`, in order.
    ///
    /// A window that vanished since it was enumerated reads as
    /// [`SlotValue::Unset`].
    fn probe_all(
        &self,
        windows: &[WindowId],
        atom: ChannelAtom,
        max_len: u32,
    ) -> Result<Vec<SlotValue>, ChannelError> {
        windows
            .iter()
            .map(|window| self.read(*window, atom, max_len))
            .collect()
    }

    /// Ask for change notifications on `window`.
    fn watch(&self, window: WindowId) -> Result<(), ChannelError>;

    /// Block until a watched window's slot for `atom` changes.
    ///
    /// Events for other atoms are skipped. Duplicate notifications for one
    /// write are passed through.
    fn await_change(&self, atom: ChannelAtom) -> Result<ChangeEvent, ChannelError>;
}
