//! In-process registry for exercising client and server without a display.
//!
//! Clones share one registry but act as separate connections: each has its
//! own event queue, fed only by windows that connection watches. An empty
//! queue reads as a lost connection so server loops end deterministically.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ChangeEvent, ChannelAtom, PropertyChannel, SlotValue, WindowId};
use crate::error::ChannelError;

const ROOT: WindowId = 1;

static NEXT_CONNECTION: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default)]
struct State {
    atoms: HashMap<String, ChannelAtom>,
    children: Vec<WindowId>,
    slots: HashMap<(WindowId, ChannelAtom), Vec<u8>>,
    watchers: HashMap<WindowId, Vec<usize>>,
    queues: HashMap<usize, VecDeque<ChangeEvent>>,
    writes: Vec<(WindowId, Vec<u8>)>,
    next_window: WindowId,
}

#[derive(Debug)]
pub(crate) struct MemoryRegistry {
    state: Arc<Mutex<State>>,
    connection: usize,
}

impl MemoryRegistry {
    pub(crate) fn new() -> Self {
        let state = State {
            next_window: ROOT + 1,
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            connection: NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// A new connection to the same registry.
    pub(crate) fn connect(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            connection: NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("registry lock poisoned")
    }

    /// Add a top-level window not owned by any runlocal process.
    pub(crate) fn add_foreign_window(&self) -> WindowId {
        let mut state = self.lock();
        let window = state.next_window;
        state.next_window += 1;
        state.children.push(window);
        window
    }

    /// Drop a window and its slots, as if its owner disconnected.
    pub(crate) fn destroy_window(&self, window: WindowId) {
        let mut state = self.lock();
        state.children.retain(|w| *w != window);
        state.slots.retain(|(w, _), _| *w != window);
        state.watchers.remove(&window);
    }

    /// Every publish seen by the registry, in order.
    pub(crate) fn writes(&self) -> Vec<(WindowId, Vec<u8>)> {
        self.lock().writes.clone()
    }
}

impl PropertyChannel for MemoryRegistry {
    fn register(&self, name: &str) -> Result<ChannelAtom, ChannelError> {
        let mut state = self.lock();
        let next = state.atoms.len() as ChannelAtom + 100;
        Ok(*state.atoms.entry(name.to_string()).or_insert(next))
    }

    fn root(&self) -> WindowId {
        ROOT
    }

    fn enumerate(&self, root: WindowId) -> Result<Vec<WindowId>, ChannelError> {
        if root != ROOT {
            return Err(ChannelError::Request(format!("no such window {root}")));
        }
        Ok(self.lock().children.clone())
    }

    fn create_mailbox(&self) -> Result<WindowId, ChannelError> {
        Ok(self.add_foreign_window())
    }

    fn publish(
        &self,
        window: WindowId,
        atom: ChannelAtom,
        payload: &[u8],
    ) -> Result<(), ChannelError> {
        let mut state = self.lock();
        if !state.children.contains(&window) {
            return Err(ChannelError::Request(format!("no such window {window}")));
        }
        state.slots.insert((window, atom), payload.to_vec());
        state.writes.push((window, payload.to_vec()));
        let watchers = state.watchers.get(&window).cloned().unwrap_or_default();
        for connection in watchers {
            state
                .queues
                .entry(connection)
                .or_default()
                .push_back(ChangeEvent { window, atom });
        }
        Ok(())
    }

    fn read(
        &self,
        window: WindowId,
        atom: ChannelAtom,
        max_len: u32,
    ) -> Result<SlotValue, ChannelError> {
        let state = self.lock();
        if !state.children.contains(&window) {
            return Err(ChannelError::Request(format!("no such window {window}")));
        }
        Ok(match state.slots.get(&(window, atom)) {
            Some(value) => {
                let len = value.len().min(max_len as usize);
                SlotValue::Set(value[..len].to_vec())
            }
            None => SlotValue::Unset,
        })
    }

    fn probe_all(
        &self,
        windows: &[WindowId],
        atom: ChannelAtom,
        max_len: u32,
    ) -> Result<Vec<SlotValue>, ChannelError> {
        Ok(windows
            .iter()
            .map(|window| self.read(*window, atom, max_len).unwrap_or(SlotValue::Unset))
            .collect())
    }

    fn watch(&self, window: WindowId) -> Result<(), ChannelError> {
        let mut state = self.lock();
        state.watchers.entry(window).or_default().push(self.connection);
        Ok(())
    }

    fn await_change(&self, atom: ChannelAtom) -> Result<ChangeEvent, ChannelError> {
        let mut state = self.lock();
        let queue = state.queues.entry(self.connection).or_default();
        while let Some(event) = queue.pop_front() {
            if event.atom == atom {
                return Ok(event);
            }
        }
        Err(ChannelError::Connection("memory registry drained".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent_per_name() {
        let registry = MemoryRegistry::new();
        let a = registry.register("RUNLOCAL_EXECUTE").unwrap();
        let b = registry.connect().register("RUNLOCAL_EXECUTE").unwrap();
        let c = registry.register("OTHER").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn distinguishes_unset_from_empty() {
        let registry = MemoryRegistry::new();
        let atom = registry.register("X").unwrap();
        let window = registry.add_foreign_window();
        assert_eq!(registry.read(window, atom, 16).unwrap(), SlotValue::Unset);
        registry.publish(window, atom, b"").unwrap();
        assert_eq!(registry.read(window, atom, 16).unwrap(), SlotValue::Set(Vec::new()));
    }

    #[test]
    fn notifications_go_only_to_watching_connection() {
        let registry = MemoryRegistry::new();
        let watcher = registry.connect();
        let atom = registry.register("X").unwrap();
        let window = watcher.create_mailbox().unwrap();
        watcher.watch(window).unwrap();
        registry.publish(window, atom, b"v").unwrap();
        assert_eq!(
            watcher.await_change(atom).unwrap(),
            ChangeEvent { window, atom }
        );
        assert!(registry.await_change(atom).is_err());
        assert!(watcher.await_change(atom).is_err());
    }

    #[test]
    fn enumerate_is_a_snapshot() {
        let registry = MemoryRegistry::new();
        registry.add_foreign_window();
        let before = registry.enumerate(registry.root()).unwrap();
        registry.add_foreign_window();
        assert_eq!(before.len(), 1);
        assert_eq!(registry.enumerate(registry.root()).unwrap().len(), 2);
    }

    #[test]
    fn vanished_window_probes_as_unset() {
        let registry = MemoryRegistry::new();
        let atom = registry.register("X").unwrap();
        let window = registry.add_foreign_window();
        registry.publish(window, atom, b"\0").unwrap();
        let stale = registry.enumerate(registry.root()).unwrap();
        registry.destroy_window(window);
        assert_eq!(
            registry.probe_all(&stale, atom, 64).unwrap(),
            vec![SlotValue::Unset]
        );
    }
}
