//! Keys held on the physical keyboard
//!
//! The window reports key presses and releases here, and so do mouse presses
//! on the on-screen keyboard. Each [`KeySource`] keeps its own set, so
//! releasing a key from one source leaves it held if the other still holds
//! it. The tick loop reads the union of both sets and merges it with the keys
//! the controller activates.

use crate::mapping::model::{ActiveKeySet, KeyCode};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::trace;

/// Where a held key comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySource {
    /// Window key events and modifier state
    Keyboard,
    /// Mouse presses on the on-screen keyboard
    Mouse,
}

#[derive(Default)]
struct HeldKeys {
    keyboard: ActiveKeySet,
    mouse: ActiveKeySet,
}

impl HeldKeys {
    fn of(&mut self, source: KeySource) -> &mut ActiveKeySet {
        match source {
            KeySource::Keyboard => &mut self.keyboard,
            KeySource::Mouse => &mut self.mouse,
        }
    }

    fn union(&self) -> ActiveKeySet {
        self.keyboard.union(&self.mouse).cloned().collect()
    }
}

pub struct PhysicalKeys {
    held: Mutex<HeldKeys>,
    tx: watch::Sender<ActiveKeySet>,
}

impl Default for PhysicalKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicalKeys {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ActiveKeySet::new());
        Self {
            held: Mutex::new(HeldKeys::default()),
            tx,
        }
    }

    /// Marks a key as held by `source`, returns `false` if it already was
    pub fn key_down(&self, source: KeySource, code: KeyCode) -> bool {
        self.update(|held| {
            let inserted = held.of(source).insert(code.clone());
            if inserted {
                trace!("Physical key down ({:?}): {}", source, code);
            }
            inserted
        })
    }

    /// Marks a key as released by `source`, returns `false` if `source` did not hold it
    pub fn key_up(&self, source: KeySource, code: &KeyCode) -> bool {
        self.update(|held| {
            let removed = held.of(source).remove(code);
            if removed {
                trace!("Physical key up ({:?}): {}", source, code);
            }
            removed
        })
    }

    /// Releases every key held by `source`, e.g. when the window loses focus
    pub fn release_all(&self, source: KeySource) {
        self.update(|held| {
            let keys = held.of(source);
            let had_keys = !keys.is_empty();
            keys.clear();
            had_keys
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<ActiveKeySet> {
        self.tx.subscribe()
    }

    /// Keys held by any source
    pub fn snapshot(&self) -> ActiveKeySet {
        self.tx.borrow().clone()
    }

    fn lock(&self) -> MutexGuard<'_, HeldKeys> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Applies `change` and publishes the union when it differs
    fn update(&self, change: impl FnOnce(&mut HeldKeys) -> bool) -> bool {
        let mut held = self.lock();
        if !change(&mut held) {
            return false;
        }
        let union = held.union();
        self.tx.send_if_modified(|current| {
            if *current == union {
                return false;
            }
            *current = union;
            true
        });
        true
    }
}
