//! Registry of installed global input listeners.
//!
//! Components install listeners while they need them (pointer tracking during
//! a sidebar drag, drop handling while a drop zone is mounted) and tear them
//! down afterwards. The registry makes that lifecycle observable so teardown
//! can be asserted on.

use std::collections::BTreeSet;

/// A global listener a component may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Listener {
    ViewportResize,
    PointerMove,
    PointerUp,
    DragOver,
    DragLeave,
    Drop,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListenerRegistry {
    installed: BTreeSet<Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `listener`. Returns `false` if it was already installed.
    pub fn install(&mut self, listener: Listener) -> bool {
        self.installed.insert(listener)
    }

    /// Remove `listener`. Returns `false` if it was not installed.
    pub fn teardown(&mut self, listener: Listener) -> bool {
        self.installed.remove(&listener)
    }

    pub fn teardown_all(&mut self) {
        self.installed.clear();
    }

    pub fn is_installed(&self, listener: Listener) -> bool {
        self.installed.contains(&listener)
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }

    pub fn installed(&self) -> impl Iterator<Item = Listener> + '_ {
        self.installed.iter().copied()
    }
}
