//! ViewportAdapter -- layout mode and the resizable sidebar.
//!
//! Pure UI state: nothing here touches the session store or the network.
//! While resizing, pointer listeners are held in the adapter's
//! [`ListenerRegistry`] and released as soon as the pointer is let go.

use tracing::debug;

use super::event::UiEvent;
use super::listeners::{Listener, ListenerRegistry};

/// Widths strictly below this are the mobile layout.
pub const MOBILE_BREAKPOINT: u32 = 768;
pub const MIN_SIDEBAR_WIDTH: u32 = 250;
pub const MAX_SIDEBAR_WIDTH: u32 = 500;
pub const DEFAULT_SIDEBAR_WIDTH: u32 = 320;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeState {
    #[default]
    NotResizing,
    Resizing,
}

#[derive(Debug, Clone)]
pub struct ViewportAdapter {
    is_mobile: bool,
    sidebar_open: bool,
    sidebar_width: u32,
    resize: ResizeState,
    listeners: ListenerRegistry,
}

impl Default for ViewportAdapter {
    fn default() -> Self {
        Self {
            is_mobile: false,
            sidebar_open: false,
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
            resize: ResizeState::NotResizing,
            listeners: ListenerRegistry::new(),
        }
    }
}

impl ViewportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount the adapter: start listening for viewport resizes and take the
    /// current width as the first measurement.
    pub fn activate(&mut self, width: u32) {
        self.listeners.install(Listener::ViewportResize);
        self.on_viewport_resize(width);
    }

    /// Unmount: every listener goes, including an unfinished drag's.
    pub fn deactivate(&mut self) {
        self.listeners.teardown_all();
        self.resize = ResizeState::NotResizing;
    }

    /// Route an event to its handler. Events without an installed listener
    /// are ignored, as are events this adapter does not care about.
    pub fn handle(&mut self, event: &UiEvent) {
        match event {
            UiEvent::ViewportResized { width } if self.listens(Listener::ViewportResize) => {
                self.on_viewport_resize(*width)
            }
            UiEvent::ResizeHandlePressed => self.begin_resize(),
            UiEvent::PointerMoved { x } if self.listens(Listener::PointerMove) => {
                self.on_pointer_move(*x)
            }
            UiEvent::PointerReleased if self.listens(Listener::PointerUp) => self.on_pointer_up(),
            _ => {}
        }
    }

    pub fn on_viewport_resize(&mut self, width: u32) {
        let was_mobile = self.is_mobile;
        self.is_mobile = width < MOBILE_BREAKPOINT;
        if !self.is_mobile {
            self.sidebar_open = false;
        }
        if was_mobile != self.is_mobile {
            debug!(width, is_mobile = self.is_mobile, "Layout mode changed");
        }
    }

    pub fn open_sidebar(&mut self) {
        self.sidebar_open = true;
    }

    /// Dismiss the overlay, as when the user goes back to typing.
    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    /// Selecting a session closes the overlay on mobile.
    pub fn on_session_selected(&mut self) {
        if self.is_mobile {
            self.sidebar_open = false;
        }
    }

    /// Handle press. Ignored in the mobile layout, where the sidebar is an
    /// overlay with no handle.
    pub fn begin_resize(&mut self) {
        if self.is_mobile || self.resize == ResizeState::Resizing {
            return;
        }
        self.resize = ResizeState::Resizing;
        self.listeners.install(Listener::PointerMove);
        self.listeners.install(Listener::PointerUp);
        debug!(width = self.sidebar_width, "Sidebar resize started");
    }

    /// Propose `x` as the new width. Out-of-range proposals are dropped.
    pub fn on_pointer_move(&mut self, x: i32) {
        if self.resize != ResizeState::Resizing || self.is_mobile {
            return;
        }
        let Ok(proposed) = u32::try_from(x) else {
            return;
        };
        if (MIN_SIDEBAR_WIDTH..=MAX_SIDEBAR_WIDTH).contains(&proposed) {
            self.sidebar_width = proposed;
        }
    }

    pub fn on_pointer_up(&mut self) {
        if self.resize == ResizeState::NotResizing {
            return;
        }
        self.resize = ResizeState::NotResizing;
        self.listeners.teardown(Listener::PointerMove);
        self.listeners.teardown(Listener::PointerUp);
        debug!(width = self.sidebar_width, "Sidebar resize finished");
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn sidebar_width(&self) -> u32 {
        self.sidebar_width
    }

    pub fn resize_state(&self) -> ResizeState {
        self.resize
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    fn listens(&self, listener: Listener) -> bool {
        self.listeners.is_installed(listener)
    }
}
