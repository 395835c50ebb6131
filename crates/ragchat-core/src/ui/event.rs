//! Input events delivered to the UI adapters.

/// A file handed over by a drop gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Everything the viewport and drop-zone adapters react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The viewport width changed (logical pixels).
    ViewportResized { width: u32 },
    /// Pointer pressed on the sidebar's resize handle.
    ResizeHandlePressed,
    /// Pointer moved; `x` is the horizontal position in logical pixels.
    PointerMoved { x: i32 },
    PointerReleased,
    DragOver,
    DragLeave,
    Drop { files: Vec<DroppedFile> },
}
