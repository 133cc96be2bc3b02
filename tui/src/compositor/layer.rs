//! Layer - one compositable region of the screen

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::LayerId;

/// A single layer in the compositor
pub struct Layer {
    /// Unique identifier
    pub id: LayerId,
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Screen position and size
    pub bounds: Rect,
    /// Whether the layer takes part in compositing
    pub visible: bool,
    /// Opaque layers hide everything beneath their bounds; transparent ones
    /// only cover cells they actually drew on
    pub opaque: bool,
    /// Render buffer, in layer-local coordinates
    pub buffer: Buffer,
}

impl Layer {
    /// Create a layer with an empty buffer sized to `bounds`
    pub fn new(id: LayerId, bounds: Rect, z_index: i32, opaque: bool) -> Self {
        Self {
            id,
            z_index,
            bounds,
            visible: true,
            opaque,
            buffer: Buffer::empty(local_area(bounds)),
        }
    }

    /// Move and resize; the buffer is reallocated only when the size changes
    pub fn set_bounds(&mut self, bounds: Rect) {
        if bounds.width != self.bounds.width || bounds.height != self.bounds.height {
            self.buffer = Buffer::empty(local_area(bounds));
        }
        self.bounds = bounds;
    }
}

fn local_area(bounds: Rect) -> Rect {
    Rect::new(0, 0, bounds.width, bounds.height)
}
