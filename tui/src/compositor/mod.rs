//! Layered Compositor
//!
//! Each screen region (mode selector, input line, results, status bar,
//! toast) renders into its own layer buffer. The compositor stacks the
//! visible layers back to front into one output buffer, which the app then
//! copies into the terminal frame.

mod layer;

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

pub use layer::Layer;

/// Unique identifier for a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(u32);

/// Owns the layers and stacks them into the output buffer
pub struct Compositor {
    layers: HashMap<LayerId, Layer>,
    /// Layer ids sorted back to front
    render_order: Vec<LayerId>,
    next_id: u32,
    output: Buffer,
    area: Rect,
}

impl Compositor {
    /// Create a compositor covering `area`
    pub fn new(area: Rect) -> Self {
        Self {
            layers: HashMap::new(),
            render_order: Vec::new(),
            next_id: 0,
            output: Buffer::empty(area),
            area,
        }
    }

    /// Add a layer and return its id
    pub fn create_layer(&mut self, bounds: Rect, z_index: i32, opaque: bool) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        self.layers
            .insert(id, Layer::new(id, bounds, z_index, opaque));
        self.update_render_order();
        id
    }

    /// Mutable access to a layer's buffer for rendering
    pub fn layer_buffer_mut(&mut self, id: LayerId) -> Option<&mut Buffer> {
        self.layers.get_mut(&id).map(|l| &mut l.buffer)
    }

    /// Move and resize a layer
    pub fn set_bounds(&mut self, id: LayerId, bounds: Rect) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.set_bounds(bounds);
        }
    }

    /// Current bounds of a layer
    pub fn bounds(&self, id: LayerId) -> Option<Rect> {
        self.layers.get(&id).map(|l| l.bounds)
    }

    /// Show or hide a layer
    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.visible = visible;
        }
    }

    /// Whether a layer is currently shown
    pub fn is_visible(&self, id: LayerId) -> bool {
        self.layers.get(&id).is_some_and(|l| l.visible)
    }

    /// Resize the output area
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.output = Buffer::empty(area);
    }

    /// Stack all visible layers into the output buffer
    pub fn composite(&mut self) -> &Buffer {
        self.output.reset();

        for id in &self.render_order {
            if let Some(layer) = self.layers.get(id) {
                if layer.visible {
                    Self::blit_layer(&mut self.output, layer);
                }
            }
        }

        &self.output
    }

    fn blit_layer(output: &mut Buffer, layer: &Layer) {
        let bounds = layer.bounds;
        for ly in 0..bounds.height {
            for lx in 0..bounds.width {
                let Some(src) = layer.buffer.cell((lx, ly)) else {
                    continue;
                };
                // Transparent layers let blank cells show through
                if !layer.opaque && src.symbol() == " " {
                    continue;
                }
                let (dst_x, dst_y) = (bounds.x.saturating_add(lx), bounds.y.saturating_add(ly));
                if let Some(dst) = output.cell_mut((dst_x, dst_y)) {
                    *dst = src.clone();
                }
            }
        }
    }

    fn update_render_order(&mut self) {
        self.render_order = self.layers.keys().copied().collect();
        self.render_order
            .sort_by_key(|id| (self.layers.get(id).map_or(0, |l| l.z_index), id.0));
    }
}
