use std::collections::BTreeMap;

use crate::config::ViewportConfig;
use crate::layout::Position;
use crate::measure::Size;

/// Pan and zoom state for the canvas. Screen mapping is
/// `screen = canvas * scale + pan`, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale + self.pan_x, y * self.scale + self.pan_y)
    }

    pub fn to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.pan_x) / self.scale,
            (y - self.pan_y) / self.scale,
        )
    }

    /// Every scale write funnels through here so the clamp invariant holds.
    pub fn set_scale(&mut self, scale: f32, config: &ViewportConfig) {
        self.scale = scale.clamp(config.min_scale, config.max_scale);
    }

    pub fn zoom_in(&mut self, config: &ViewportConfig) {
        self.set_scale(self.scale * config.zoom_step, config);
    }

    pub fn zoom_out(&mut self, config: &ViewportConfig) {
        self.set_scale(self.scale / config.zoom_step, config);
    }

    /// Wheel deltas toward the user (positive) zoom out, away zoom in.
    pub fn wheel(&mut self, delta_y: f32, config: &ViewportConfig) {
        if delta_y == 0.0 {
            return;
        }
        let factor = if delta_y > 0.0 {
            config.wheel_out
        } else {
            config.wheel_in
        };
        self.set_scale(self.scale * factor, config);
    }

    /// Scales and centers the whole map inside a view of the given size,
    /// with a margin so boxes never touch the edges. No-op when nothing is
    /// placed. The margin-scaled factor still clamps, so extreme maps may
    /// overflow rather than break the scale invariant.
    pub fn fit_to_screen(
        &mut self,
        bounds: Option<Bounds>,
        view_width: f32,
        view_height: f32,
        config: &ViewportConfig,
    ) {
        let Some(bounds) = bounds else {
            return;
        };
        let scale_x = view_width / bounds.width();
        let scale_y = view_height / bounds.height();
        self.set_scale(scale_x.min(scale_y) * config.fit_margin, config);
        self.pan_x = (view_width - bounds.width() * self.scale) / 2.0 - bounds.min_x * self.scale;
        self.pan_y = (view_height - bounds.height() * self.scale) / 2.0 - bounds.min_y * self.scale;
    }

    /// CSS transform for the canvas element.
    pub fn transform(&self) -> String {
        format!(
            "translate({:.2}px, {:.2}px) scale({:.4})",
            self.pan_x, self.pan_y, self.scale
        )
    }
}

/// Background pan gesture. Captures `pointer - pan` once at begin; every
/// move rebases pan from it, so the canvas tracks the pointer 1:1
/// regardless of scale.
#[derive(Debug, Clone, Copy)]
pub struct PanGesture {
    start_x: f32,
    start_y: f32,
}

impl PanGesture {
    pub fn begin(viewport: &Viewport, pointer_x: f32, pointer_y: f32) -> Self {
        Self {
            start_x: pointer_x - viewport.pan_x,
            start_y: pointer_y - viewport.pan_y,
        }
    }

    pub fn update(&self, viewport: &mut Viewport, pointer_x: f32, pointer_y: f32) {
        viewport.pan_x = pointer_x - self.start_x;
        viewport.pan_y = pointer_y - self.start_y;
    }
}

/// Axis-aligned bounding box over placed node boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// None when no node has both a position and a size.
    pub fn from_boxes(
        positions: &BTreeMap<String, Position>,
        sizes: &BTreeMap<String, Size>,
    ) -> Option<Self> {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for (id, pos) in positions {
            let Some(size) = sizes.get(id) else {
                continue;
            };
            min_x = min_x.min(pos.x);
            min_y = min_y.min(pos.y);
            max_x = max_x.max(pos.x + size.width);
            max_y = max_y.max(pos.y + size.height);
        }
        if min_x == f32::MAX {
            return None;
        }
        Some(Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }
}
