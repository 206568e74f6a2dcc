//! View transform state for the map viewport.
//!
//! The view matrix is a uniform scale followed by a translation, applied inside
//! the SVG's local coordinate space: `local = content * scale + translate`.

use tracing::trace;

pub const ZOOM_MIN: f64 = 0.2;
pub const ZOOM_MAX: f64 = 5.0;

/// Relative zoom change per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;

/// Zoom factor applied by the toolbar zoom-in button (zoom-out uses the inverse).
pub const BUTTON_ZOOM_FACTOR: f64 = 1.2;

// Nominal viewBox of the map SVG. Button zoom pivots on its center.
pub const VIEW_BOX_WIDTH: f64 = 1000.0;
pub const VIEW_BOX_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMatrix {
    scale: f64,
    translate_x: f64,
    translate_y: f64,
}

impl Default for ViewMatrix {
    fn default() -> Self {
        ViewMatrix {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl ViewMatrix {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> (f64, f64) {
        (self.translate_x, self.translate_y)
    }

    /// Zoom by `factor` keeping the local-space `pivot` visually fixed.
    ///
    /// The resulting scale is clamped to `[ZOOM_MIN, ZOOM_MAX]`. Non-finite or
    /// non-positive factors leave the matrix untouched.
    pub fn zoom_by(&mut self, factor: f64, pivot_x: f64, pivot_y: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_scale = (self.scale * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        if (new_scale - self.scale).abs() < 1e-12 {
            return;
        }
        let (tx, ty) = zoom_pan_at_cursor(
            pivot_x,
            pivot_y,
            self.scale,
            new_scale,
            self.translate_x,
            self.translate_y,
        );
        *self = ViewMatrix {
            scale: new_scale,
            translate_x: tx,
            translate_y: ty,
        };
        trace!(scale = new_scale, tx, ty, "zoomed view");
    }

    /// Set the translation to `initial + delta`.
    ///
    /// Continuous pans always recompute from the gesture baseline rather than
    /// accumulating per-frame deltas.
    pub fn pan_from(&mut self, initial_x: f64, initial_y: f64, dx: f64, dy: f64) {
        self.translate_x = initial_x + dx;
        self.translate_y = initial_y + dy;
    }

    pub fn reset(&mut self) {
        *self = ViewMatrix::default();
    }

    /// SVG `transform` attribute value for the content group.
    pub fn transform_attr(&self) -> String {
        format!(
            "translate({}, {}) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }

    /// Map a content-space point to the viewport's local space.
    pub fn content_to_local(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }

    /// Map a local-space point back into content space.
    pub fn local_to_content(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.translate_x) / self.scale,
            (y - self.translate_y) / self.scale,
        )
    }
}

/// Compute new translation so that `cursor` stays over the same content point
/// when zooming from `old_zoom` to `new_zoom`.
fn zoom_pan_at_cursor(
    cursor_x: f64,
    cursor_y: f64,
    old_zoom: f64,
    new_zoom: f64,
    old_pan_x: f64,
    old_pan_y: f64,
) -> (f64, f64) {
    let ratio = new_zoom / old_zoom;
    (
        cursor_x - (cursor_x - old_pan_x) * ratio,
        cursor_y - (cursor_y - old_pan_y) * ratio,
    )
}

/// Zoom factor for a wheel event: scrolling down zooms out, anything else zooms in.
pub fn wheel_zoom_factor(delta_y: f64) -> f64 {
    if delta_y > 0.0 {
        1.0 - WHEEL_ZOOM_STEP
    } else {
        1.0 + WHEEL_ZOOM_STEP
    }
}

/// Center of the nominal viewBox, used as the pivot for toolbar zoom.
pub fn view_box_center() -> (f64, f64) {
    (VIEW_BOX_WIDTH / 2.0, VIEW_BOX_HEIGHT / 2.0)
}
