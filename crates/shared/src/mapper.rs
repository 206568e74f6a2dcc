/// Affine transform from an element's local (viewBox) space to screen space,
/// laid out the way `SVGGraphicsElement.getScreenCTM()` reports it:
///
/// ```text
/// screen_x = a * x + c * y + e
/// screen_y = b * x + d * y + f
/// ```
///
/// This covers element position, CSS scaling and viewBox scaling. The
/// viewport's own pan/zoom is a separate layer inside local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl ScreenMatrix {
    pub const IDENTITY: ScreenMatrix = ScreenMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Matrix for an element whose viewBox `vb_w × vb_h` is stretched over a
    /// client rect. Used when the host cannot provide a screen CTM.
    pub fn from_client_rect(
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        vb_w: f64,
        vb_h: f64,
    ) -> Option<Self> {
        if vb_w <= 0.0 || vb_h <= 0.0 {
            return None;
        }
        Some(ScreenMatrix {
            a: width / vb_w,
            b: 0.0,
            c: 0.0,
            d: height / vb_h,
            e: left,
            f: top,
        })
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Inverse transform, or `None` when the matrix is singular (e.g. the
    /// element is collapsed to zero size).
    pub fn inverse(&self) -> Option<ScreenMatrix> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }
        Some(ScreenMatrix {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Convert a screen (client) point into the element's local space.
    pub fn screen_to_local(&self, screen_x: f64, screen_y: f64) -> Option<(f64, f64)> {
        self.inverse().map(|inv| inv.apply(screen_x, screen_y))
    }
}
