use atlas_shared::mapper::ScreenMatrix;
use atlas_shared::viewport::{VIEW_BOX_HEIGHT, VIEW_BOX_WIDTH};
use wasm_bindgen::JsCast;

/// Read the screen transform of the map SVG.
///
/// Prefers the element's screen CTM, which already folds in page offset, CSS
/// scaling and viewBox fitting. Falls back to stretching the viewBox over the
/// bounding client rect.
pub fn element_screen_matrix(element_id: &str) -> Option<ScreenMatrix> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(element_id)?;

    if let Some(svg) = element.dyn_ref::<web_sys::SvgGraphicsElement>() {
        if let Some(m) = svg.get_screen_ctm() {
            return Some(ScreenMatrix {
                a: m.a() as f64,
                b: m.b() as f64,
                c: m.c() as f64,
                d: m.d() as f64,
                e: m.e() as f64,
                f: m.f() as f64,
            });
        }
    }

    let rect = element.get_bounding_client_rect();
    ScreenMatrix::from_client_rect(
        rect.left(),
        rect.top(),
        rect.width(),
        rect.height(),
        VIEW_BOX_WIDTH,
        VIEW_BOX_HEIGHT,
    )
}

/// Convert client coordinates to the SVG's local (viewBox) space.
pub fn client_to_local(client_x: f64, client_y: f64, element_id: &str) -> Option<(f64, f64)> {
    element_screen_matrix(element_id)?.screen_to_local(client_x, client_y)
}
