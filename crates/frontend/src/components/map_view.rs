use std::cell::RefCell;
use std::rc::{Rc, Weak};

use atlas_shared::gesture::{idle_cursor, Cursor, GestureController, InputKind};
use atlas_shared::history::LocationHistory;
use atlas_shared::models::{find_location, FindLocationRequest, Location, LocationId, Region};
use atlas_shared::viewport::{
    view_box_center, wheel_zoom_factor, ViewMatrix, BUTTON_ZOOM_FACTOR, VIEW_BOX_HEIGHT,
    VIEW_BOX_WIDTH,
};
use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use gloo_render::AnimationFrame;
use tracing::warn;

use crate::components::find_location_modal::FindLocationModal;
use crate::components::legend::Legend;
use crate::components::location_layer::{LocationLayer, NodeGestureStart};
use crate::components::location_modal::LocationModal;
use crate::components::map_toolbar::MapToolbar;
use crate::coords;
use crate::listeners::{next_frame, GestureListeners};

pub const MAP_SVG_ID: &str = "atlas-map-svg";

/// Gesture bookkeeping that lives outside the reactive graph so raw input
/// events do not trigger re-renders. Only committed frames touch signals.
#[derive(Default)]
struct GestureSession {
    controller: GestureController,
    listeners: Option<GestureListeners>,
    frame: Option<AnimationFrame>,
    suppress_click: bool,
}

impl GestureSession {
    /// Drop listeners and any scheduled frame. Returned so the caller can
    /// drop them after releasing the `RefCell` borrow.
    fn release(&mut self) -> (Option<GestureListeners>, Option<AnimationFrame>) {
        (self.listeners.take(), self.frame.take())
    }

    /// Store freshly acquired listeners. Without them nothing would ever end
    /// the gesture, so a failed acquisition aborts it.
    fn install_listeners(&mut self, listeners: Option<GestureListeners>) -> bool {
        match listeners {
            Some(listeners) => {
                self.listeners = Some(listeners);
                true
            }
            None => {
                warn!("window listeners unavailable, gesture abandoned");
                self.controller.abort();
                false
            }
        }
    }
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Handles needed by the window-level listeners and frame callbacks.
#[derive(Clone, Copy)]
struct GestureBindings {
    view: Signal<ViewMatrix>,
    cursor: Signal<Option<Cursor>>,
    locations: ReadSignal<Vec<Location>>,
    on_update_coordinates: EventHandler<(LocationId, f64, f64)>,
}

fn on_pointer_move(
    session: &Weak<RefCell<GestureSession>>,
    bindings: GestureBindings,
    x: f64,
    y: f64,
) {
    let Some(rc) = session.upgrade() else { return };
    let needs_frame = rc.borrow_mut().controller.pointer_moved(x, y);
    if !needs_frame {
        return;
    }
    let weak = Rc::downgrade(&rc);
    let frame = next_frame(move || commit_frame(&weak, bindings));
    rc.borrow_mut().frame = Some(frame);
}

fn commit_frame(session: &Weak<RefCell<GestureSession>>, bindings: GestureBindings) {
    let Some(rc) = session.upgrade() else { return };
    let GestureBindings {
        mut view,
        locations,
        on_update_coordinates,
        ..
    } = bindings;

    let mut next_view = *view.peek();
    let mut update = None;
    let committed = {
        let mut s = rc.borrow_mut();
        let locations = locations.peek();
        let mut sink = |id: &str, x: f64, y: f64| update = Some((id.to_string(), x, y));
        s.controller.commit_frame(&mut next_view, &locations, &mut sink)
    };
    if !committed {
        return;
    }
    if next_view != *view.peek() {
        view.set(next_view);
    }
    if let Some(update) = update {
        on_update_coordinates.call(update);
    }
}

fn on_pointer_end(session: &Weak<RefCell<GestureSession>>, bindings: GestureBindings) {
    let Some(rc) = session.upgrade() else { return };
    let GestureBindings {
        mut view,
        mut cursor,
        locations,
        on_update_coordinates,
    } = bindings;

    let mut next_view = *view.peek();
    let mut update = None;
    let released = {
        let mut s = rc.borrow_mut();
        let locations = locations.peek();
        let mut sink = |id: &str, x: f64, y: f64| update = Some((id.to_string(), x, y));
        if let Some(summary) = s.controller.finish(&mut next_view, &locations, &mut sink) {
            s.suppress_click = summary.moved;
        }
        s.release()
    };
    drop(released);
    if next_view != *view.peek() {
        view.set(next_view);
    }
    if let Some(update) = update {
        on_update_coordinates.call(update);
    }
    cursor.set(None);
}

/// Make sure the window-level move/end listeners are registered. Returns
/// `false` and abandons the gesture when they cannot be.
fn acquire_listeners(session: &Rc<RefCell<GestureSession>>, bindings: GestureBindings) -> bool {
    if session.borrow().listeners.is_some() {
        return true;
    }
    let move_session = Rc::downgrade(session);
    let end_session = Rc::downgrade(session);
    let listeners = GestureListeners::acquire(
        move |x, y| on_pointer_move(&move_session, bindings, x, y),
        move || on_pointer_end(&end_session, bindings),
    );
    session.borrow_mut().install_listeners(listeners)
}

#[component]
pub fn MapView(
    locations: ReadSignal<Vec<Location>>,
    regions: ReadSignal<Vec<Region>>,
    current_location_id: Option<LocationId>,
    on_update_coordinates: EventHandler<(LocationId, f64, f64)>,
    on_find_location: EventHandler<FindLocationRequest>,
    on_exit: EventHandler<()>,
) -> Element {
    let mut view = use_signal(ViewMatrix::default);
    let mut cursor = use_signal(|| None::<Cursor>);
    let mut edit_mode = use_signal(|| false);
    let mut legend_visible = use_signal(|| false);
    let mut find_open = use_signal(|| false);
    let mut history = use_signal(LocationHistory::new);

    let session = use_hook(|| Rc::new(RefCell::new(GestureSession::default())));

    // Listeners and pending frames must not outlive the viewport.
    {
        let session = session.clone();
        use_drop(move || {
            let released = session.borrow_mut().release();
            drop(released);
        });
    }

    let bindings = GestureBindings {
        view,
        cursor,
        locations,
        on_update_coordinates,
    };

    let start_pan = {
        let session = session.clone();
        move |x: f64, y: f64, input: InputKind| {
            let started = {
                let mut s = session.borrow_mut();
                s.suppress_click = false;
                s.controller.begin_pan(x, y, &view.peek(), input)
            };
            if started && acquire_listeners(&session, bindings) {
                cursor.set(Some(Cursor::Grabbing));
            }
        }
    };

    let start_drag = {
        let session = session.clone();
        move |start: NodeGestureStart| {
            let started = {
                let mut s = session.borrow_mut();
                s.suppress_click = false;
                s.controller.begin_drag(
                    start.x,
                    start.y,
                    &start.location_id,
                    *edit_mode.peek(),
                    &locations.peek(),
                    start.input,
                )
            };
            if started && acquire_listeners(&session, bindings) {
                cursor.set(Some(Cursor::Move));
            }
        }
    };

    let on_node_click = {
        let session = session.clone();
        move |id: LocationId| {
            if std::mem::take(&mut session.borrow_mut().suppress_click) {
                return;
            }
            if find_location(&locations.read(), &id).is_none() {
                return;
            }
            history.write().select_root(id);
        }
    };

    let mut zoom_about_center = move |factor: f64| {
        let (cx, cy) = view_box_center();
        view.write().zoom_by(factor, cx, cy);
    };

    let cur_edit = *edit_mode.read();
    let cursor_css = cursor
        .read()
        .unwrap_or_else(|| idle_cursor(cur_edit))
        .css();
    let transform = view.read().transform_attr();
    let view_box = format!("0 0 {VIEW_BOX_WIDTH} {VIEW_BOX_HEIGHT}");
    let mut start_pan_touch = start_pan.clone();
    let mut start_pan_mouse = start_pan;

    rsx! {
        div { class: "map-page",
            MapToolbar {
                edit_mode: cur_edit,
                legend_visible: *legend_visible.read(),
                on_zoom_in: move |_| zoom_about_center(BUTTON_ZOOM_FACTOR),
                on_zoom_out: move |_| zoom_about_center(1.0 / BUTTON_ZOOM_FACTOR),
                on_reset_view: move |_| view.write().reset(),
                on_toggle_edit: move |_| {
                    let next = !*edit_mode.peek();
                    edit_mode.set(next);
                },
                on_toggle_legend: move |_| {
                    let next = !*legend_visible.peek();
                    legend_visible.set(next);
                },
                on_find: move |_| find_open.set(true),
                on_exit: move |_| on_exit.call(()),
            }

            div {
                class: "map-viewport",
                style: "cursor: {cursor_css};",

                onwheel: move |evt: Event<WheelData>| {
                    evt.prevent_default();
                    let factor = wheel_zoom_factor(wheel_delta_y(evt.data().delta()));
                    let client = evt.data().client_coordinates();
                    let Some((px, py)) = coords::client_to_local(client.x, client.y, MAP_SVG_ID) else {
                        return;
                    };
                    view.write().zoom_by(factor, px, py);
                },

                onmousedown: move |evt: Event<MouseData>| {
                    if evt.trigger_button() != Some(MouseButton::Primary) {
                        return;
                    }
                    let client = evt.client_coordinates();
                    start_pan_mouse(client.x, client.y, InputKind::Mouse);
                },

                ontouchstart: move |evt: Event<TouchData>| {
                    let touches = evt.data().touches();
                    let Some(t) = touches.first() else { return };
                    let client = t.client_coordinates();
                    start_pan_touch(client.x, client.y, InputKind::Touch);
                },

                ondoubleclick: move |evt: Event<MouseData>| {
                    evt.prevent_default();
                    view.write().reset();
                },

                svg {
                    id: MAP_SVG_ID,
                    view_box: "{view_box}",
                    width: "100%",
                    height: "100%",

                    g { transform: "{transform}",
                        LocationLayer {
                            locations: locations,
                            edit_mode: cur_edit,
                            current_location_id: current_location_id.clone(),
                            selected_location_id: history.read().current_id().cloned(),
                            on_node_gesture_start: start_drag,
                            on_node_click: on_node_click,
                        }
                    }
                }
            }

            if *legend_visible.read() {
                Legend { on_close: move |_| legend_visible.set(false) }
            }

            LocationModal {
                history: history,
                locations: locations,
                regions: regions,
            }

            FindLocationModal {
                open: find_open,
                regions: regions,
                on_submit: move |req: FindLocationRequest| {
                    find_open.set(false);
                    on_find_location.call(req);
                },
            }
        }
    }
}
