//! Window-level input listeners held for the lifetime of one gesture.

use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::{request_animation_frame, AnimationFrame};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, TouchEvent};

/// Global move/end listeners. Dropping the value unregisters every listener,
/// so the owner releases them by dropping it on gesture end or unmount.
pub struct GestureListeners {
    _listeners: Vec<EventListener>,
}

impl GestureListeners {
    pub fn acquire<M, E>(on_move: M, on_end: E) -> Option<Self>
    where
        M: Fn(f64, f64) + 'static,
        E: Fn() + 'static,
    {
        let window = web_sys::window()?;
        let on_move = Rc::new(on_move);
        let on_end = Rc::new(on_end);
        let mut listeners = Vec::with_capacity(5);

        let mouse_move = on_move.clone();
        listeners.push(EventListener::new_with_options(
            &window,
            "mousemove",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                suppress_default(event);
                mouse_move(mouse.client_x() as f64, mouse.client_y() as f64);
            },
        ));

        let touch_move = on_move;
        listeners.push(EventListener::new_with_options(
            &window,
            "touchmove",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(touch) = event
                    .dyn_ref::<TouchEvent>()
                    .and_then(|t| t.touches().get(0))
                else {
                    return;
                };
                suppress_default(event);
                touch_move(touch.client_x() as f64, touch.client_y() as f64);
            },
        ));

        for name in ["mouseup", "touchend", "touchcancel"] {
            let end = on_end.clone();
            listeners.push(EventListener::new(&window, name, move |_event: &Event| end()));
        }

        Some(GestureListeners {
            _listeners: listeners,
        })
    }
}

fn suppress_default(event: &Event) {
    if event.cancelable() {
        event.prevent_default();
    }
}

/// Run `callback` on the next display refresh. Dropping the handle cancels it.
pub fn next_frame<F>(callback: F) -> AnimationFrame
where
    F: FnOnce() + 'static,
{
    request_animation_frame(move |_timestamp| callback())
}
