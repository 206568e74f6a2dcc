use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use atlas_shared::models::{FindLocationRequest, Location, LocationId, Region};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use tracing::{info, warn};

use crate::api;
use crate::components::map_view::MapView;

/// Quiet period after the last drag frame before a location's coordinates are
/// sent to the server.
const PERSIST_DELAY_MS: u32 = 400;

/// Apply a coordinate update to the local copy. Returns `false` when the id is
/// no longer known.
fn apply_coordinates(locations: &mut [Location], id: &str, x: f64, y: f64) -> bool {
    match locations.iter_mut().find(|l| l.id == id) {
        Some(loc) => {
            loc.map_x = x;
            loc.map_y = y;
            true
        }
        None => false,
    }
}

/// Debounce bookkeeping for coordinate writes. Each edit gets a generation;
/// only the newest one per location is sent, and settling removes the entry.
#[derive(Debug, Default)]
struct PendingWrites {
    latest: HashMap<LocationId, u64>,
    next_generation: u64,
}

impl PendingWrites {
    fn schedule(&mut self, id: &str) -> u64 {
        self.next_generation += 1;
        self.latest.insert(id.to_string(), self.next_generation);
        self.next_generation
    }

    /// Called when a quiet period elapses. Returns `true` if `generation` is
    /// still the newest edit for `id`, in which case the entry is cleared.
    fn settle(&mut self, id: &str, generation: u64) -> bool {
        if self.latest.get(id) != Some(&generation) {
            return false;
        }
        self.latest.remove(id);
        true
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.latest.len()
    }
}

fn find_status_message(result: &Result<Option<Location>, String>) -> String {
    match result {
        Ok(Some(loc)) => format!("Found {}", loc.name),
        Ok(None) => "No matching location".to_string(),
        Err(e) => format!("Search failed: {}", e),
    }
}

#[component]
pub fn WorldMapPage() -> Element {
    let mut locations = use_signal(Vec::<Location>::new);
    let mut regions = use_signal(Vec::<Region>::new);
    let mut current_location_id = use_signal(|| None::<LocationId>);
    let mut load_error = use_signal(|| None::<String>);
    let mut find_status = use_signal(|| None::<String>);

    let pending_writes = use_hook(|| Rc::new(RefCell::new(PendingWrites::default())));

    let _loader = use_resource(move || async move {
        match api::fetch_locations().await {
            Ok(found) => {
                info!(count = found.len(), "loaded discovered locations");
                locations.set(found);
            }
            Err(e) => {
                warn!(error = %e, "failed to load locations");
                load_error.set(Some(e));
            }
        }
        match api::fetch_regions().await {
            Ok(found) => regions.set(found),
            Err(e) => warn!(error = %e, "failed to load regions"),
        }
        match api::fetch_current_location_id().await {
            Ok(id) => current_location_id.set(id),
            Err(e) => warn!(error = %e, "failed to load current location"),
        }
    });

    let on_update_coordinates = move |(id, x, y): (LocationId, f64, f64)| {
        if !apply_coordinates(&mut locations.write(), &id, x, y) {
            return;
        }
        let generation = pending_writes.borrow_mut().schedule(&id);
        let pending = pending_writes.clone();
        // Not tied to the component scope: leaving the page must not drop a waiting write.
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(PERSIST_DELAY_MS).await;
            if pending.borrow_mut().settle(&id, generation) {
                api::update_location_coordinates_fire(id, x, y);
            }
        });
    };

    let on_find_location = move |req: FindLocationRequest| {
        find_status.set(None);
        spawn(async move {
            let result = api::find_location(&req).await;
            if let Err(e) = &result {
                warn!(error = %e, name = %req.name, "find location failed");
            }
            find_status.set(Some(find_status_message(&result)));
        });
    };

    rsx! {
        div { class: "app",
            if let Some(err) = &*load_error.read() {
                div { class: "banner error", "Could not load locations: {err}" }
            }
            if let Some(status) = &*find_status.read() {
                div {
                    class: "banner",
                    onclick: move |_| find_status.set(None),
                    "{status}"
                }
            }
            MapView {
                locations: locations,
                regions: regions,
                current_location_id: current_location_id.read().clone(),
                on_update_coordinates: on_update_coordinates,
                on_find_location: on_find_location,
                on_exit: move |_| navigator().go_back(),
            }
        }
    }
}
