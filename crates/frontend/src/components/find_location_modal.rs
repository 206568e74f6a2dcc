use atlas_shared::models::{FindLocationRequest, Region};
use dioxus::prelude::*;

#[component]
pub fn FindLocationModal(
    mut open: Signal<bool>,
    regions: ReadSignal<Vec<Region>>,
    on_submit: EventHandler<FindLocationRequest>,
) -> Element {
    let mut name = use_signal(String::new);
    let mut region = use_signal(String::new);

    if !*open.read() {
        return rsx! {};
    }

    let mut cancel = move || {
        name.set(String::new());
        region.set(String::new());
        open.set(false);
    };
    let regions = regions.read().clone();

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| cancel(),

            form {
                class: "find-modal",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                onsubmit: move |evt: Event<FormData>| {
                    evt.prevent_default();
                    let Some(req) = FindLocationRequest::from_form(&name.read(), &region.read()) else {
                        return;
                    };
                    name.set(String::new());
                    region.set(String::new());
                    on_submit.call(req);
                },

                h2 { "Find location" }
                input {
                    r#type: "text",
                    placeholder: "Location name...",
                    value: "{name}",
                    oninput: move |evt: Event<FormData>| name.set(evt.value()),
                }
                select {
                    value: "{region}",
                    onchange: move |evt: Event<FormData>| region.set(evt.value()),
                    option { value: "", "Any region" }
                    for r in &regions {
                        option {
                            value: "{r.id}",
                            selected: *region.read() == r.id,
                            "{r.name}"
                        }
                    }
                }
                div { class: "modal-actions",
                    button { r#type: "submit", "Search" }
                    button {
                        r#type: "button",
                        class: "secondary",
                        onclick: move |_| cancel(),
                        "Cancel"
                    }
                }
            }
        }
    }
}
