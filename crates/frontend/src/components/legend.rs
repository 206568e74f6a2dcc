use dioxus::prelude::*;

#[component]
pub fn Legend(on_close: EventHandler<()>) -> Element {
    rsx! {
        div {
            class: "legend-panel",
            onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

            div { class: "modal-header",
                h3 { "Legend" }
                button { class: "secondary", onclick: move |_| on_close.call(()), "×" }
            }

            div { class: "legend-section",
                div { class: "legend-row",
                    span { class: "legend-swatch current" }
                    span { "You are here" }
                }
                div { class: "legend-row",
                    span { class: "legend-swatch selected" }
                    span { "Selected location" }
                }
                div { class: "legend-row",
                    span { class: "legend-swatch" }
                    span { "Discovered location" }
                }
                div { class: "legend-row",
                    span { class: "legend-line" }
                    span { "Known route" }
                }
            }

            div { class: "legend-section",
                h3 { "Controls" }
                div { class: "shortcut-row",
                    span { class: "shortcut-keys", "Drag" }
                    span { "Pan the map" }
                }
                div { class: "shortcut-row",
                    span { class: "shortcut-keys", "Wheel" }
                    span { "Zoom at cursor" }
                }
                div { class: "shortcut-row",
                    span { class: "shortcut-keys", "Double-click" }
                    span { "Reset view" }
                }
                div { class: "shortcut-row",
                    span { class: "shortcut-keys", "Edit + drag" }
                    span { "Move a location" }
                }
                div { class: "shortcut-row",
                    span { class: "shortcut-keys", kbd { "Esc" } }
                    span { "Close location details" }
                }
            }
        }
    }
}
