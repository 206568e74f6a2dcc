use atlas_shared::history::{connected_locations, region_name, sub_locations, LocationHistory};
use atlas_shared::models::{Location, Region};
use dioxus::prelude::*;

/// Breadcrumb text for the selection path, e.g. "Town › Inn › Cellar".
fn breadcrumb(entries: &[&Location]) -> String {
    entries
        .iter()
        .map(|l| l.name.as_str())
        .collect::<Vec<_>>()
        .join(" › ")
}

#[component]
pub fn LocationModal(
    mut history: Signal<LocationHistory>,
    locations: ReadSignal<Vec<Location>>,
    regions: ReadSignal<Vec<Region>>,
) -> Element {
    let all = locations.read();
    // A selection the owner has since removed reads as absent.
    let Some(current) = history.read().current(&all).cloned() else {
        return rsx! {};
    };

    let region = region_name(&regions.read(), &current).to_string();
    let children: Vec<Location> = sub_locations(&all, &current.id)
        .into_iter()
        .cloned()
        .collect();
    let connections: Vec<String> = connected_locations(&all, &current)
        .into_iter()
        .map(|l| l.name.clone())
        .collect();
    let can_go_back = history.read().can_go_back();
    let path = breadcrumb(&history.read().path(&all));

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| history.write().close(),

            div {
                class: "location-modal",
                tabindex: "-1",
                onmounted: move |evt: Event<MountedData>| async move {
                    let _ = evt.set_focus(true).await;
                },
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                onkeydown: move |evt: Event<KeyboardData>| {
                    if evt.key() == Key::Escape {
                        history.write().close();
                    }
                },

                div { class: "modal-header",
                    if can_go_back {
                        button {
                            class: "secondary",
                            onclick: move |_| {
                                history.write().back();
                            },
                            "Back"
                        }
                    }
                    h2 { "{current.name}" }
                    button {
                        class: "secondary",
                        onclick: move |_| history.write().close(),
                        "Close"
                    }
                }

                if can_go_back {
                    div { class: "breadcrumb", "{path}" }
                }
                if !region.is_empty() {
                    div { class: "location-region", "{region}" }
                }
                if !current.description.is_empty() {
                    p { class: "location-description", "{current.description}" }
                }

                if !connections.is_empty() {
                    div { class: "location-section",
                        h3 { "Connections" }
                        ul {
                            for name in connections {
                                li { "{name}" }
                            }
                        }
                    }
                }

                if !children.is_empty() {
                    div { class: "location-section",
                        h3 { "Places here" }
                        for child in children {
                            button {
                                key: "{child.id}",
                                class: "sub-location",
                                onclick: {
                                    let id = child.id.clone();
                                    move |_| history.write().select_sub(id.clone())
                                },
                                "{child.name}"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Location {
        Location {
            id: name.to_lowercase(),
            name: name.to_string(),
            description: String::new(),
            map_x: 0.0,
            map_y: 0.0,
            region_id: None,
            parent_location_id: None,
            connections: Vec::new(),
        }
    }

    #[test]
    fn test_breadcrumb_joins_names() {
        let entries = [named("Town"), named("Inn"), named("Cellar")];
        let refs: Vec<&Location> = entries.iter().collect();
        assert_eq!(breadcrumb(&refs), "Town › Inn › Cellar");
    }

    #[test]
    fn test_breadcrumb_single() {
        assert_eq!(breadcrumb(&[&named("Town")]), "Town");
    }
}
