use atlas_shared::gesture::InputKind;
use atlas_shared::models::{find_location, Location, LocationId};
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;

const NODE_RADIUS: f64 = 9.0;
const LABEL_OFFSET: f64 = 16.0;

/// Pointer/touch press on a node, forwarded to the viewport's gesture controller.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGestureStart {
    pub location_id: LocationId,
    pub x: f64,
    pub y: f64,
    pub input: InputKind,
}

/// Line segments for every connection between two known top-level locations.
/// Each undirected pair is drawn once.
fn connection_segments(locations: &[Location]) -> Vec<(f64, f64, f64, f64)> {
    let mut segments = Vec::new();
    for loc in locations.iter().filter(|l| l.parent_location_id.is_none()) {
        for other_id in &loc.connections {
            let Some(other) = find_location(locations, other_id) else {
                continue;
            };
            if other.parent_location_id.is_some() {
                continue;
            }
            // Draw from the lexically smaller id; skip the reverse edge if it exists
            let reverse_listed = other.connections.iter().any(|c| *c == loc.id);
            if reverse_listed && other.id < loc.id {
                continue;
            }
            segments.push((loc.map_x, loc.map_y, other.map_x, other.map_y));
        }
    }
    segments
}

fn node_class(id: &str, current: Option<&str>, selected: Option<&str>, edit_mode: bool) -> String {
    let mut class = String::from("map-node");
    if current == Some(id) {
        class.push_str(" current");
    }
    if selected == Some(id) {
        class.push_str(" selected");
    }
    if edit_mode {
        class.push_str(" editable");
    }
    class
}

/// Minimal renderer for discovered locations. Only top-level locations appear
/// on the map; nested ones are reached through the drill-down modal.
#[component]
pub fn LocationLayer(
    locations: ReadSignal<Vec<Location>>,
    edit_mode: bool,
    current_location_id: Option<LocationId>,
    selected_location_id: Option<LocationId>,
    on_node_gesture_start: EventHandler<NodeGestureStart>,
    on_node_click: EventHandler<LocationId>,
) -> Element {
    let locations = locations.read();
    let segments = connection_segments(&locations);
    let current = current_location_id.as_deref();
    let selected = selected_location_id.as_deref();

    rsx! {
        g { class: "map-connections",
            for (i, (x1, y1, x2, y2)) in segments.into_iter().enumerate() {
                line {
                    key: "{i}",
                    x1: "{x1}",
                    y1: "{y1}",
                    x2: "{x2}",
                    y2: "{y2}",
                }
            }
        }
        g { class: "map-nodes",
            {locations.iter().filter(|l| l.parent_location_id.is_none()).map(|loc| {
                let class = node_class(&loc.id, current, selected, edit_mode);
                let mouse_id = loc.id.clone();
                let touch_id = loc.id.clone();
                let click_id = loc.id.clone();
                let label_y = loc.map_y - LABEL_OFFSET;
                rsx! {
                    g {
                        key: "{loc.id}",
                        class: "{class}",

                        onmousedown: move |evt: Event<MouseData>| {
                            if !edit_mode || evt.trigger_button() != Some(MouseButton::Primary) {
                                return;
                            }
                            // Keep the background from also starting a pan
                            evt.stop_propagation();
                            let client = evt.client_coordinates();
                            on_node_gesture_start.call(NodeGestureStart {
                                location_id: mouse_id.clone(),
                                x: client.x,
                                y: client.y,
                                input: InputKind::Mouse,
                            });
                        },

                        ontouchstart: move |evt: Event<TouchData>| {
                            if !edit_mode {
                                return;
                            }
                            let touches = evt.data().touches();
                            let Some(t) = touches.first() else { return };
                            evt.stop_propagation();
                            let client = t.client_coordinates();
                            on_node_gesture_start.call(NodeGestureStart {
                                location_id: touch_id.clone(),
                                x: client.x,
                                y: client.y,
                                input: InputKind::Touch,
                            });
                        },

                        onclick: move |_| on_node_click.call(click_id.clone()),

                        circle { cx: "{loc.map_x}", cy: "{loc.map_y}", r: "{NODE_RADIUS}" }
                        text {
                            x: "{loc.map_x}",
                            y: "{label_y}",
                            text_anchor: "middle",
                            "{loc.name}"
                        }
                    }
                }
            })}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: &str, x: f64, y: f64, connections: &[&str], parent: Option<&str>) -> Location {
        Location {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            map_x: x,
            map_y: y,
            region_id: None,
            parent_location_id: parent.map(str::to_string),
            connections: connections.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_connection_segments_dedupes_mutual_links() {
        let locations = vec![
            loc("a", 0.0, 0.0, &["b"], None),
            loc("b", 10.0, 0.0, &["a"], None),
        ];
        let segments = connection_segments(&locations);
        assert_eq!(segments, vec![(0.0, 0.0, 10.0, 0.0)]);
    }

    #[test]
    fn test_connection_segments_one_way_link() {
        let locations = vec![
            loc("a", 0.0, 0.0, &[], None),
            loc("b", 10.0, 5.0, &["a"], None),
        ];
        assert_eq!(connection_segments(&locations), vec![(10.0, 5.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_connection_segments_skip_unknown_and_nested() {
        let locations = vec![
            loc("a", 0.0, 0.0, &["ghost", "cellar"], None),
            loc("cellar", 1.0, 1.0, &["a"], Some("a")),
        ];
        assert!(connection_segments(&locations).is_empty());
    }

    #[test]
    fn test_node_class_flags() {
        assert_eq!(node_class("a", None, None, false), "map-node");
        assert_eq!(
            node_class("a", Some("a"), Some("a"), true),
            "map-node current selected editable"
        );
        assert_eq!(node_class("a", Some("b"), None, false), "map-node");
    }
}
