use dioxus::prelude::*;

#[component]
pub fn MapToolbar(
    edit_mode: bool,
    legend_visible: bool,
    on_zoom_in: EventHandler<()>,
    on_zoom_out: EventHandler<()>,
    on_reset_view: EventHandler<()>,
    on_toggle_edit: EventHandler<()>,
    on_toggle_legend: EventHandler<()>,
    on_find: EventHandler<()>,
    on_exit: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "map-toolbar",
            button {
                class: "secondary",
                title: "Back",
                onclick: move |_| on_exit.call(()),
                "←"
            }
            div { class: "toolbar-group",
                button { title: "Zoom in", onclick: move |_| on_zoom_in.call(()), "+" }
                button { title: "Zoom out", onclick: move |_| on_zoom_out.call(()), "−" }
                button { title: "Reset view", onclick: move |_| on_reset_view.call(()), "Reset" }
            }
            div { class: "toolbar-group",
                button {
                    class: if edit_mode { "active" } else { "" },
                    onclick: move |_| on_toggle_edit.call(()),
                    if edit_mode { "Editing" } else { "Edit" }
                }
                button {
                    class: if legend_visible { "active" } else { "" },
                    onclick: move |_| on_toggle_legend.call(()),
                    "Legend"
                }
                button { onclick: move |_| on_find.call(()), "Find" }
            }
        }
    }
}
