use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn HomePage() -> Element {
    rsx! {
        div { class: "home",
            h1 { "Atlas" }
            p { "Browse the locations you have discovered so far." }
            Link { class: "button", to: Route::WorldMap {}, "Open map" }
        }
    }
}
