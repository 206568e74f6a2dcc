mod api;
mod components;
mod coords;
mod listeners;
mod pages;

use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/map")]
    WorldMap {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::home::HomePage {}
    }
}

#[component]
fn WorldMap() -> Element {
    rsx! {
        pages::world_map::WorldMapPage {}
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    dioxus::logger::initialize_default();
    launch(App);
}
