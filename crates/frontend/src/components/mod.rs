pub mod find_location_modal;
pub mod legend;
pub mod location_layer;
pub mod location_modal;
pub mod map_toolbar;
pub mod map_view;
