pub mod home;
pub mod world_map;
