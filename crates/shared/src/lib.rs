pub mod gesture;
pub mod history;
pub mod mapper;
pub mod models;
pub mod viewport;
