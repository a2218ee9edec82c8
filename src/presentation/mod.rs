// Presentation layer - HTTP surface for the estimation pipeline
pub mod app_state;
pub mod handlers;
