// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_store;
pub mod json_mapper;
pub mod log_light;
pub mod openweather_client;
