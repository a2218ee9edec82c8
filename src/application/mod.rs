// Application layer - Use cases and the ports they depend on
pub mod emission_repository;
pub mod estimation_service;
pub mod history_service;
pub mod indicator_light;
pub mod indicator_service;
pub mod polling_service;
pub mod weather_source;
