// Weather source trait for fetching current observations
use crate::domain::weather::{Coordinate, ObservationError, WeatherObservation};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Network(String),
    #[error("weather API answered with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not parse weather response: {0}")]
    Parse(String),
    #[error("weather response out of range: {0}")]
    Invalid(#[from] ObservationError),
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch the current observation at a coordinate.
    /// Failures are per-cycle; the caller skips the cycle and retries next tick.
    async fn fetch(&self, coordinate: Coordinate) -> Result<WeatherObservation, WeatherError>;
}
