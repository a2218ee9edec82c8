// Weather observation domain model
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ObservationError {
    #[error("wind speed must be a non-negative number, got {0}")]
    WindSpeed(f64),
    #[error("cloud cover must be within 0-100 %, got {0}")]
    CloudCover(f64),
}

/// Wind speed in m/s and cloud cover in percent at one coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherObservation {
    pub coordinate: Coordinate,
    pub wind_speed: f64,
    pub cloud_cover: f64,
}

impl WeatherObservation {
    pub fn new(
        coordinate: Coordinate,
        wind_speed: f64,
        cloud_cover: f64,
    ) -> Result<Self, ObservationError> {
        if !wind_speed.is_finite() || wind_speed < 0.0 {
            return Err(ObservationError::WindSpeed(wind_speed));
        }
        if !(0.0..=100.0).contains(&cloud_cover) {
            return Err(ObservationError::CloudCover(cloud_cover));
        }

        Ok(Self {
            coordinate,
            wind_speed,
            cloud_cover,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLDENBURG: Coordinate = Coordinate::new(53.14118, 8.21467);

    #[test]
    fn test_valid_observation() {
        let obs = WeatherObservation::new(OLDENBURG, 7.08, 53.0).unwrap();
        assert_eq!(obs.wind_speed, 7.08);
        assert_eq!(obs.cloud_cover, 53.0);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert_eq!(
            WeatherObservation::new(OLDENBURG, -1.0, 10.0),
            Err(ObservationError::WindSpeed(-1.0))
        );
        assert_eq!(
            WeatherObservation::new(OLDENBURG, 1.0, 101.0),
            Err(ObservationError::CloudCover(101.0))
        );
        assert!(WeatherObservation::new(OLDENBURG, f64::NAN, 10.0).is_err());
    }
}
