// OpenWeatherMap weather source implementation
use crate::application::weather_source::{WeatherError, WeatherSource};
use crate::domain::weather::{Coordinate, WeatherObservation};
use crate::infrastructure::config::WeatherConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    wind: OpenWeatherWind,
    clouds: OpenWeatherClouds,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherClouds {
    all: f64,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig, api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Only `wind.speed` and `clouds.all` are read; anything else is ignored.
    fn parse_observation(coordinate: Coordinate, body: &str) -> Result<WeatherObservation, WeatherError> {
        let response: OpenWeatherResponse =
            serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(WeatherObservation::new(
            coordinate,
            response.wind.speed,
            response.clouds.all,
        )?)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch(&self, coordinate: Coordinate) -> Result<WeatherObservation, WeatherError> {
        tracing::debug!("Requesting weather at {}, {}", coordinate.lat, coordinate.lon);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", coordinate.lat.to_string()),
                ("lon", coordinate.lon.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Self::parse_observation(coordinate, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLDENBURG: Coordinate = Coordinate::new(53.14118, 8.21467);

    #[test]
    fn test_parse_full_payload() {
        let body = r#"{
            "coord": {"lat": 53.1667, "lon": 8.2},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "base": "stations",
            "main": {"temp": 280.24, "pressure": 1030, "humidity": 81},
            "visibility": 10000,
            "wind": {"speed": 7.08, "deg": 334, "gust": 12.68},
            "clouds": {"all": 53},
            "dt": 1642432315,
            "name": "Oldenburg",
            "cod": 200
        }"#;

        let obs = OpenWeatherClient::parse_observation(OLDENBURG, body).unwrap();
        assert_eq!(obs.wind_speed, 7.08);
        assert_eq!(obs.cloud_cover, 53.0);
        assert_eq!(obs.coordinate, OLDENBURG);
    }

    #[test]
    fn test_parse_missing_field() {
        let body = r#"{"wind": {"speed": 3.2}}"#;
        assert!(matches!(
            OpenWeatherClient::parse_observation(OLDENBURG, body),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_out_of_range() {
        let body = r#"{"wind": {"speed": -3.2}, "clouds": {"all": 10}}"#;
        assert!(matches!(
            OpenWeatherClient::parse_observation(OLDENBURG, body),
            Err(WeatherError::Invalid(_))
        ));
    }

    #[test]
    fn test_new_trims_base_url() {
        let config = WeatherConfig {
            base_url: "http://localhost:9000/weather/".to_string(),
            ..WeatherConfig::default()
        };
        let client = OpenWeatherClient::new(&config, "key".to_string()).unwrap();
        assert_eq!(client.base_url, "http://localhost:9000/weather");
    }
}
