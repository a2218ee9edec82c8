// Estimation service - Use case for one weather to emission cycle
use crate::application::emission_repository::EmissionRepository;
use crate::application::weather_source::WeatherSource;
use crate::domain::emission::g_co2_per_kwh;
use crate::domain::indicator::indicator_value_for;
use crate::domain::power::{
    PowerMix, estimate_demand, estimate_distribution, estimate_power_at, estimate_solar_power,
};
use crate::domain::snapshot::{Snapshot, WeatherInputs};
use crate::domain::weather::Coordinate;
use crate::domain::windparks::{
    OFFSHORE_WINDPARKS, ONSHORE_WINDPARKS, WindPark, estimate_offshore_wind_power_precise,
    estimate_onshore_wind_power_precise, weighted_average_wind_speed,
};
use crate::infrastructure::config::{EstimationConfig, IndicatorConfig, SitesConfig};
use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

#[derive(Clone)]
pub struct EstimationService {
    weather: Arc<dyn WeatherSource>,
    repository: Arc<dyn EmissionRepository>,
    sites: SitesConfig,
    estimation: EstimationConfig,
    indicator: IndicatorConfig,
}

impl EstimationService {
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        repository: Arc<dyn EmissionRepository>,
        sites: SitesConfig,
        estimation: EstimationConfig,
        indicator: IndicatorConfig,
    ) -> Self {
        Self {
            weather,
            repository,
            sites,
            estimation,
            indicator,
        }
    }

    pub async fn run_cycle(&self) -> anyhow::Result<Snapshot> {
        self.run_cycle_at(Local::now().naive_local()).await
    }

    /// Fetch, estimate and persist. The record is appended only after every
    /// stage succeeded, so a failed cycle leaves the store untouched.
    pub async fn run_cycle_at(&self, now: NaiveDateTime) -> anyhow::Result<Snapshot> {
        let precise = self.estimation.precise;
        let demand = self.estimation.demand();

        let (weather, mix) = if precise {
            let (wind_onshore, wind_offshore) = self.precise_wind().await?;
            let cloudiness = self.cloudiness().await?;
            let total = estimate_demand(now.time(), demand.average, demand.deviation);
            let mix = PowerMix::from_sources(
                estimate_onshore_wind_power_precise(wind_onshore),
                estimate_offshore_wind_power_precise(wind_offshore),
                estimate_solar_power(now, cloudiness),
                total,
            );
            (
                WeatherInputs {
                    wind_onshore,
                    wind_offshore,
                    cloudiness,
                },
                mix,
            )
        } else {
            let wind_onshore = self.wind_speed(self.sites.onshore, "onshore").await?;
            let wind_offshore = self.wind_speed(self.sites.offshore, "offshore").await?;
            let cloudiness = self.cloudiness().await?;
            let mix = estimate_power_at(now, wind_onshore, wind_offshore, cloudiness, demand);
            (
                WeatherInputs {
                    wind_onshore,
                    wind_offshore,
                    cloudiness,
                },
                mix,
            )
        };

        let distribution = estimate_distribution(&mix)?;
        let g_co2 = g_co2_per_kwh(&distribution);
        let indicator = indicator_value_for(
            g_co2,
            self.indicator.low_g_per_kwh,
            self.indicator.high_g_per_kwh,
        )?;

        let snapshot = Snapshot {
            timestamp: now,
            weather,
            mix,
            distribution,
            g_co2_per_kwh: g_co2,
            indicator,
            precise,
        };

        self.repository
            .append(&snapshot.to_record())
            .await
            .context("Failed to append emission record")?;

        tracing::info!(
            "Estimated mix: onshore={:.2} GW offshore={:.2} GW solar={:.2} GW conventional={:.2} GW total={:.2} GW -> {:.1} gCO2/kWh",
            mix.onshore,
            mix.offshore,
            mix.solar,
            mix.conventional,
            mix.total,
            g_co2
        );

        Ok(snapshot)
    }

    async fn wind_speed(&self, site: Coordinate, label: &str) -> anyhow::Result<f64> {
        let observation = self
            .weather
            .fetch(site)
            .await
            .with_context(|| format!("Failed to fetch {} wind", label))?;
        Ok(observation.wind_speed)
    }

    async fn cloudiness(&self) -> anyhow::Result<f64> {
        let observation = self
            .weather
            .fetch(self.sites.solar)
            .await
            .context("Failed to fetch cloud cover")?;
        Ok(observation.cloud_cover)
    }

    /// Weighted park averages for onshore and offshore wind, in m/s.
    async fn precise_wind(&self) -> anyhow::Result<(f64, f64)> {
        tracing::debug!(
            "Precise mode: requesting {} windparks",
            ONSHORE_WINDPARKS.len() + OFFSHORE_WINDPARKS.len()
        );
        let onshore = self.average_wind_speed(&ONSHORE_WINDPARKS).await?;
        let offshore = self.average_wind_speed(&OFFSHORE_WINDPARKS).await?;
        Ok((onshore, offshore))
    }

    async fn average_wind_speed(&self, parks: &[WindPark]) -> anyhow::Result<f64> {
        let mut samples = Vec::with_capacity(parks.len());
        for park in parks {
            let observation = self.weather.fetch(park.coordinate).await.with_context(|| {
                format!(
                    "Failed to fetch wind at windpark {}, {}",
                    park.coordinate.lat, park.coordinate.lon
                )
            })?;
            samples.push((*park, observation.wind_speed));
        }
        Ok(weighted_average_wind_speed(&samples)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::emission_repository::StoreError;
    use crate::application::weather_source::WeatherError;
    use crate::domain::emission::{EmissionRecord, EmissionSeries};
    use crate::domain::weather::WeatherObservation;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Same observation everywhere, optionally failing at one coordinate.
    pub(crate) struct FakeWeather {
        pub wind_speed: f64,
        pub cloud_cover: f64,
        pub fail_at: Option<Coordinate>,
        pub calls: AtomicUsize,
    }

    impl FakeWeather {
        pub(crate) fn new(wind_speed: f64, cloud_cover: f64) -> Self {
            Self {
                wind_speed,
                cloud_cover,
                fail_at: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WeatherSource for FakeWeather {
        async fn fetch(&self, coordinate: Coordinate) -> Result<WeatherObservation, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == Some(coordinate) {
                return Err(WeatherError::Network("connection refused".to_string()));
            }
            Ok(WeatherObservation::new(coordinate, self.wind_speed, self.cloud_cover)?)
        }
    }

    #[derive(Default)]
    pub(crate) struct MemoryRepository {
        pub records: Mutex<Vec<EmissionRecord>>,
    }

    #[async_trait]
    impl EmissionRepository for MemoryRepository {
        async fn append(&self, record: &EmissionRecord) -> Result<(), StoreError> {
            self.records.lock().unwrap().push(*record);
            Ok(())
        }

        async fn read_latest(&self, n: usize) -> Result<EmissionSeries, StoreError> {
            let records = self.records.lock().unwrap();
            let start = records.len().saturating_sub(n);
            Ok(records[start..].iter().copied().collect())
        }

        async fn archive(&self) -> Result<PathBuf, StoreError> {
            self.records.lock().unwrap().clear();
            Ok(PathBuf::from("memory.bak"))
        }
    }

    fn midnight() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, 17)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn service(
        weather: Arc<FakeWeather>,
        repository: Arc<MemoryRepository>,
        estimation: EstimationConfig,
    ) -> EstimationService {
        EstimationService::new(
            weather,
            repository,
            SitesConfig::default(),
            estimation,
            IndicatorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_cycle_appends_record() {
        let weather = Arc::new(FakeWeather::new(10.0, 50.0));
        let repository = Arc::new(MemoryRepository::default());
        let service = service(weather.clone(), repository.clone(), EstimationConfig::default());

        let snapshot = service.run_cycle_at(midnight()).await.unwrap();

        // onshore 31 GW, offshore from the upper segment, no sun at midnight
        assert!((snapshot.mix.total - 50.0).abs() < 1e-9);
        assert!((snapshot.mix.onshore - 31.0).abs() < 1e-9);
        assert_eq!(snapshot.mix.solar, 0.0);
        assert!((snapshot.distribution.sum() - 1.0).abs() < 1e-9);
        assert!((snapshot.g_co2_per_kwh - snapshot.distribution.conventional * 800.0).abs() < 1e-9);
        assert_eq!(snapshot.weather.cloudiness, 50.0);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 3);

        let records = repository.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], snapshot.to_record());
    }

    #[tokio::test]
    async fn test_failed_fetch_appends_nothing() {
        let mut fake = FakeWeather::new(8.0, 20.0);
        fake.fail_at = Some(SitesConfig::default().solar);
        let repository = Arc::new(MemoryRepository::default());
        let service = service(Arc::new(fake), repository.clone(), EstimationConfig::default());

        assert!(service.run_cycle_at(midnight()).await.is_err());
        assert!(repository.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_demand_appends_nothing() {
        let repository = Arc::new(MemoryRepository::default());
        let estimation = EstimationConfig {
            demand_average: 0.0,
            demand_deviation: 0.0,
            precise: false,
        };
        let service = service(Arc::new(FakeWeather::new(8.0, 20.0)), repository.clone(), estimation);

        assert!(service.run_cycle_at(midnight()).await.is_err());
        assert!(repository.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_precise_mode_queries_every_windpark() {
        let weather = Arc::new(FakeWeather::new(6.0, 0.0));
        let repository = Arc::new(MemoryRepository::default());
        let estimation = EstimationConfig {
            precise: true,
            ..EstimationConfig::default()
        };
        let service = service(weather.clone(), repository, estimation);

        let snapshot = service.run_cycle_at(midnight()).await.unwrap();

        assert_eq!(weather.calls.load(Ordering::SeqCst), 74 + 27 + 1);
        assert!(snapshot.precise);
        // Uniform wind: the weighted average equals the plain speed
        assert!((snapshot.weather.wind_onshore - 6.0).abs() < 1e-9);
        assert!((snapshot.mix.onshore - estimate_onshore_wind_power_precise(6.0)).abs() < 1e-9);
    }
}
