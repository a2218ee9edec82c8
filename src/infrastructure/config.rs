use crate::application::polling_service::validate_interval;
use crate::domain::power::{DEFAULT_DEMAND_AVERAGE, DEFAULT_DEMAND_DEVIATION, DemandParams};
use crate::domain::weather::Coordinate;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/co2-ampel";
const ENV_PREFIX: &str = "CO2_AMPEL";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub weather: WeatherConfig,
    pub sites: SitesConfig,
    pub estimation: EstimationConfig,
    pub store: StoreConfig,
    pub polling: PollingConfig,
    pub indicator: IndicatorConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_key_file: PathBuf,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: None,
            api_key_file: PathBuf::from("KEY.txt"),
            timeout_secs: 10,
        }
    }
}

impl WeatherConfig {
    /// Inline key wins; otherwise the key file is read once.
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        if let Some(key) = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        let key = std::fs::read_to_string(&self.api_key_file).with_context(|| {
            format!("Failed to read weather API key from {}", self.api_key_file.display())
        })?;
        let key = key.trim_end().to_string();
        if key.is_empty() {
            anyhow::bail!("Weather API key file {} is empty", self.api_key_file.display());
        }
        Ok(key)
    }
}

/// Representative coordinates, one per source.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SitesConfig {
    /// Holtriem onshore windpark
    pub onshore: Coordinate,
    /// BorWin Alpha offshore windpark
    pub offshore: Coordinate,
    /// Oldenburg
    pub solar: Coordinate,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            onshore: Coordinate::new(53.610278, 7.429167),
            offshore: Coordinate::new(54.3548547, 6.02508583),
            solar: Coordinate::new(53.14118, 8.21467),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EstimationConfig {
    pub demand_average: f64,
    pub demand_deviation: f64,
    /// Average wind over every known windpark, one request per park
    pub precise: bool,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            demand_average: DEFAULT_DEMAND_AVERAGE,
            demand_deviation: DEFAULT_DEMAND_DEVIATION,
            precise: false,
        }
    }
}

impl EstimationConfig {
    pub fn demand(&self) -> DemandParams {
        DemandParams {
            average: self.demand_average,
            deviation: self.demand_deviation,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/data.csv"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_minutes: u64,
    pub autostart: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 1,
            autostart: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Emission mapped to full green
    pub low_g_per_kwh: f64,
    /// Emission mapped to full red
    pub high_g_per_kwh: f64,
    pub pin_red: u8,
    pub pin_green: u8,
    pub pin_blue: u8,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            low_g_per_kwh: 200.0,
            high_g_per_kwh: 720.0,
            pin_red: 17,
            pin_green: 22,
            pin_blue: 24,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Load the optional config file, then `CO2_AMPEL__SECTION__KEY` overrides.
pub fn load_app_config(path: impl AsRef<Path>) -> anyhow::Result<AppConfig> {
    let path = path.as_ref().to_string_lossy().into_owned();
    let settings = config::Config::builder()
        .add_source(config::File::with_name(&path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    validate_interval(config.polling.interval_minutes).context("invalid polling.interval_minutes")?;
    if config.indicator.low_g_per_kwh == config.indicator.high_g_per_kwh {
        anyhow::bail!("indicator.low_g_per_kwh and indicator.high_g_per_kwh must differ");
    }
    Ok(config)
}
