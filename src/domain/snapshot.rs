// Immutable result of one estimation cycle, handed to every consumer
use super::emission::EmissionRecord;
use super::indicator::IndicatorValue;
use super::power::{PowerDistribution, PowerMix};
use chrono::NaiveDateTime;

/// Weather figures the mix was estimated from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherInputs {
    /// m/s, single site or weighted park average in precise mode
    pub wind_onshore: f64,
    pub wind_offshore: f64,
    /// percent
    pub cloudiness: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: NaiveDateTime,
    pub weather: WeatherInputs,
    pub mix: PowerMix,
    pub distribution: PowerDistribution,
    pub g_co2_per_kwh: f64,
    pub indicator: IndicatorValue,
    pub precise: bool,
}

impl Snapshot {
    pub fn to_record(&self) -> EmissionRecord {
        EmissionRecord::new(self.timestamp, &self.mix, self.g_co2_per_kwh)
    }
}
