// Emission domain model
use super::power::{PowerDistribution, PowerMix};
use chrono::NaiveDateTime;

/// Assumed intensity of the conventional share; renewables count as zero.
pub const CONVENTIONAL_G_PER_KWH: f64 = 800.0;

pub fn g_co2_per_kwh(distribution: &PowerDistribution) -> f64 {
    distribution.conventional * CONVENTIONAL_G_PER_KWH
}

/// One persisted estimation cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionRecord {
    pub timestamp: NaiveDateTime,
    pub onshore: f64,
    pub offshore: f64,
    pub solar: f64,
    pub conventional: f64,
    pub total: f64,
    pub g_co2_per_kwh: f64,
}

impl EmissionRecord {
    pub fn new(timestamp: NaiveDateTime, mix: &PowerMix, g_co2_per_kwh: f64) -> Self {
        Self {
            timestamp,
            onshore: mix.onshore,
            offshore: mix.offshore,
            solar: mix.solar,
            conventional: mix.conventional,
            total: mix.total,
            g_co2_per_kwh,
        }
    }
}

/// Latest records as parallel columns, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmissionSeries {
    pub time: Vec<NaiveDateTime>,
    pub onshore: Vec<f64>,
    pub offshore: Vec<f64>,
    pub solar: Vec<f64>,
    pub conventional: Vec<f64>,
    pub total: Vec<f64>,
    pub g_co2_per_kwh: Vec<f64>,
}

impl EmissionSeries {
    pub fn push(&mut self, record: &EmissionRecord) {
        self.time.push(record.timestamp);
        self.onshore.push(record.onshore);
        self.offshore.push(record.offshore);
        self.solar.push(record.solar);
        self.conventional.push(record.conventional);
        self.total.push(record.total);
        self.g_co2_per_kwh.push(record.g_co2_per_kwh);
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

impl FromIterator<EmissionRecord> for EmissionSeries {
    fn from_iter<I: IntoIterator<Item = EmissionRecord>>(iter: I) -> Self {
        let mut series = Self::default();
        for record in iter {
            series.push(&record);
        }
        series
    }
}
