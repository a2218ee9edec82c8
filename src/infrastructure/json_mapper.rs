// Mapper to convert domain models to JSON response bodies
use crate::application::history_service::PlotData;
use crate::application::polling_service::PollingControl;
use crate::domain::snapshot::Snapshot;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SnapshotJson {
    pub timestamp: String,
    pub precise: bool,
    pub weather: WeatherJson,
    pub mix: SourcesJson,
    pub distribution: SourcesJson,
    pub g_co2_per_kwh: f64,
    pub indicator: f64,
}

#[derive(Debug, Serialize)]
pub struct WeatherJson {
    pub wind_onshore: f64,
    pub wind_offshore: f64,
    pub cloudiness: f64,
}

#[derive(Debug, Serialize)]
pub struct SourcesJson {
    pub onshore: f64,
    pub offshore: f64,
    pub solar: f64,
    pub conventional: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PlotJson {
    pub labels: [&'static str; 4],
    pub time: Vec<f64>,
    pub distribution: [Vec<f64>; 4],
    pub total: Vec<f64>,
    pub gpkwh: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct ControlJson {
    pub running: bool,
    pub interval_minutes: u64,
}

pub fn snapshot_to_json(snapshot: &Snapshot) -> SnapshotJson {
    SnapshotJson {
        timestamp: snapshot.timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        precise: snapshot.precise,
        weather: WeatherJson {
            wind_onshore: snapshot.weather.wind_onshore,
            wind_offshore: snapshot.weather.wind_offshore,
            cloudiness: snapshot.weather.cloudiness,
        },
        mix: SourcesJson {
            onshore: snapshot.mix.onshore,
            offshore: snapshot.mix.offshore,
            solar: snapshot.mix.solar,
            conventional: snapshot.mix.conventional,
            total: Some(snapshot.mix.total),
        },
        distribution: SourcesJson {
            onshore: snapshot.distribution.onshore,
            offshore: snapshot.distribution.offshore,
            solar: snapshot.distribution.solar,
            conventional: snapshot.distribution.conventional,
            total: None,
        },
        g_co2_per_kwh: snapshot.g_co2_per_kwh,
        indicator: snapshot.indicator.value(),
    }
}

pub fn plot_to_json(plot: PlotData) -> PlotJson {
    PlotJson {
        labels: PlotData::DISTRIBUTION_LABELS,
        time: plot.time,
        distribution: plot.distribution,
        total: plot.total,
        gpkwh: plot.g_co2_per_kwh,
    }
}

pub fn control_to_json(control: PollingControl) -> ControlJson {
    ControlJson {
        running: control.running,
        interval_minutes: control.interval_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_to_json_shape() {
        let plot = PlotData {
            time: vec![1642428000.0],
            distribution: [vec![4.0], vec![20.0], vec![1.0], vec![35.0]],
            total: vec![60.0],
            g_co2_per_kwh: vec![466.67],
        };

        let value = serde_json::to_value(plot_to_json(plot)).unwrap();
        assert_eq!(value["labels"][0], "offshore");
        assert_eq!(value["distribution"][3][0], 35.0);
        assert_eq!(value["gpkwh"][0], 466.67);
    }

    #[test]
    fn test_control_to_json() {
        let value = serde_json::to_value(control_to_json(PollingControl {
            running: true,
            interval_minutes: 5,
        }))
        .unwrap();
        assert_eq!(value, serde_json::json!({"running": true, "interval_minutes": 5}));
    }
}
