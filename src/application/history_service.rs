// History service - Use case for plot-ready emission history
use crate::application::emission_repository::EmissionRepository;
use crate::domain::emission::EmissionSeries;
use chrono::{Local, NaiveDateTime, TimeZone};
use std::sync::Arc;

pub const DEFAULT_HISTORY_POINTS: usize = 10;

/// Stacked-area layout: the four sources stacked, total and emission on top.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    /// Unix seconds
    pub time: Vec<f64>,
    /// offshore, onshore, solar, conventional
    pub distribution: [Vec<f64>; 4],
    pub total: Vec<f64>,
    pub g_co2_per_kwh: Vec<f64>,
}

impl PlotData {
    pub const DISTRIBUTION_LABELS: [&'static str; 4] = ["offshore", "onshore", "solar", "conv"];
}

pub fn convert_to_plot_data(series: EmissionSeries) -> PlotData {
    PlotData {
        time: series.time.iter().map(|t| local_unix_seconds(*t)).collect(),
        distribution: [
            series.offshore,
            series.onshore,
            series.solar,
            series.conventional,
        ],
        total: series.total,
        g_co2_per_kwh: series.g_co2_per_kwh,
    }
}

/// Timestamps are stored as local wall-clock time.
fn local_unix_seconds(time: NaiveDateTime) -> f64 {
    let utc = match Local.from_local_datetime(&time).earliest() {
        Some(local) => local.to_utc(),
        // Skipped by a DST jump; treat as UTC rather than dropping the point
        None => time.and_utc(),
    };
    utc.timestamp_micros() as f64 / 1_000_000.0
}

#[derive(Clone)]
pub struct HistoryService {
    repository: Arc<dyn EmissionRepository>,
}

impl HistoryService {
    pub fn new(repository: Arc<dyn EmissionRepository>) -> Self {
        Self { repository }
    }

    pub async fn latest(&self, points: usize) -> anyhow::Result<EmissionSeries> {
        Ok(self.repository.read_latest(points).await?)
    }

    pub async fn plot_data(&self, points: usize) -> anyhow::Result<PlotData> {
        let series = self.latest(points).await?;
        tracing::debug!("Read {} points for plotting", series.len());
        Ok(convert_to_plot_data(series))
    }

    /// Move the current history into a backup file and start over.
    pub async fn archive(&self) -> anyhow::Result<std::path::PathBuf> {
        let backup = self.repository.archive().await?;
        tracing::info!("Archived emission history to {}", backup.display());
        Ok(backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::estimation_service::tests::MemoryRepository;
    use crate::domain::emission::EmissionRecord;
    use crate::domain::power::PowerMix;
    use chrono::NaiveDate;

    fn record(minute: u32, offshore: f64) -> EmissionRecord {
        let timestamp = NaiveDate::from_ymd_opt(2022, 1, 17)
            .unwrap()
            .and_hms_opt(15, minute, 0)
            .unwrap();
        let mix = PowerMix::from_sources(10.0, offshore, 1.0, 60.0);
        EmissionRecord::new(timestamp, &mix, 400.0)
    }

    #[test]
    fn test_convert_to_plot_data_orders_offshore_first() {
        let series: EmissionSeries = [record(0, 2.0), record(1, 3.0)].into_iter().collect();
        let plot = convert_to_plot_data(series);

        assert_eq!(plot.distribution[0], vec![2.0, 3.0]);
        assert_eq!(plot.distribution[1], vec![10.0, 10.0]);
        assert_eq!(plot.distribution[2], vec![1.0, 1.0]);
        assert_eq!(plot.total, vec![60.0, 60.0]);
        assert!((plot.time[1] - plot.time[0] - 60.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_plot_data_reads_latest_points() {
        let repository = Arc::new(MemoryRepository::default());
        repository
            .records
            .lock()
            .unwrap()
            .extend((0..15).map(|i| record(i, i as f64)));
        let service = HistoryService::new(repository);

        let plot = service.plot_data(DEFAULT_HISTORY_POINTS).await.unwrap();
        assert_eq!(plot.time.len(), 10);
        assert_eq!(plot.distribution[0].first(), Some(&5.0));
        assert_eq!(plot.distribution[0].last(), Some(&14.0));
    }
}
