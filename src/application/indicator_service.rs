// Indicator service - Drives the traffic light from published snapshots
use crate::application::indicator_light::IndicatorLight;
use crate::application::polling_service::SnapshotReceiver;
use crate::domain::indicator::{Rgb, indicator_color};
use crate::domain::snapshot::Snapshot;
use std::sync::Arc;

#[derive(Clone)]
pub struct IndicatorService {
    light: Arc<dyn IndicatorLight>,
}

impl IndicatorService {
    pub fn new(light: Arc<dyn IndicatorLight>) -> Self {
        Self { light }
    }

    pub fn apply(&self, snapshot: &Snapshot) -> anyhow::Result<Rgb> {
        let color = indicator_color(snapshot.indicator.value())?;
        self.light.set_color(color)?;
        Ok(color)
    }

    /// Follow the snapshot channel until its sender is gone, then switch off.
    pub async fn run(&self, mut snapshots: SnapshotReceiver) {
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            if let Some(snapshot) = snapshot {
                if let Err(e) = self.apply(&snapshot) {
                    tracing::error!("Failed to drive indicator: {:#}", e);
                }
            }
        }

        if let Err(e) = self.light.clear() {
            tracing::warn!("Failed to clear indicator: {:#}", e);
        }
    }
}
