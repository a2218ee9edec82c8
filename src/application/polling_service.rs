// Polling service - Periodic estimation loop with runtime control
use crate::application::estimation_service::EstimationService;
use crate::domain::snapshot::Snapshot;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingControl {
    pub running: bool,
    pub interval_minutes: u64,
}

/// Longest accepted polling interval: one day.
pub const MAX_INTERVAL_MINUTES: u64 = 24 * 60;

impl PollingControl {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("polling interval must be at least one minute")]
    ZeroInterval,
    #[error("polling interval must be at most {MAX_INTERVAL_MINUTES} minutes, got {0}")]
    IntervalTooLarge(u64),
}

pub fn validate_interval(minutes: u64) -> Result<u64, ControlError> {
    match minutes {
        0 => Err(ControlError::ZeroInterval),
        m if m > MAX_INTERVAL_MINUTES => Err(ControlError::IntervalTooLarge(m)),
        m => Ok(m),
    }
}

/// Latest snapshot; `None` until the first successful cycle.
pub type SnapshotReceiver = watch::Receiver<Option<Arc<Snapshot>>>;

#[derive(Clone)]
pub struct PollingService {
    estimation: EstimationService,
    control: Arc<watch::Sender<PollingControl>>,
    snapshots: Arc<watch::Sender<Option<Arc<Snapshot>>>>,
}

impl PollingService {
    pub fn new(estimation: EstimationService, initial: PollingControl) -> Self {
        let (control, _) = watch::channel(initial);
        let (snapshots, _) = watch::channel(None);
        Self {
            estimation,
            control: Arc::new(control),
            snapshots: Arc::new(snapshots),
        }
    }

    pub fn control(&self) -> PollingControl {
        *self.control.borrow()
    }

    pub fn update_control(
        &self,
        running: Option<bool>,
        interval_minutes: Option<u64>,
    ) -> Result<PollingControl, ControlError> {
        if let Some(minutes) = interval_minutes {
            validate_interval(minutes)?;
        }

        self.control.send_modify(|control| {
            if let Some(running) = running {
                control.running = running;
            }
            if let Some(minutes) = interval_minutes {
                control.interval_minutes = minutes;
            }
        });

        let control = self.control();
        tracing::info!(
            "Polling control updated: running={}, interval={} min",
            control.running,
            control.interval_minutes
        );
        Ok(control)
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.snapshots.borrow().clone()
    }

    /// Run one cycle. Errors are logged and the cycle is skipped.
    pub async fn tick(&self) -> Option<Arc<Snapshot>> {
        match self.estimation.run_cycle().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.snapshots.send_replace(Some(snapshot.clone()));
                Some(snapshot)
            }
            Err(e) => {
                tracing::error!("Skipping estimation cycle: {:#}", e);
                None
            }
        }
    }

    /// Loop forever, ticking every interval while running. Control changes
    /// take effect without waiting for the current interval to elapse.
    pub async fn run(&self) {
        let mut control_rx = self.control.subscribe();
        let mut last_cycle: Option<Instant> = None;

        loop {
            let control = *control_rx.borrow_and_update();

            if !control.running {
                if control_rx.changed().await.is_err() {
                    break;
                }
                continue;
            }

            let now = Instant::now();
            let due = match last_cycle {
                Some(t) => t.checked_add(control.interval()),
                None => Some(now),
            };
            if due.is_some_and(|due| now >= due) {
                self.tick().await;
                last_cycle = Some(now);
                continue;
            }

            // An unrepresentable deadline waits for the next control change
            let sleep = async {
                match due {
                    Some(due) => tokio::time::sleep_until(due).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = sleep => {}
                changed = control_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }
}
