// Application state for HTTP handlers
use crate::application::history_service::HistoryService;
use crate::application::polling_service::PollingService;

#[derive(Clone)]
pub struct AppState {
    pub polling_service: PollingService,
    pub history_service: HistoryService,
}
