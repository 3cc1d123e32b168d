use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::dashboard_api::DashboardApi;
use crate::models::DashboardConfig;
use crate::services::render::{render_payload, RenderReport};
use crate::services::scheduler::{PollStatus, PollingScheduler, TickFn};
use crate::services::sink::DashboardSink;

/// Everything the dashboard mutates at runtime. Locks are never held across an await.
#[derive(Default)]
pub struct DashboardState {
    config: RwLock<DashboardConfig>,
    scheduler: Mutex<PollingScheduler>,
    ticks: AtomicU64,
}

impl DashboardState {
    pub fn config(&self) -> DashboardConfig {
        self.config.read().clone()
    }

    pub fn poll_status(&self) -> PollStatus {
        self.scheduler.lock().status()
    }

    pub fn poll_starts(&self) -> u64 {
        self.scheduler.lock().starts()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Started,
    LoginRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    LoginRequired,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Rendered(RenderReport),
    LoginRequired,
    Failed,
}

/// Fetch → normalize → sink, once per tick, plus the config save flow.
#[derive(Clone)]
pub struct DashboardController {
    api: DashboardApi,
    sink: Arc<dyn DashboardSink>,
    state: Arc<DashboardState>,
    poll_interval: Duration,
}

impl DashboardController {
    pub fn new(api: DashboardApi, sink: Arc<dyn DashboardSink>, poll_interval: Duration) -> Self {
        Self {
            api,
            sink,
            state: Arc::new(DashboardState::default()),
            poll_interval,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Loads the config and starts polling. A network failure leaves polling off.
    pub async fn init(&self) -> Result<InitOutcome, AppError> {
        let config = match self.api.get_config().await {
            Ok(Some(config)) => config,
            Ok(None) => return Ok(InitOutcome::LoginRequired),
            Err(e) => {
                error!(error = %e, "Error loading config");
                return Err(e);
            }
        };

        info!(stock1 = %config.stock1, stock2 = %config.stock2, "Config loaded");
        *self.state.config.write() = config.clone();
        self.sink.update_config_form(&config);
        self.start_polling();
        Ok(InitOutcome::Started)
    }

    /// Trims, saves, and on success restarts polling so the next cycle uses the new codes.
    ///
    /// On any failure the previous config and polling cycle stay as they were.
    pub async fn save_config(&self, stock1: &str, stock2: &str) -> Result<SaveOutcome, AppError> {
        let requested = DashboardConfig::from_input(stock1, stock2);
        info!(stock1 = %requested.stock1, stock2 = %requested.stock2, "Saving stock codes");

        let response = match self.api.update_stocks(&requested).await {
            Ok(Some(response)) => response,
            Ok(None) => return Ok(SaveOutcome::LoginRequired),
            Err(e) => {
                error!(error = %e, "Failed to save config");
                self.sink.notify(&format!("Save failed: {}", e));
                return Err(e);
            }
        };

        if !response.is_success() {
            let message = response.error_message();
            warn!(%message, "Backend rejected config");
            self.sink.notify(&format!("Save failed: {}", message));
            return Err(AppError::Validation(message));
        }

        *self.state.config.write() = requested;
        self.sink.notify("Stock codes updated");
        self.restart_polling();
        Ok(SaveOutcome::Saved)
    }

    /// One poll cycle. Errors are logged and the cycle is skipped; the next tick retries.
    pub async fn fetch_and_render(&self) -> RenderOutcome {
        let tick = self.state.ticks.fetch_add(1, Ordering::SeqCst) + 1;

        let payload = match self.api.get_data().await {
            Ok(Some(payload)) => payload,
            Ok(None) => return RenderOutcome::LoginRequired,
            Err(e) => {
                error!(tick, error = %e, "Error fetching data");
                return RenderOutcome::Failed;
            }
        };

        let config = self.state.config();
        let report = render_payload(&payload, &config, self.sink.as_ref());
        if report.skipped.is_empty() {
            info!(tick, updated = report.updated, "Dashboard refreshed");
        } else {
            warn!(tick, updated = report.updated, skipped = ?report.skipped, "Dashboard partially refreshed");
        }
        RenderOutcome::Rendered(report)
    }

    fn tick_fn(&self) -> TickFn {
        let controller = self.clone();
        Arc::new(move || {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller.fetch_and_render().await;
            });
        })
    }

    pub fn start_polling(&self) {
        let tick = self.tick_fn();
        self.state.scheduler.lock().start(self.poll_interval, tick);
    }

    pub fn stop_polling(&self) {
        self.state.scheduler.lock().stop();
    }

    pub fn restart_polling(&self) {
        let tick = self.tick_fn();
        let mut scheduler = self.state.scheduler.lock();
        scheduler.stop();
        scheduler.start(self.poll_interval, tick);
    }
}
