use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Called once per tick. Must not block; long work belongs in a spawned task.
pub type TickFn = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Idle,
    Running,
}

/// Fixed-interval refresh loop with at most one live timer.
///
/// Ticks are not serialized: if a tick's work is still running when the next one fires, both run.
#[derive(Default)]
pub struct PollingScheduler {
    interval: Option<Duration>,
    timer: Option<JoinHandle<()>>,
    starts: u64,
}

impl PollingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any running timer, fires `on_tick` right away, then every `interval`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self, interval: Duration, on_tick: TickFn) {
        self.stop();

        // tokio rejects a zero period
        let interval = interval.max(Duration::from_millis(1));

        on_tick();

        let timer = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                on_tick();
            }
        });

        self.timer = Some(timer);
        self.interval = Some(interval);
        self.starts += 1;
        info!(interval_ms = interval.as_millis() as u64, "⏱️ Polling started");
    }

    /// Prevents future ticks. Work already spawned by earlier ticks keeps running.
    pub fn stop(&mut self) {
        match self.timer.take() {
            Some(timer) => {
                timer.abort();
                info!("Polling stopped");
            }
            None => debug!("Polling already idle"),
        }
        self.interval = None;
    }

    pub fn status(&self) -> PollStatus {
        if self.timer.is_some() {
            PollStatus::Running
        } else {
            PollStatus::Idle
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// How many times `start` has run over the scheduler's lifetime.
    pub fn starts(&self) -> u64 {
        self.starts
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
