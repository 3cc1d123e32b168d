use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::services::sink::DashboardSink;

pub fn clock_text<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%H:%M:%S").to_string()
}

/// Wall clock in the header, refreshed once a second until the handle is aborted.
pub fn spawn_clock(sink: Arc<dyn DashboardSink>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            sink.update_clock(&clock_text(&Local::now()));
        }
    })
}
