use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{
    DashboardConfig, DashboardPayload, FiveDayPoint, FiveDayStats, IntradayPoint, IntradayStats,
    Quote, QuoteSlot, SeriesSection, StockChartData, INDEX_SLOTS,
};
use crate::services::normalizer::{build_five_day_chart, build_stock_trend, filter_intraday_points};
use crate::services::panels::{
    build_five_day_stats, build_index_panel, build_intraday_stats, build_quote_panel,
};
use crate::services::sink::DashboardSink;

/// What one render pass did. A skipped element keeps whatever it showed before.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderReport {
    pub updated: usize,
    pub skipped: Vec<String>,
}

impl RenderReport {
    fn skip(&mut self, element: impl Into<String>) {
        let element = element.into();
        if !self.skipped.contains(&element) {
            self.skipped.push(element);
        }
    }
}

fn read_section<T: DeserializeOwned>(
    payload: &DashboardPayload,
    key: &str,
    report: &mut RenderReport,
) -> Option<Option<T>> {
    match payload.section::<T>(key) {
        Ok(section) => Some(section),
        Err(e) => {
            warn!(section = key, error = %e, "Skipping malformed section");
            report.skip(key);
            None
        }
    }
}

fn read_half<T>(
    decoded: Result<Option<T>, serde_json::Error>,
    element: String,
    report: &mut RenderReport,
) -> Option<T> {
    match decoded {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            debug!(element = %element, "Section half missing");
            report.skip(element);
            None
        }
        Err(e) => {
            warn!(element = %element, error = %e, "Skipping malformed section half");
            report.skip(element);
            None
        }
    }
}

/// Chart and stats panel of a `{data, stats}` section, each updated on its own.
fn render_series<P: DeserializeOwned, S: DeserializeOwned>(
    payload: &DashboardPayload,
    key: &str,
    report: &mut RenderReport,
    draw_chart: impl FnOnce(Vec<P>),
    draw_stats: impl FnOnce(S),
) {
    let Some(section) = read_section::<SeriesSection>(payload, key, report).flatten() else {
        report.skip(key);
        return;
    };

    if let Some(points) = read_half(section.data::<P>(), format!("{}.data", key), report) {
        draw_chart(points);
        report.updated += 1;
    }
    if let Some(stats) = read_half(section.stats::<S>(), format!("{}.stats", key), report) {
        draw_stats(stats);
        report.updated += 1;
    }
}

/// Pushes every display element of one data payload to the sink.
///
/// Each element is decoded and rendered on its own; one bad section never blocks the rest.
pub fn render_payload(
    payload: &DashboardPayload,
    config: &DashboardConfig,
    sink: &dyn DashboardSink,
) -> RenderReport {
    let mut report = RenderReport::default();

    for slot in QuoteSlot::ALL {
        if let Some(quote) = read_section::<Quote>(payload, slot.key(), &mut report) {
            sink.update_quote_panel(slot, build_quote_panel(slot, quote.as_ref(), config));
            report.updated += 1;
        }
    }

    for (key, code) in INDEX_SLOTS {
        if let Some(quote) = read_section::<Quote>(payload, key, &mut report) {
            sink.update_index_panel(code, quote.map(|q| build_index_panel(code, &q)));
            report.updated += 1;
        }
    }

    for slot in QuoteSlot::ALL {
        let chart = read_section::<StockChartData>(payload, slot.chart_key(), &mut report)
            .flatten()
            .and_then(|data| build_stock_trend(&data));
        match chart {
            Some(chart) => {
                sink.update_stock_chart(slot, chart);
                report.updated += 1;
            }
            None => {
                debug!(slot = slot.key(), "No prices for stock trend chart");
                report.skip(slot.chart_key());
            }
        }
    }

    render_series::<IntradayPoint, IntradayStats>(
        payload,
        "intraday",
        &mut report,
        |points| sink.update_intraday_chart(filter_intraday_points(&points)),
        |stats| sink.update_intraday_stats(build_intraday_stats(&stats)),
    );

    render_series::<FiveDayPoint, FiveDayStats>(
        payload,
        "fiveDay",
        &mut report,
        |points| sink.update_five_day_chart(build_five_day_chart(&points)),
        |stats| sink.update_five_day_stats(build_five_day_stats(&stats)),
    );

    report
}
