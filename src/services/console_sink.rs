use tracing::{info, warn};

use crate::models::{DashboardConfig, QuoteSlot};
use crate::services::normalizer::{ChartMarker, FiveDayChart, IntradayChart, StockTrendChart};
use crate::services::panels::{IndexPanelView, QuotePanelView, StatsPanel};
use crate::services::sink::{ChartSink, PanelSink};

/// Headless renderer: every update becomes one structured log line.
#[derive(Debug, Default, Clone)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

fn last_value(values: &[f64]) -> Option<f64> {
    values.last().copied()
}

fn vertical_markers(markers: &[ChartMarker]) -> Vec<usize> {
    markers
        .iter()
        .filter_map(|m| match m {
            ChartMarker::Vertical { index } => Some(*index),
            ChartMarker::ZeroLine => None,
        })
        .collect()
}

impl ChartSink for ConsoleSink {
    fn update_stock_chart(&self, slot: QuoteSlot, chart: StockTrendChart) {
        info!(
            slot = slot.key(),
            points = chart.values.len(),
            last_pct = ?last_value(&chart.values),
            color = chart.trend.color(),
            "📈 stock trend"
        );
    }

    fn update_intraday_chart(&self, chart: IntradayChart) {
        info!(
            points = chart.values.len(),
            first = ?chart.times.first(),
            last = ?chart.times.last(),
            boundaries = ?vertical_markers(&chart.markers),
            "📈 intraday spread"
        );
    }

    fn update_five_day_chart(&self, chart: FiveDayChart) {
        let days: Vec<&str> = chart
            .labels
            .iter()
            .filter(|l| !l.is_empty())
            .map(String::as_str)
            .collect();
        info!(
            points = chart.values.len(),
            days = ?days,
            boundaries = ?vertical_markers(&chart.markers),
            "📈 five-day spread"
        );
    }
}

impl PanelSink for ConsoleSink {
    fn update_quote_panel(&self, slot: QuoteSlot, view: QuotePanelView) {
        info!(
            slot = slot.key(),
            title = %view.title,
            price = %view.price_text,
            change = %view.change_text,
            active = view.active,
            "quote"
        );
    }

    fn update_index_panel(&self, code: &str, view: Option<IndexPanelView>) {
        if let Some(view) = view {
            info!(
                code,
                name = %view.name,
                price = %view.price_text,
                change = %view.change_text,
                "index"
            );
        }
    }

    fn update_intraday_stats(&self, panel: StatsPanel) {
        info!(
            current = %panel.current.value_text,
            current_at = %panel.current.label,
            max = %panel.max.value_text,
            max_at = %panel.max.label,
            min = %panel.min.value_text,
            min_at = %panel.min.label,
            "intraday stats"
        );
    }

    fn update_five_day_stats(&self, panel: StatsPanel) {
        info!(
            current = %panel.current.value_text,
            current_on = %panel.current.label,
            max = %panel.max.value_text,
            max_on = %panel.max.label,
            min = %panel.min.value_text,
            min_on = %panel.min.label,
            "five-day stats"
        );
    }

    fn update_config_form(&self, config: &DashboardConfig) {
        info!(stock1 = %config.stock1, stock2 = %config.stock2, "⚙️ config loaded");
    }

    fn update_clock(&self, now: &str) {
        tracing::trace!(now, "clock");
    }

    fn notify(&self, message: &str) {
        warn!("🔔 {}", message);
    }
}
