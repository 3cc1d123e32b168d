use crate::models::{DashboardConfig, QuoteSlot};
use crate::services::normalizer::{FiveDayChart, IntradayChart, StockTrendChart};
use crate::services::panels::{IndexPanelView, QuotePanelView, StatsPanel};

/// Owns the chart instances. Receives fully normalized series and only redraws.
pub trait ChartSink: Send + Sync {
    fn update_stock_chart(&self, slot: QuoteSlot, chart: StockTrendChart);

    fn update_intraday_chart(&self, chart: IntradayChart);

    fn update_five_day_chart(&self, chart: FiveDayChart);
}

/// Text panels, the config form and user-facing notices.
pub trait PanelSink: Send + Sync {
    fn update_quote_panel(&self, slot: QuoteSlot, view: QuotePanelView);

    /// `None` leaves the tile as it was.
    fn update_index_panel(&self, code: &str, view: Option<IndexPanelView>);

    fn update_intraday_stats(&self, panel: StatsPanel);

    fn update_five_day_stats(&self, panel: StatsPanel);

    fn update_config_form(&self, config: &DashboardConfig);

    fn update_clock(&self, now: &str);

    fn notify(&self, message: &str);
}

pub trait DashboardSink: ChartSink + PanelSink {}

impl<T: ChartSink + PanelSink> DashboardSink for T {}
