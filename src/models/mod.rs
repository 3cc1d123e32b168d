mod dashboard_config;
mod lenient;
mod payload;
mod quote;
mod series;

pub use dashboard_config::{DashboardConfig, UpdateStocksResponse};
pub use lenient::lenient_f64;
pub use payload::{DashboardPayload, LoginResponse};
pub use quote::{Quote, QuoteSlot, INDEX_SLOTS};
pub use series::{
    FiveDayPoint, FiveDayStats, IntradayPoint, IntradayStats, SeriesSection, StockChartData,
};
