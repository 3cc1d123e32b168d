use crate::models::{DashboardConfig, FiveDayStats, IntradayStats, Quote, QuoteSlot};
use crate::services::normalizer::{format_percent, Trend};

const MISSING_TIME: &str = "--:--";
const MISSING_PRICE: &str = "¥--";
const MISSING_CHANGE: &str = "--%";

#[derive(Debug, Clone, PartialEq)]
pub struct QuotePanelView {
    pub title: String,
    pub price_text: String,
    pub change_text: String,
    /// Only set for the active slot.
    pub trend: Option<Trend>,
    /// False renders the title dimmed.
    pub active: bool,
}

/// Background tone of an index tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexPanelView {
    pub code: String,
    pub name: String,
    pub price_text: String,
    pub change_text: String,
    pub trend: Trend,
    pub tone: Tone,
    /// Background alpha, capped at 0.2.
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatEntry {
    pub value_text: String,
    pub trend: Trend,
    /// Time (intraday) or date (five-day) the value was observed.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsPanel {
    pub current: StatEntry,
    pub max: StatEntry,
    pub min: StatEntry,
}

fn sign_trend(value: f64) -> Trend {
    if value >= 0.0 {
        Trend::Up
    } else {
        Trend::Down
    }
}

/// Only the slot whose code matches the configured code shows a live price.
pub fn build_quote_panel(
    slot: QuoteSlot,
    quote: Option<&Quote>,
    config: &DashboardConfig,
) -> QuotePanelView {
    let quote = match quote {
        Some(q) if !q.code.is_empty() => q,
        _ => {
            return QuotePanelView {
                title: format!("{}: not set", slot.label()),
                price_text: MISSING_PRICE.to_string(),
                change_text: MISSING_CHANGE.to_string(),
                trend: None,
                active: false,
            }
        }
    };

    let title = format!("{} ({})", quote.name, quote.code);
    if quote.code != config.code_for(slot) {
        return QuotePanelView {
            title,
            price_text: MISSING_PRICE.to_string(),
            change_text: MISSING_CHANGE.to_string(),
            trend: None,
            active: false,
        };
    }

    QuotePanelView {
        title,
        price_text: quote
            .price
            .map(|p| format!("¥{:.2}", p))
            .unwrap_or_else(|| MISSING_PRICE.to_string()),
        change_text: format_percent(quote.change_percent, true),
        trend: Some(sign_trend(quote.change_percent)),
        active: true,
    }
}

pub fn build_index_panel(code: &str, quote: &Quote) -> IndexPanelView {
    let change = quote.change_percent;
    let tone = if change > 0.0 {
        Tone::Up
    } else if change < 0.0 {
        Tone::Down
    } else {
        Tone::Flat
    };

    IndexPanelView {
        code: code.to_string(),
        name: if quote.name.is_empty() {
            code.to_string()
        } else {
            quote.name.clone()
        },
        price_text: quote
            .price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "--".to_string()),
        change_text: format_percent(change, true),
        trend: sign_trend(change),
        tone,
        intensity: if tone == Tone::Flat {
            0.0
        } else {
            (change.abs() * 2.0).min(0.2)
        },
    }
}

fn stat_entry(value: f64, label: Option<&str>) -> StatEntry {
    StatEntry {
        value_text: format_percent(value, true),
        trend: sign_trend(value),
        label: label
            .filter(|l| !l.is_empty())
            .unwrap_or(MISSING_TIME)
            .to_string(),
    }
}

pub fn build_intraday_stats(stats: &IntradayStats) -> StatsPanel {
    let current_time = stats
        .latest_time
        .as_deref()
        .filter(|t| !t.is_empty())
        .or(stats.current_time.as_deref());

    StatsPanel {
        current: stat_entry(stats.current, current_time),
        max: stat_entry(stats.max, stats.max_time.as_deref()),
        min: stat_entry(stats.min, stats.min_time.as_deref()),
    }
}

pub fn build_five_day_stats(stats: &FiveDayStats) -> StatsPanel {
    StatsPanel {
        current: stat_entry(stats.current, stats.current_date.as_deref()),
        max: stat_entry(stats.max, stats.max_date.as_deref()),
        min: stat_entry(stats.min, stats.min_date.as_deref()),
    }
}
