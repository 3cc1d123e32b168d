//! Pure transforms from backend payload sections to chart-ready series.
//!
//! Nothing in here touches the network or a sink, so every function is unit-testable on its own.

use tracing::debug;

use crate::models::{FiveDayPoint, IntradayPoint, StockChartData};

pub const UP_COLOR: &str = "#f56c6c";
pub const DOWN_COLOR: &str = "#67c23a";

/// Times that get an axis label on the intraday chart.
const INTRADAY_LABELED_TIMES: [&str; 9] = [
    "09:30", "10:00", "10:30", "11:00", "11:30", "13:30", "14:00", "14:30", "15:00",
];

const LUNCH_BREAK_TIME: &str = "11:30";

/// Red for up, green for down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Decided by the latest point only. An empty series counts as up.
    pub fn of_latest(values: &[f64]) -> Self {
        let last = values.last().copied().unwrap_or(0.0);
        if last >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Trend::Up => UP_COLOR,
            Trend::Down => DOWN_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMarker {
    /// Horizontal dashed line at value 0.
    ZeroLine,
    /// Vertical dashed line at a category index.
    Vertical { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockTrendChart {
    pub times: Vec<String>,
    /// Percent values (1.5 means +1.5%).
    pub values: Vec<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntradayChart {
    pub times: Vec<String>,
    pub values: Vec<f64>,
    pub axis_labels: Vec<String>,
    pub markers: Vec<ChartMarker>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiveDayAxis {
    pub labels: Vec<String>,
    pub boundary_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FiveDayChart {
    pub datetimes: Vec<String>,
    pub values: Vec<f64>,
    pub labels: Vec<String>,
    pub markers: Vec<ChartMarker>,
}

/// JS-style truthiness for prices: missing, zero and NaN are all "no price".
fn usable_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| *p != 0.0 && !p.is_nan())
}

fn has_coindexed_change_percent(chart: &StockChartData) -> bool {
    let prices_len = chart.prices.as_ref().map_or(0, Vec::len);
    chart
        .change_percent
        .as_ref()
        .is_some_and(|cp| cp.len() == prices_len)
}

/// Percent change series for one instrument's trend chart.
///
/// Uses the backend's `change_percent` when it is co-indexed with `prices`. Otherwise the first price of
/// the session is the base. The proper base is the previous close, but the displayed values have always
/// been computed against the session open, so that is kept.
pub fn compute_change_percent(chart: &StockChartData) -> Vec<f64> {
    let prices = chart.prices.as_deref().unwrap_or_default();

    if has_coindexed_change_percent(chart) {
        return chart
            .change_percent
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|fraction| fraction.unwrap_or(0.0) * 100.0)
            .collect();
    }

    let base = usable_price(prices.first().copied().flatten());
    prices
        .iter()
        .map(|price| match (usable_price(*price), base) {
            (Some(p), Some(b)) => (p - b) / b * 100.0,
            _ => 0.0,
        })
        .collect()
}

/// `None` when there are no prices to draw; the chart keeps its previous state.
pub fn build_stock_trend(chart: &StockChartData) -> Option<StockTrendChart> {
    let prices = chart.prices.as_ref()?;
    if prices.is_empty() {
        return None;
    }

    if !has_coindexed_change_percent(chart) {
        debug!(points = prices.len(), "Computing fallback change percent from session open");
    }

    let values = compute_change_percent(chart);
    Some(StockTrendChart {
        times: chart.times.clone(),
        trend: Trend::of_latest(&values),
        values,
    })
}

fn parse_hour_minute(time: &str) -> Option<(u32, u32)> {
    let mut parts = time.split(':');
    let hour = parts.next()?.trim().parse().ok()?;
    let minute = parts.next()?.trim().parse().ok()?;
    Some((hour, minute))
}

/// Session-open filter only: lunch break and after-close points stay in.
fn is_display_eligible(time: &str) -> bool {
    match parse_hour_minute(time) {
        Some((hour, minute)) => (hour == 9 && minute >= 30) || hour >= 10,
        None => false,
    }
}

/// Axis label for an intraday category; most categories are unlabeled.
pub fn intraday_axis_label(time: &str) -> &str {
    if time == LUNCH_BREAK_TIME {
        "11:30/13:00"
    } else if INTRADAY_LABELED_TIMES.contains(&time) {
        time
    } else {
        ""
    }
}

pub fn filter_intraday_points(points: &[IntradayPoint]) -> IntradayChart {
    let (times, values): (Vec<String>, Vec<f64>) = points
        .iter()
        .filter(|p| is_display_eligible(&p.time))
        .map(|p| (p.time.clone(), p.value))
        .unzip();

    let mut markers = vec![ChartMarker::ZeroLine];
    if let Some(index) = times.iter().position(|t| t == LUNCH_BREAK_TIME) {
        markers.push(ChartMarker::Vertical { index });
    }

    let axis_labels = times
        .iter()
        .map(|t| intraday_axis_label(t).to_string())
        .collect();

    IntradayChart {
        times,
        values,
        axis_labels,
        markers,
    }
}

/// One centered date label per trading day, plus the first index of every distinct date.
///
/// The label pass walks contiguous runs; the boundary pass searches forward from the start for each
/// distinct date. Both agree on well-formed input, but they are computed separately.
pub fn compute_five_day_labels_and_boundaries(points: &[FiveDayPoint]) -> FiveDayAxis {
    let mut labels = vec![String::new(); points.len()];

    let mut current: Option<&str> = None;
    let mut start = 0usize;
    for (i, point) in points.iter().enumerate() {
        let date = point.date_part();
        if current != Some(date) {
            if let Some(previous) = current {
                labels[(start + i - 1) / 2] = previous.to_string();
            }
            current = Some(date);
            start = i;
        }
    }
    if let Some(last) = current {
        labels[(start + points.len() - 1) / 2] = last.to_string();
    }

    let mut distinct_dates: Vec<&str> = Vec::new();
    for point in points {
        let date = point.date_part();
        if !distinct_dates.contains(&date) {
            distinct_dates.push(date);
        }
    }
    let boundary_indices = distinct_dates
        .iter()
        .filter_map(|date| points.iter().position(|p| p.datetime.starts_with(date)))
        .collect();

    FiveDayAxis {
        labels,
        boundary_indices,
    }
}

pub fn build_five_day_chart(points: &[FiveDayPoint]) -> FiveDayChart {
    let FiveDayAxis {
        labels,
        boundary_indices,
    } = compute_five_day_labels_and_boundaries(points);

    let mut markers = vec![ChartMarker::ZeroLine];
    markers.extend(
        boundary_indices
            .into_iter()
            .map(|index| ChartMarker::Vertical { index }),
    );

    FiveDayChart {
        datetimes: points.iter().map(|p| p.datetime.clone()).collect(),
        values: points.iter().map(|p| p.value).collect(),
        labels,
        markers,
    }
}

/// Fraction to display percent: `0.1523` → `"+15.23%"` with sign, `"15.23%"` without.
pub fn format_percent(value: f64, with_sign: bool) -> String {
    let sign = if with_sign && value >= 0.0 { "+" } else { "" };
    let percent = value * 100.0;
    // -0.0 would print as "-0.00"
    let percent = if percent == 0.0 { 0.0 } else { percent };
    format!("{}{:.2}%", sign, percent)
}
