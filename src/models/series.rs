use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::lenient::lenient_f64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayPoint {
    /// "HH:MM"
    pub time: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntradayStats {
    #[serde(deserialize_with = "lenient_f64")]
    pub current: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub max: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub min: f64,
    pub current_time: Option<String>,
    pub latest_time: Option<String>,
    pub max_time: Option<String>,
    pub min_time: Option<String>,
}

/// A `{data, stats}` series section (`intraday`, `fiveDay`).
///
/// The halves stay raw until asked for, so a bad `stats` block never costs the chart and a bad
/// point never costs the stats panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSection {
    data: Option<Value>,
    stats: Option<Value>,
}

impl SeriesSection {
    /// `Ok(None)` when `data` is absent or null.
    pub fn data<P: DeserializeOwned>(&self) -> Result<Option<Vec<P>>, serde_json::Error> {
        decode_half(self.data.as_ref())
    }

    pub fn stats<S: DeserializeOwned>(&self) -> Result<Option<S>, serde_json::Error> {
        decode_half(self.stats.as_ref())
    }
}

fn decode_half<T: DeserializeOwned>(value: Option<&Value>) -> Result<Option<T>, serde_json::Error> {
    value.map(T::deserialize).transpose()
}

/// One point of up to five trading days; points of one date form a contiguous run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveDayPoint {
    /// "YYYY-MM-DD HH:MM"
    pub datetime: String,
    pub value: f64,
}

impl FiveDayPoint {
    pub fn date_part(&self) -> &str {
        self.datetime.split(' ').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiveDayStats {
    #[serde(deserialize_with = "lenient_f64")]
    pub current: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub max: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub min: f64,
    pub current_date: Option<String>,
    pub max_date: Option<String>,
    pub min_date: Option<String>,
}

/// One instrument's own intraday trend. `change_percent` is co-indexed with `prices` when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockChartData {
    pub times: Vec<String>,
    pub prices: Option<Vec<Option<f64>>>,
    pub change_percent: Option<Vec<Option<f64>>>,
}
