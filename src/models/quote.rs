use serde::{Deserialize, Serialize};

use crate::models::lenient::lenient_f64;

/// Latest snapshot for one instrument.
///
/// `change_percent` is a fraction (0.0123 means +1.23%). Index quotes arrive without a code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub change_percent: f64,
}

/// The two user-configured stock slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteSlot {
    Stock1,
    Stock2,
}

impl QuoteSlot {
    pub const ALL: [QuoteSlot; 2] = [QuoteSlot::Stock1, QuoteSlot::Stock2];

    /// Key of the quote in the data payload, also the config field name.
    pub fn key(self) -> &'static str {
        match self {
            QuoteSlot::Stock1 => "stock1",
            QuoteSlot::Stock2 => "stock2",
        }
    }

    pub fn chart_key(self) -> &'static str {
        match self {
            QuoteSlot::Stock1 => "stock1ChartData",
            QuoteSlot::Stock2 => "stock2ChartData",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuoteSlot::Stock1 => "STOCK1",
            QuoteSlot::Stock2 => "STOCK2",
        }
    }
}

/// Payload key → instrument code, in display order.
pub const INDEX_SLOTS: [(&str, &str); 8] = [
    ("index1", "sh000001"),
    ("index2", "sz399001"),
    ("index3", "sz399006"),
    ("index4", "sh000688"),
    ("index5", "sh000016"),
    ("index6", "sh000300"),
    ("index7", "sh000905"),
    ("index8", "sh000852"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_quote_without_code() {
        let quote: Quote =
            serde_json::from_str(r#"{"name":"上证指数","price":3050.12,"changePercent":0.0042}"#)
                .unwrap();
        assert_eq!(quote.code, "");
        assert_eq!(quote.price, Some(3050.12));
        assert!((quote.change_percent - 0.0042).abs() < 1e-12);
    }

    #[test]
    fn test_missing_change_percent_reads_as_zero() {
        let quote: Quote =
            serde_json::from_str(r#"{"code":"600000","name":"浦发银行","price":8.5}"#).unwrap();
        assert_eq!(quote.change_percent, 0.0);
    }

    #[test]
    fn test_index_slots_are_in_payload_order() {
        let keys: Vec<&str> = INDEX_SLOTS.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            vec!["index1", "index2", "index3", "index4", "index5", "index6", "index7", "index8"]
        );
        assert_eq!(INDEX_SLOTS[0].1, "sh000001");
        assert_eq!(INDEX_SLOTS[7].1, "sh000852");
    }
}
