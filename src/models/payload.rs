use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Body of `GET /api/get-data`.
///
/// Sections are decoded one at a time so a single bad section only costs that display element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardPayload(Map<String, Value>);

impl DashboardPayload {
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AppError::malformed(
                "payload",
                format!("expected an object, got {}", kind_of(&other)),
            )),
        }
    }

    /// `Ok(None)` when the section is absent or null.
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| AppError::malformed(key, e)),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Quote, StockChartData};
    use serde_json::json;

    #[test]
    fn test_section_isolation() {
        let payload = DashboardPayload::from_value(json!({
            "stock1": {"code": "600000", "name": "浦发银行", "price": 8.1, "changePercent": 0.01},
            "stock1ChartData": {"times": "oops", "prices": [1.0]},
            "stock2": null
        }))
        .unwrap();

        let quote: Option<Quote> = payload.section("stock1").unwrap();
        assert_eq!(quote.unwrap().code, "600000");

        let chart = payload.section::<StockChartData>("stock1ChartData");
        assert!(matches!(chart, Err(AppError::MalformedData { ref section, .. }) if section == "stock1ChartData"));

        assert!(payload.section::<Quote>("stock2").unwrap().is_none());
        assert!(payload.section::<Quote>("index9").unwrap().is_none());
    }

    #[test]
    fn test_non_object_payload_rejected() {
        let err = DashboardPayload::from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}
