use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a number, a numeric string, or null. Anything unparseable becomes 0.0.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64).unwrap_or(0.0))
}

fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient_f64")]
        v: f64,
    }

    fn read(json: &str) -> f64 {
        serde_json::from_str::<Holder>(json).unwrap().v
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        assert_eq!(read(r#"{"v": 0.25}"#), 0.25);
        assert_eq!(read(r#"{"v": "-0.013"}"#), -0.013);
    }

    #[test]
    fn test_garbage_reads_as_zero() {
        assert_eq!(read(r#"{"v": null}"#), 0.0);
        assert_eq!(read(r#"{"v": "n/a"}"#), 0.0);
        assert_eq!(read(r#"{"v": [1]}"#), 0.0);
        assert_eq!(read(r#"{}"#), 0.0);
    }
}
