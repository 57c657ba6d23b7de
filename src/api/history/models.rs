use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::{History, Observation};

/// Errors raised while fetching the history document
#[derive(Debug, Error)]
pub enum LoadError {
    /// Non-success HTTP status from the history host
    #[error("failed to load history: HTTP {status}")]
    Transport { status: reqwest::StatusCode },
    /// Network/request error
    #[error("failed to load history: {0}")]
    Request(String),
    /// Body is not valid JSON
    #[error("failed to parse history: {0}")]
    Parse(String),
}

/// A history record as it appears on the wire, before coercion
#[derive(Debug, Default, Deserialize)]
pub struct RawObservation {
    #[serde(default)]
    pub bid: Option<Value>,
    #[serde(default)]
    pub timestamp_iso: Option<Value>,
    #[serde(default)]
    pub source: Option<Value>,
}

impl RawObservation {
    /// Coerce into a typed observation. Returns whether the bid was usable.
    pub fn into_observation(self) -> (Observation, bool) {
        let bid = self.bid.as_ref().map(coerce_number).unwrap_or(f64::NAN);

        let timestamp_iso = match self.timestamp_iso {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let source = match self.source {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        };

        let observation = Observation {
            bid,
            timestamp_iso,
            source,
        };
        (observation, !bid.is_nan())
    }
}

/// Numeric coercion for `bid`: numbers and numeric strings pass, everything else is NaN
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    }
}

/// Decode the parsed document into a history.
///
/// A non-array document is an empty history. Malformed records are kept with a
/// NaN bid and logged.
pub fn decode_history(document: Value) -> History {
    let items = match document {
        Value::Array(items) => items,
        other => {
            warn!("History document is not an array (got {}), treating as empty", json_kind(&other));
            return History::default();
        }
    };

    let observations = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw = match item {
                Value::Object(_) => serde_json::from_value::<RawObservation>(item).unwrap_or_default(),
                _ => RawObservation::default(),
            };
            let (observation, valid) = raw.into_observation();
            if !valid {
                warn!("History record {} has a non-numeric bid", index);
            }
            observation
        })
        .collect();

    History::new(observations)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(5.1)), 5.1);
        assert_eq!(coerce_number(&json!("5.25")), 5.25);
        assert_eq!(coerce_number(&json!(" 4.9 ")), 4.9);
        assert_eq!(coerce_number(&json!("")), 0.0);
        assert_eq!(coerce_number(&json!(true)), 1.0);
        assert!(coerce_number(&json!("abc")).is_nan());
        assert!(coerce_number(&json!(null)).is_nan());
        assert!(coerce_number(&json!({"v": 1})).is_nan());
    }

    #[test]
    fn test_decode_history_records() {
        let doc = json!([
            {"bid": 5.1, "timestamp_iso": "2024-01-01T12:00:00+00:00", "source": "AwesomeAPI"},
            {"bid": "5.2", "timestamp_iso": "2024-01-02T12:00:00+00:00", "source": ""},
            {"timestamp_iso": "2024-01-03T12:00:00+00:00"}
        ]);

        let history = decode_history(doc);
        let obs = history.observations();

        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].bid, 5.1);
        assert_eq!(obs[0].source.as_deref(), Some("AwesomeAPI"));
        assert_eq!(obs[1].bid, 5.2);
        assert_eq!(obs[1].source, None);
        assert!(obs[2].bid.is_nan());
        assert_eq!(obs[2].timestamp_iso, "2024-01-03T12:00:00+00:00");
    }

    #[test]
    fn test_non_object_record_is_kept_as_nan() {
        let history = decode_history(json!([42, {"bid": 5.0, "timestamp_iso": "t"}]));

        assert_eq!(history.len(), 2);
        assert!(history.observations()[0].bid.is_nan());
        assert_eq!(history.observations()[0].timestamp_iso, "");
    }

    #[test]
    fn test_non_array_document_is_empty() {
        assert!(decode_history(json!({"USDBRL": {}})).is_empty());
        assert!(decode_history(json!(null)).is_empty());
    }

    #[test]
    fn test_transport_error_mentions_status() {
        let err = LoadError::Transport {
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(err.to_string().contains("404"));
    }
}
