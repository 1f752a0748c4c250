use serde_json::Value as JsonValue;

use super::Value;
use crate::errors::{AggregateError, ValueError};
use crate::promise::{SettleStatus, SettledOutcome};

impl Value {
    /// Lossy JSON projection: promises and non-finite numbers map to null.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Undefined => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::List(items) => {
                JsonValue::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Outcome(outcome) => {
                let mut map = serde_json::Map::new();
                map.insert(
                    "status".into(),
                    JsonValue::String(outcome.status.to_string()),
                );
                map.insert("value".into(), outcome.value.to_json());
                JsonValue::Object(map)
            }
            Value::Aggregate(aggregate) => {
                let mut map = serde_json::Map::new();
                map.insert(
                    "errors".into(),
                    JsonValue::Array(aggregate.errors.iter().map(Value::to_json).collect()),
                );
                JsonValue::Object(map)
            }
            Value::Promise(_) => JsonValue::Null,
        }
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    pub fn parse_json(input: &str) -> Result<Value, ValueError> {
        let parsed: JsonValue =
            serde_json::from_str(input).map_err(|e| ValueError::JsonParse {
                message: e.to_string(),
            })?;
        Value::from_json(&parsed)
    }

    /// Inverse of `to_json` where one exists. Objects are only accepted in
    /// the two shapes `to_json` produces: outcome records and aggregates.
    pub fn from_json(value: &JsonValue) -> Result<Value, ValueError> {
        Ok(match value {
            JsonValue::Null => Value::Undefined,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::List(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            JsonValue::Object(map) => {
                if let (Some(JsonValue::String(status)), Some(value)) =
                    (map.get("status"), map.get("value"))
                {
                    let status = match status.as_str() {
                        "fulfilled" => SettleStatus::Fulfilled,
                        "rejected" => SettleStatus::Rejected,
                        other => {
                            return Err(ValueError::UnsupportedJson {
                                found: format!("outcome status {other:?}"),
                            });
                        }
                    };
                    return Ok(Value::Outcome(Box::new(SettledOutcome {
                        status,
                        value: Value::from_json(value)?,
                    })));
                }
                if let Some(JsonValue::Array(errors)) = map.get("errors") {
                    let errors = errors
                        .iter()
                        .map(Value::from_json)
                        .collect::<Result<Vec<_>, _>>()?;
                    return Ok(Value::Aggregate(AggregateError::new(errors)));
                }
                return Err(ValueError::UnsupportedJson {
                    found: "object".to_string(),
                });
            }
        })
    }
}
