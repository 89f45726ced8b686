use serde::{Deserialize, Deserializer};
use serde_json::Value;

// `?page=abc` falls back to the first page instead of rejecting the request
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(1))
}

pub fn default_page() -> i64 {
    1
}

// the web client posts select values as strings, so "2" and 2 are both accepted
pub fn int_from_json(value: Option<&Value>) -> Result<Option<i64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| format!("Wrong value {n}, can not convert to i64")),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(v) => Ok(Some(v)),
            Err(_) => Err(format!("Wrong value {s}, can not parse to i64")),
        },
        Some(other) => Err(format!("Wrong value {other}, expected an integer")),
    }
}

pub fn text_from_json(value: Option<&Value>) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!("Wrong value {other}, expected a string")),
    }
}
