//! Node values and the reserved root sentinel.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::domain::error::{TreeError, TreeResult};

/// Reserved value of the synthetic root. Never valid for user nodes.
pub const ROOT_VALUE: &str = "__ROOT__";

/// Scalar identifier of a node: text or a JSON number.
///
/// `"1"` and `1` are different values, mirroring the JSON input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    Text(String),
    Number(Number),
}

impl NodeValue {
    /// Converts a JSON scalar into a node value.
    ///
    /// `null`, booleans, arrays and objects are rejected, as is empty text.
    pub fn from_json(value: &Value) -> TreeResult<Self> {
        let parsed = match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Number(n) => Self::Number(n.clone()),
            Value::Null => return Err(TreeError::illegal("value is null")),
            other => {
                return Err(TreeError::illegal(format!(
                    "value must be a string or number, got {other}"
                )))
            }
        };
        if parsed.is_empty() {
            return Err(TreeError::illegal("value is empty"));
        }
        Ok(parsed)
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    pub fn is_root_value(&self) -> bool {
        matches!(self, Self::Text(s) if s == ROOT_VALUE)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub(crate) fn root() -> Self {
        Self::Text(ROOT_VALUE.to_string())
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for NodeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NodeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for NodeValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for NodeValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for NodeValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for NodeValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl PartialEq<str> for NodeValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for NodeValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_accepts_scalars() {
        assert_eq!(NodeValue::from_json(&json!("a")).unwrap(), NodeValue::from("a"));
        assert_eq!(NodeValue::from_json(&json!(7)).unwrap(), NodeValue::from(7));
        assert_eq!(NodeValue::from_json(&json!(0)).unwrap(), NodeValue::from(0));
    }

    #[test]
    fn test_from_json_rejects_nullish_and_compound() {
        for bad in [json!(null), json!(""), json!(true), json!([1]), json!({"a": 1})] {
            assert!(
                matches!(NodeValue::from_json(&bad), Err(TreeError::IllegalValue(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_text_and_number_are_distinct() {
        assert_ne!(NodeValue::from("1"), NodeValue::from(1));
        assert_eq!(NodeValue::from(1).to_string(), "1");
    }

    #[test]
    fn test_root_value_detection() {
        assert!(NodeValue::root().is_root_value());
        assert!(!NodeValue::from("root").is_root_value());
    }
}
