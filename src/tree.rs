//! In-memory value model with explicit numeric widths.
//!
//! Unlike JSON, a [`Value::Number`] records which of byte/short/int/long/float/double
//! produced it, so converting JSON into this model shows whether a backend
//! widened numbers along the way.

use crate::error::{CodecError, CodecResult};
use crate::ops::{Number, ValueOps};
use indexmap::IndexMap;
use std::fmt;

/// Abstract tree value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{:?}:{}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// [`ValueOps`] over [`Value`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeOps;

impl ValueOps for TreeOps {
    type Value = Value;

    fn empty(&self) -> Value {
        Value::Null
    }

    fn is_empty(&self, input: &Value) -> bool {
        matches!(input, Value::Null)
    }

    fn create_string(&self, value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn create_boolean(&self, value: bool) -> Value {
        Value::Boolean(value)
    }

    fn create_numeric(&self, value: Number) -> Value {
        Value::Number(value)
    }

    fn get_string_value(&self, input: &Value) -> CodecResult<String> {
        match input {
            Value::String(s) => Ok(s.clone()),
            other => Err(CodecError::type_mismatch("string", other)),
        }
    }

    fn get_boolean_value(&self, input: &Value) -> CodecResult<bool> {
        match input {
            Value::Boolean(b) => Ok(*b),
            other => Err(CodecError::type_mismatch("boolean", other)),
        }
    }

    fn get_number_value(&self, input: &Value) -> CodecResult<Number> {
        match input {
            Value::Number(n) => Ok(*n),
            other => Err(CodecError::type_mismatch("number", other)),
        }
    }

    fn create_list<I>(&self, values: I) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        Value::List(values.into_iter().collect())
    }

    fn create_map<I>(&self, entries: I) -> Value
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Value::Map(entries.into_iter().collect())
    }

    fn merge_values_to_list(&self, list: Value, values: Vec<Value>) -> CodecResult<Value> {
        match list {
            Value::Null => Ok(Value::List(values)),
            Value::List(mut existing) => {
                existing.extend(values);
                Ok(Value::List(existing))
            }
            other => Err(CodecError::NotAList(other.to_string())),
        }
    }

    fn merge_entries_to_map(
        &self,
        map: Value,
        entries: Vec<(String, Value)>,
    ) -> CodecResult<Value> {
        let mut existing = match map {
            Value::Null => IndexMap::new(),
            Value::Map(existing) => existing,
            other => return Err(CodecError::NotAMap(other.to_string())),
        };
        existing.extend(entries);
        Ok(Value::Map(existing))
    }

    fn get_map_entries<'a>(&self, input: &'a Value) -> CodecResult<Vec<(&'a str, &'a Value)>> {
        match input {
            Value::Map(map) => Ok(map.iter().map(|(k, v)| (k.as_str(), v)).collect()),
            other => Err(CodecError::NotAMap(other.to_string())),
        }
    }

    fn get_stream<'a>(&self, input: &'a Value) -> CodecResult<Vec<&'a Value>> {
        match input {
            Value::List(values) => Ok(values.iter().collect()),
            other => Err(CodecError::NotAList(other.to_string())),
        }
    }

    fn remove(&self, input: Value, key: &str) -> Value {
        match input {
            Value::Map(mut map) => {
                map.shift_remove(key);
                Value::Map(map)
            }
            other => other,
        }
    }

    fn convert_to<U: ValueOps>(&self, out: &U, input: &Value) -> U::Value {
        match input {
            Value::Null => out.empty(),
            Value::Boolean(b) => out.create_boolean(*b),
            Value::Number(n) => out.create_numeric(*n),
            Value::String(s) => out.create_string(s),
            Value::List(values) => out.create_list(values.iter().map(|v| self.convert_to(out, v))),
            Value::Map(map) => out.create_map(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.convert_to(out, v))),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonOps;
    use serde_json::json;

    #[test]
    fn test_json_conversion_keeps_narrowest_width() {
        let json = json!({
            "byte": 5,
            "short": 1000,
            "int": 100_000,
            "long": 10_000_000_000i64,
            "float": 5.5,
            "double": 0.1,
            "list": [1, true, null, "x"]
        });

        let tree = JsonOps.convert_to(&TreeOps, &json);
        let map = TreeOps.get_map(&tree).unwrap();

        assert_eq!(map.get("byte"), Some(&Value::Number(Number::Byte(5))));
        assert_eq!(map.get("short"), Some(&Value::Number(Number::Short(1000))));
        assert_eq!(map.get("int"), Some(&Value::Number(Number::Int(100_000))));
        assert_eq!(
            map.get("long"),
            Some(&Value::Number(Number::Long(10_000_000_000)))
        );
        assert_eq!(map.get("float"), Some(&Value::Number(Number::Float(5.5))));
        assert_eq!(map.get("double"), Some(&Value::Number(Number::Double(0.1))));

        assert_eq!(TreeOps.convert_to(&JsonOps, &tree), json);
    }

    #[test]
    fn test_create_map_last_write_wins() {
        let map = TreeOps.create_map(vec![
            ("a".to_string(), Value::Boolean(true)),
            ("a".to_string(), Value::Boolean(false)),
        ]);
        assert_eq!(map.to_string(), "{\"a\":false}");
    }

    #[test]
    fn test_merge_onto_non_map_fails() {
        let result = TreeOps.merge_to_map(Value::String("x".into()), "a", Value::Null);
        assert_eq!(result, Err(CodecError::NotAMap("\"x\"".to_string())));
    }

    #[test]
    fn test_remove_shifts_entries() {
        let map = TreeOps.create_map(vec![
            ("a".to_string(), Value::Null),
            ("b".to_string(), Value::Null),
            ("c".to_string(), Value::Null),
        ]);
        let map = TreeOps.remove(map, "a");
        assert_eq!(map.to_string(), "{\"b\":null,\"c\":null}");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::List(vec![]).kind(), "list");
        assert_eq!(Value::default().kind(), "null");
    }
}
