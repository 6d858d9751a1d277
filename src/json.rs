//! [`ValueOps`] backend over `serde_json::Value`.
//!
//! Objects keep insertion order (`serde_json` is built with `preserve_order`),
//! so encoded responses list metadata before the per-address entries.

use crate::error::{CodecError, CodecResult};
use crate::ops::{Number, ValueOps};
use serde_json::{Map, Value as JsonValue};

/// Stateless JSON backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOps;

impl JsonOps {
    fn json_number(value: Number) -> JsonValue {
        let number = match value {
            Number::Byte(v) => Some(serde_json::Number::from(v)),
            Number::Short(v) => Some(serde_json::Number::from(v)),
            Number::Int(v) => Some(serde_json::Number::from(v)),
            Number::Long(v) => Some(serde_json::Number::from(v)),
            // Go through the shortest decimal form so 0.1f32 is written as 0.1,
            // not as its exact binary expansion.
            Number::Float(v) => v
                .to_string()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64),
            Number::Double(v) => serde_json::Number::from_f64(v),
        };
        number.map(JsonValue::Number).unwrap_or(JsonValue::Null)
    }

    fn number_of(value: &serde_json::Number) -> Number {
        if let Some(v) = value.as_i64() {
            Number::from_i64(v)
        } else if let Some(v) = value.as_f64() {
            // u64 beyond i64::MAX lands here too and keeps its magnitude.
            Number::from_f64(v)
        } else {
            Number::Double(f64::NAN)
        }
    }
}

impl ValueOps for JsonOps {
    type Value = JsonValue;

    fn empty(&self) -> JsonValue {
        JsonValue::Null
    }

    fn is_empty(&self, input: &JsonValue) -> bool {
        input.is_null()
    }

    fn create_string(&self, value: &str) -> JsonValue {
        JsonValue::String(value.to_string())
    }

    fn create_boolean(&self, value: bool) -> JsonValue {
        JsonValue::Bool(value)
    }

    fn create_numeric(&self, value: Number) -> JsonValue {
        Self::json_number(value)
    }

    fn get_string_value(&self, input: &JsonValue) -> CodecResult<String> {
        match input {
            JsonValue::String(s) => Ok(s.clone()),
            other => Err(CodecError::type_mismatch("string", other)),
        }
    }

    fn get_boolean_value(&self, input: &JsonValue) -> CodecResult<bool> {
        match input {
            JsonValue::Bool(b) => Ok(*b),
            other => Err(CodecError::type_mismatch("boolean", other)),
        }
    }

    fn get_number_value(&self, input: &JsonValue) -> CodecResult<Number> {
        match input {
            JsonValue::Number(n) => Ok(Self::number_of(n)),
            other => Err(CodecError::type_mismatch("number", other)),
        }
    }

    fn create_list<I>(&self, values: I) -> JsonValue
    where
        I: IntoIterator<Item = JsonValue>,
    {
        JsonValue::Array(values.into_iter().collect())
    }

    fn create_map<I>(&self, entries: I) -> JsonValue
    where
        I: IntoIterator<Item = (String, JsonValue)>,
    {
        let mut map = Map::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        JsonValue::Object(map)
    }

    fn merge_values_to_list(
        &self,
        list: JsonValue,
        values: Vec<JsonValue>,
    ) -> CodecResult<JsonValue> {
        match list {
            JsonValue::Null => Ok(JsonValue::Array(values)),
            JsonValue::Array(mut existing) => {
                existing.extend(values);
                Ok(JsonValue::Array(existing))
            }
            other => Err(CodecError::NotAList(other.to_string())),
        }
    }

    fn merge_entries_to_map(
        &self,
        map: JsonValue,
        entries: Vec<(String, JsonValue)>,
    ) -> CodecResult<JsonValue> {
        let mut existing = match map {
            JsonValue::Null => Map::new(),
            JsonValue::Object(existing) => existing,
            other => return Err(CodecError::NotAMap(other.to_string())),
        };
        for (key, value) in entries {
            existing.insert(key, value);
        }
        Ok(JsonValue::Object(existing))
    }

    fn get_map_entries<'a>(&self, input: &'a JsonValue) -> CodecResult<Vec<(&'a str, &'a JsonValue)>> {
        match input {
            JsonValue::Object(map) => Ok(map.iter().map(|(k, v)| (k.as_str(), v)).collect()),
            other => Err(CodecError::NotAMap(other.to_string())),
        }
    }

    fn get_stream<'a>(&self, input: &'a JsonValue) -> CodecResult<Vec<&'a JsonValue>> {
        match input {
            JsonValue::Array(values) => Ok(values.iter().collect()),
            other => Err(CodecError::NotAList(other.to_string())),
        }
    }

    fn remove(&self, input: JsonValue, key: &str) -> JsonValue {
        match input {
            // Rebuild rather than Map::remove, which swaps entries under preserve_order.
            JsonValue::Object(map) => {
                JsonValue::Object(map.into_iter().filter(|(k, _)| k != key).collect())
            }
            other => other,
        }
    }

    fn convert_to<U: ValueOps>(&self, out: &U, input: &JsonValue) -> U::Value {
        match input {
            JsonValue::Null => out.empty(),
            JsonValue::Bool(b) => out.create_boolean(*b),
            JsonValue::Number(n) => out.create_numeric(Self::number_of(n)),
            JsonValue::String(s) => out.create_string(s),
            JsonValue::Array(values) => {
                out.create_list(values.iter().map(|v| self.convert_to(out, v)))
            }
            JsonValue::Object(map) => out.create_map(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.convert_to(out, v))),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_width_survives_round_trip() {
        let ops = JsonOps;

        let int = ops.create_numeric(Number::from_i64(5));
        let float = ops.create_numeric(Number::from_f64(5.5));
        assert_eq!(int, json!(5));
        assert_eq!(float, json!(5.5));

        let int = ops.get_number_value(&int).unwrap();
        let float = ops.get_number_value(&float).unwrap();
        assert_eq!(int, Number::Byte(5));
        assert_eq!(float, Number::Float(5.5));
        assert!(int.is_integral());
        assert!(!float.is_integral());
    }

    #[test]
    fn test_float_written_in_shortest_form() {
        let ops = JsonOps;
        assert_eq!(ops.create_numeric(Number::Float(0.1)).to_string(), "0.1");
    }

    #[test]
    fn test_non_finite_becomes_null() {
        assert_eq!(JsonOps.create_numeric(Number::Double(f64::INFINITY)), JsonValue::Null);
    }

    #[test]
    fn test_large_numbers_keep_width() {
        let ops = JsonOps;
        assert_eq!(
            ops.get_number_value(&json!(3_000_000_000i64)).unwrap(),
            Number::Long(3_000_000_000)
        );
        assert_eq!(ops.get_number_value(&json!(300)).unwrap(), Number::Short(300));
        assert_eq!(ops.get_number_value(&json!(0.1)).unwrap(), Number::Double(0.1));
    }

    #[test]
    fn test_type_mismatch_names_value() {
        let error = JsonOps.get_string_value(&json!(12)).unwrap_err();
        assert_eq!(
            error,
            CodecError::TypeMismatch {
                expected: "string",
                found: "12".to_string()
            }
        );
        assert!(JsonOps.get_boolean_value(&json!("true")).is_err());
        assert!(JsonOps.get_number_value(&json!(null)).is_err());
    }

    #[test]
    fn test_create_map_last_write_wins() {
        let map = JsonOps.create_map(vec![
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!(2)),
            ("a".to_string(), json!(3)),
        ]);
        assert_eq!(map, json!({"a": 3, "b": 2}));
    }

    #[test]
    fn test_merge_into_null_and_existing() {
        let ops = JsonOps;
        let map = ops.merge_to_map(JsonValue::Null, "a", json!(1)).unwrap();
        let map = ops.merge_to_map(map, "b", json!(2)).unwrap();
        assert_eq!(map, json!({"a": 1, "b": 2}));

        let list = ops.merge_to_list(JsonValue::Null, json!(1)).unwrap();
        let list = ops.merge_values_to_list(list, vec![json!(2), json!(3)]).unwrap();
        assert_eq!(list, json!([1, 2, 3]));
    }

    #[test]
    fn test_merge_into_incompatible_value_fails() {
        let ops = JsonOps;
        assert!(matches!(
            ops.merge_to_map(json!([1]), "a", json!(1)),
            Err(CodecError::NotAMap(_))
        ));
        assert!(matches!(
            ops.merge_to_list(json!({"a": 1}), json!(1)),
            Err(CodecError::NotAList(_))
        ));
        assert!(matches!(ops.get_stream(&json!("x")), Err(CodecError::NotAList(_))));
        assert!(matches!(ops.get_map(&json!(1)), Err(CodecError::NotAMap(_))));
    }

    #[test]
    fn test_get_map_treats_null_as_absent() {
        let value = json!({"present": 1, "missing": null});
        let map = JsonOps.get_map(&value).unwrap();

        assert_eq!(map.get("present"), Some(&json!(1)));
        assert_eq!(map.get("missing"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let ops = JsonOps;
        let value = json!({"a": 1, "b": 2, "c": 3});
        let removed = ops.remove(value, "a");
        let keys: Vec<_> = ops
            .get_map_entries(&removed)
            .unwrap()
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(keys, vec!["b", "c"]);

        assert_eq!(ops.remove(json!(1), "a"), json!(1));
    }

    #[test]
    fn test_builder_first_error_wins() {
        let ops = JsonOps;
        let mut builder = ops.list_builder();
        builder.add(json!(1));
        builder.add_result(Err(CodecError::MissingField("first".to_string())));
        builder.add_result(Err(CodecError::MissingField("second".to_string())));
        builder.add(json!(2));

        assert_eq!(builder.len(), 2);
        let expected = Err(CodecError::MissingField("first".to_string()));
        assert_eq!(builder.build(&ops, JsonValue::Null), expected);
        assert_eq!(builder.build(&ops, JsonValue::Null), expected);
    }

    #[test]
    fn test_map_builder_overlays_prefix() {
        let ops = JsonOps;
        let mut builder = ops.map_builder();
        builder.add("b", json!(2)).add("a", json!(10));

        let merged = builder.finish(&ops, json!({"a": 1})).unwrap();
        assert_eq!(merged, json!({"a": 10, "b": 2}));
    }
}
