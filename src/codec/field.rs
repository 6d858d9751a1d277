//! Named field codecs and the accessor pairing used by records.

use super::{Codec, MapCodec};
use crate::error::{CodecError, CodecResult};
use crate::ops::{MapBuilder, MapLike, ValueOps};

/// Required field. Absent and `null` both decode to [`CodecError::MissingField`].
#[derive(Debug, Clone)]
pub struct FieldCodec<C> {
    name: &'static str,
    codec: C,
}

/// Optional field; absent or `null` decodes to `None`, `None` encodes to nothing.
///
/// A present value that fails its codec is still an error.
#[derive(Debug, Clone)]
pub struct OptionalFieldCodec<C> {
    name: &'static str,
    codec: C,
}

/// Optional field that falls back to a default value when absent.
#[derive(Debug, Clone)]
pub struct DefaultFieldCodec<C, T> {
    name: &'static str,
    codec: C,
    default: T,
}

impl<C> FieldCodec<C> {
    pub fn new(name: &'static str, codec: C) -> Self {
        Self { name, codec }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<C> OptionalFieldCodec<C> {
    pub fn new(name: &'static str, codec: C) -> Self {
        Self { name, codec }
    }
}

impl<C, T> DefaultFieldCodec<C, T> {
    pub fn new(name: &'static str, codec: C, default: T) -> Self {
        Self {
            name,
            codec,
            default,
        }
    }
}

fn encode_entry<T, C, O>(
    name: &'static str,
    codec: &C,
    ops: &O,
    input: &T,
    builder: &mut MapBuilder<O::Value>,
) where
    C: Codec<T>,
    O: ValueOps,
{
    builder.add_result(
        name,
        codec
            .encode_start(ops, input)
            .map_err(|e| e.at_field(name)),
    );
}

impl<T, C: Codec<T>> MapCodec<T> for FieldCodec<C> {
    fn keys(&self) -> Vec<&'static str> {
        vec![self.name]
    }

    fn decode_map<O: ValueOps>(&self, ops: &O, input: &MapLike<'_, O::Value>) -> CodecResult<T> {
        let value = input
            .get(self.name)
            .ok_or_else(|| CodecError::MissingField(self.name.to_string()))?;
        self.codec
            .decode(ops, value)
            .map_err(|e| e.at_field(self.name))
    }

    fn encode_map<O: ValueOps>(&self, ops: &O, input: &T, builder: &mut MapBuilder<O::Value>) {
        encode_entry(self.name, &self.codec, ops, input, builder);
    }
}

impl<T, C: Codec<T>> MapCodec<Option<T>> for OptionalFieldCodec<C> {
    fn keys(&self) -> Vec<&'static str> {
        vec![self.name]
    }

    fn decode_map<O: ValueOps>(
        &self,
        ops: &O,
        input: &MapLike<'_, O::Value>,
    ) -> CodecResult<Option<T>> {
        input
            .get(self.name)
            .map(|value| {
                self.codec
                    .decode(ops, value)
                    .map_err(|e| e.at_field(self.name))
            })
            .transpose()
    }

    fn encode_map<O: ValueOps>(
        &self,
        ops: &O,
        input: &Option<T>,
        builder: &mut MapBuilder<O::Value>,
    ) {
        if let Some(value) = input {
            encode_entry(self.name, &self.codec, ops, value, builder);
        }
    }
}

impl<T: Clone, C: Codec<T>> MapCodec<T> for DefaultFieldCodec<C, T> {
    fn keys(&self) -> Vec<&'static str> {
        vec![self.name]
    }

    fn decode_map<O: ValueOps>(&self, ops: &O, input: &MapLike<'_, O::Value>) -> CodecResult<T> {
        match input.get(self.name) {
            Some(value) => self
                .codec
                .decode(ops, value)
                .map_err(|e| e.at_field(self.name)),
            None => Ok(self.default.clone()),
        }
    }

    fn encode_map<O: ValueOps>(&self, ops: &O, input: &T, builder: &mut MapBuilder<O::Value>) {
        encode_entry(self.name, &self.codec, ops, input, builder);
    }
}

/// A map codec paired with the accessor reading its value from a record `T`.
pub struct Field<T, A, M> {
    pub(crate) codec: M,
    pub(crate) getter: fn(&T) -> &A,
}

impl<T, A, M> Field<T, A, M> {
    pub fn new(codec: M, getter: fn(&T) -> &A) -> Self {
        Self { codec, getter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecExt, INT, STRING};
    use crate::json::JsonOps;
    use serde_json::json;

    fn decode<T, M: MapCodec<T>>(codec: &M, value: serde_json::Value) -> CodecResult<T> {
        let map = JsonOps.get_map(&value)?;
        codec.decode_map(&JsonOps, &map)
    }

    fn encode<T, M: MapCodec<T>>(codec: &M, input: &T) -> CodecResult<serde_json::Value> {
        let mut builder = JsonOps.map_builder();
        codec.encode_map(&JsonOps, input, &mut builder);
        builder.finish(&JsonOps, serde_json::Value::Null)
    }

    #[test]
    fn test_required_field() {
        let codec = STRING.field_of("name");

        assert_eq!(decode(&codec, json!({"name": "x"})).unwrap(), "x");
        assert_eq!(
            decode(&codec, json!({})),
            Err(CodecError::MissingField("name".to_string()))
        );
        assert_eq!(
            decode(&codec, json!({"name": null})),
            Err(CodecError::MissingField("name".to_string()))
        );

        let error = decode(&codec, json!({"name": 1})).unwrap_err();
        assert_eq!(error.path_string(), ".name");
        assert!(matches!(error.root_cause(), CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn test_optional_field() {
        let codec = STRING.optional_field_of("hostname");

        assert_eq!(decode(&codec, json!({})).unwrap(), None);
        assert_eq!(decode(&codec, json!({"hostname": null})).unwrap(), None);
        assert_eq!(
            decode(&codec, json!({"hostname": "h"})).unwrap(),
            Some("h".to_string())
        );
        assert!(decode(&codec, json!({"hostname": false})).is_err());

        assert_eq!(encode(&codec, &None).unwrap(), json!({}));
        assert_eq!(
            encode(&codec, &Some("h".to_string())).unwrap(),
            json!({"hostname": "h"})
        );
    }

    #[test]
    fn test_default_field_always_encoded() {
        let codec = INT.optional_field_of_or("risk", 0);

        assert_eq!(decode(&codec, json!({})).unwrap(), 0);
        assert_eq!(decode(&codec, json!({"risk": 33})).unwrap(), 33);
        assert_eq!(encode(&codec, &0).unwrap(), json!({"risk": 0}));
    }

    #[test]
    fn test_encode_failure_is_attributed() {
        let codec = crate::codec::int_range(0, 10).field_of("score");
        let error = encode(&codec, &11).unwrap_err();
        assert_eq!(error.path_string(), ".score");
    }

    #[test]
    fn test_keys() {
        assert_eq!(MapCodec::<String>::keys(&STRING.field_of("a")), vec!["a"]);
        assert_eq!(
            MapCodec::<Option<String>>::keys(&STRING.optional_field_of("b")),
            vec!["b"]
        );
    }
}
