//! Scalar codecs.

use super::Codec;
use crate::error::{CodecError, CodecResult};
use crate::ops::{Number, ValueOps};

#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

/// 32-bit integer restricted to `min..=max`.
#[derive(Debug, Clone, Copy)]
pub struct IntCodec {
    min: i32,
    max: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LongCodec;

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleCodec;

pub const STRING: StringCodec = StringCodec;
pub const BOOL: BoolCodec = BoolCodec;
pub const INT: IntCodec = IntCodec {
    min: i32::MIN,
    max: i32::MAX,
};
pub const LONG: LongCodec = LongCodec;
pub const DOUBLE: DoubleCodec = DoubleCodec;

/// Integer codec accepting only `min..=max`, in both directions.
pub const fn int_range(min: i32, max: i32) -> IntCodec {
    IntCodec { min, max }
}

/// Integral value of a number; `5.0` qualifies, `5.5` does not.
fn integral<O: ValueOps>(ops: &O, input: &O::Value) -> CodecResult<i64> {
    ops.get_number_value(input)?
        .as_i64()
        .ok_or_else(|| CodecError::type_mismatch("integer", input))
}

impl Codec<String> for StringCodec {
    fn encode<O: ValueOps>(&self, ops: &O, input: &String, _prefix: O::Value) -> CodecResult<O::Value> {
        Ok(ops.create_string(input))
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<String> {
        ops.get_string_value(input)
    }
}

impl Codec<bool> for BoolCodec {
    fn encode<O: ValueOps>(&self, ops: &O, input: &bool, _prefix: O::Value) -> CodecResult<O::Value> {
        Ok(ops.create_boolean(*input))
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<bool> {
        ops.get_boolean_value(input)
    }
}

impl IntCodec {
    fn check(&self, value: i64) -> CodecResult<i32> {
        if value < i64::from(self.min) || value > i64::from(self.max) {
            return Err(CodecError::RangeViolation {
                value,
                min: i64::from(self.min),
                max: i64::from(self.max),
            });
        }
        // In range of two i32 bounds, so the narrowing is exact.
        Ok(value as i32)
    }
}

impl Codec<i32> for IntCodec {
    fn encode<O: ValueOps>(&self, ops: &O, input: &i32, _prefix: O::Value) -> CodecResult<O::Value> {
        let value = self.check(i64::from(*input))?;
        Ok(ops.create_numeric(Number::from(value)))
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<i32> {
        self.check(integral(ops, input)?)
    }
}

impl Codec<i64> for LongCodec {
    fn encode<O: ValueOps>(&self, ops: &O, input: &i64, _prefix: O::Value) -> CodecResult<O::Value> {
        Ok(ops.create_numeric(Number::from_i64(*input)))
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<i64> {
        integral(ops, input)
    }
}

impl Codec<f64> for DoubleCodec {
    fn encode<O: ValueOps>(&self, ops: &O, input: &f64, _prefix: O::Value) -> CodecResult<O::Value> {
        Ok(ops.create_numeric(Number::from_f64(*input)))
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<f64> {
        Ok(ops.get_number_value(input)?.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::JsonOps;
    use serde_json::json;

    #[test]
    fn test_int_range_rejects_out_of_bounds() {
        let codec = int_range(0, 100);
        assert_eq!(codec.decode(&JsonOps, &json!(42)).unwrap(), 42);
        assert_eq!(
            codec.decode(&JsonOps, &json!(101)),
            Err(CodecError::RangeViolation {
                value: 101,
                min: 0,
                max: 100
            })
        );
        assert!(matches!(
            codec.encode_start(&JsonOps, &-1),
            Err(CodecError::RangeViolation { value: -1, .. })
        ));
    }

    #[test]
    fn test_int_accepts_integral_float() {
        assert_eq!(INT.decode(&JsonOps, &json!(7.0)).unwrap(), 7);
        assert!(matches!(
            INT.decode(&JsonOps, &json!(7.5)),
            Err(CodecError::TypeMismatch { expected: "integer", .. })
        ));
    }

    #[test]
    fn test_int_rejects_long_values() {
        assert!(matches!(
            INT.decode(&JsonOps, &json!(5_000_000_000i64)),
            Err(CodecError::RangeViolation { .. })
        ));
        assert_eq!(
            LONG.decode(&JsonOps, &json!(5_000_000_000i64)).unwrap(),
            5_000_000_000
        );
    }

    #[test]
    fn test_scalars_ignore_prefix() {
        let encoded = STRING
            .encode(&JsonOps, &"x".to_string(), json!({"a": 1}))
            .unwrap();
        assert_eq!(encoded, json!("x"));
    }

    #[test]
    fn test_double_and_bool() {
        assert_eq!(DOUBLE.decode(&JsonOps, &json!(3)).unwrap(), 3.0);
        assert_eq!(DOUBLE.encode_start(&JsonOps, &-71.25).unwrap(), json!(-71.25));
        assert!(BOOL.decode(&JsonOps, &json!(true)).unwrap());
        assert!(BOOL.decode(&JsonOps, &json!("yes")).is_err());
    }
}
