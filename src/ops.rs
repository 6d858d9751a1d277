//! Abstraction over tree-shaped serialized values.
//!
//! Codecs never touch a concrete format. They construct and inspect values
//! through [`ValueOps`], which a backend (JSON, the in-memory [`crate::tree`]
//! model) implements for its own value type.

use crate::error::{CodecError, CodecResult};
use std::fmt;

/// A number that remembers the narrowest type able to hold it exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// Narrowest integer variant holding `value`.
    pub fn from_i64(value: i64) -> Self {
        if let Ok(v) = i8::try_from(value) {
            Number::Byte(v)
        } else if let Ok(v) = i16::try_from(value) {
            Number::Short(v)
        } else if let Ok(v) = i32::try_from(value) {
            Number::Int(v)
        } else {
            Number::Long(value)
        }
    }

    /// `Float` when the value survives an `f32` round trip, `Double` otherwise.
    pub fn from_f64(value: f64) -> Self {
        let narrow = value as f32;
        if f64::from(narrow) == value {
            Number::Float(narrow)
        } else {
            Number::Double(value)
        }
    }

    /// Re-derive the narrowest variant of the same class (integral or floating).
    pub fn narrowed(self) -> Self {
        match self {
            Number::Float(v) => Number::from_f64(f64::from(v)),
            Number::Double(v) => Number::from_f64(v),
            other => match other.as_i64() {
                Some(v) => Number::from_i64(v),
                None => other,
            },
        }
    }

    pub fn is_integral(&self) -> bool {
        !matches!(self, Number::Float(_) | Number::Double(_))
    }

    /// Integer value, if the number has no fractional part and fits `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Byte(v) => Some(i64::from(v)),
            Number::Short(v) => Some(i64::from(v)),
            Number::Int(v) => Some(i64::from(v)),
            Number::Long(v) => Some(v),
            Number::Float(v) => integral_f64(f64::from(v)),
            Number::Double(v) => integral_f64(v),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Byte(v) => f64::from(v),
            Number::Short(v) => f64::from(v),
            Number::Int(v) => f64::from(v),
            Number::Long(v) => v as f64,
            Number::Float(v) => f64::from(v),
            Number::Double(v) => v,
        }
    }
}

fn integral_f64(value: f64) -> Option<i64> {
    // 2^63 is exactly representable, anything at or above it overflows i64.
    if value.is_finite() && value.fract() == 0.0 && value >= -(2f64.powi(63)) && value < 2f64.powi(63) {
        Some(value as i64)
    } else {
        None
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Byte(v) => write!(f, "{}", v),
            Number::Short(v) => write!(f, "{}", v),
            Number::Int(v) => write!(f, "{}", v),
            Number::Long(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{}", v),
            Number::Double(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::from_i64(i64::from(value))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::from_i64(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
    }
}

/// Read-only view of a map value.
///
/// Entries whose value is the backend's empty value stay visible through
/// [`MapLike::entries`] but are treated as absent by [`MapLike::get`].
#[derive(Debug, Clone)]
pub struct MapLike<'a, V> {
    entries: Vec<(&'a str, &'a V, bool)>,
}

impl<'a, V> MapLike<'a, V> {
    /// Build a view from `(key, value, is_empty)` triples.
    pub fn new(entries: Vec<(&'a str, &'a V, bool)>) -> Self {
        Self { entries }
    }

    /// Value under `key`, ignoring empty (null) values.
    pub fn get(&self, key: &str) -> Option<&'a V> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _, _)| *k == key)
            .and_then(|(_, v, empty)| if *empty { None } else { Some(*v) })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Every entry in wire order, empty values included.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a V)> + '_ {
        self.entries.iter().map(|(k, v, _)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Incrementally collects list elements.
///
/// The first failed element puts the builder into an error state that every
/// later [`ListBuilder::build`] reports. Elements added afterwards are still
/// collected.
#[derive(Debug, Clone)]
pub struct ListBuilder<V> {
    values: Vec<V>,
    error: Option<CodecError>,
}

impl<V: Clone> ListBuilder<V> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            error: None,
        }
    }

    pub fn add(&mut self, value: V) -> &mut Self {
        self.values.push(value);
        self
    }

    pub fn add_result(&mut self, value: CodecResult<V>) -> &mut Self {
        match value {
            Ok(value) => self.add(value),
            Err(error) => self.fail(error),
        }
    }

    /// Record a failure without adding an element.
    pub fn fail(&mut self, error: CodecError) -> &mut Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }

    pub fn error(&self) -> Option<&CodecError> {
        self.error.as_ref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append the collected elements to `prefix`, which must be a list or empty.
    pub fn build<O: ValueOps<Value = V>>(&self, ops: &O, prefix: V) -> CodecResult<V> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        ops.merge_values_to_list(prefix, self.values.clone())
    }

    /// Like [`ListBuilder::build`], consuming the builder.
    pub fn finish<O: ValueOps<Value = V>>(self, ops: &O, prefix: V) -> CodecResult<V> {
        match self.error {
            Some(error) => Err(error),
            None => ops.merge_values_to_list(prefix, self.values),
        }
    }
}

impl<V: Clone> Default for ListBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Incrementally collects map entries, with the same error policy as
/// [`ListBuilder`].
#[derive(Debug, Clone)]
pub struct MapBuilder<V> {
    entries: Vec<(String, V)>,
    error: Option<CodecError>,
}

impl<V: Clone> MapBuilder<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            error: None,
        }
    }

    pub fn add(&mut self, key: impl Into<String>, value: V) -> &mut Self {
        self.entries.push((key.into(), value));
        self
    }

    pub fn add_result(&mut self, key: impl Into<String>, value: CodecResult<V>) -> &mut Self {
        match value {
            Ok(value) => self.add(key, value),
            Err(error) => self.fail(error),
        }
    }

    pub fn fail(&mut self, error: CodecError) -> &mut Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }

    pub fn error(&self) -> Option<&CodecError> {
        self.error.as_ref()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Overlay the collected entries onto `prefix`, which must be a map or empty.
    pub fn build<O: ValueOps<Value = V>>(&self, ops: &O, prefix: V) -> CodecResult<V> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        ops.merge_entries_to_map(prefix, self.entries.clone())
    }

    pub fn finish<O: ValueOps<Value = V>>(self, ops: &O, prefix: V) -> CodecResult<V> {
        match self.error {
            Some(error) => Err(error),
            None => ops.merge_entries_to_map(prefix, self.entries),
        }
    }
}

impl<V: Clone> Default for MapBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Construction and inspection of an opaque tree value type.
///
/// Implementations are stateless; every method is a pure function of its
/// arguments.
pub trait ValueOps {
    type Value: Clone + PartialEq + fmt::Debug + fmt::Display;

    /// The canonical absent value.
    fn empty(&self) -> Self::Value;

    fn is_empty(&self, input: &Self::Value) -> bool;

    fn create_string(&self, value: &str) -> Self::Value;

    fn create_boolean(&self, value: bool) -> Self::Value;

    fn create_numeric(&self, value: Number) -> Self::Value;

    fn get_string_value(&self, input: &Self::Value) -> CodecResult<String>;

    fn get_boolean_value(&self, input: &Self::Value) -> CodecResult<bool>;

    fn get_number_value(&self, input: &Self::Value) -> CodecResult<Number>;

    fn create_list<I>(&self, values: I) -> Self::Value
    where
        I: IntoIterator<Item = Self::Value>;

    /// Build a map; a repeated key keeps its last value.
    fn create_map<I>(&self, entries: I) -> Self::Value
    where
        I: IntoIterator<Item = (String, Self::Value)>;

    fn merge_values_to_list(
        &self,
        list: Self::Value,
        values: Vec<Self::Value>,
    ) -> CodecResult<Self::Value>;

    fn merge_to_list(&self, list: Self::Value, value: Self::Value) -> CodecResult<Self::Value> {
        self.merge_values_to_list(list, vec![value])
    }

    fn merge_entries_to_map(
        &self,
        map: Self::Value,
        entries: Vec<(String, Self::Value)>,
    ) -> CodecResult<Self::Value>;

    fn merge_to_map(
        &self,
        map: Self::Value,
        key: &str,
        value: Self::Value,
    ) -> CodecResult<Self::Value> {
        self.merge_entries_to_map(map, vec![(key.to_string(), value)])
    }

    /// All entries of a map value, in order.
    fn get_map_entries<'a>(&self, input: &'a Self::Value)
        -> CodecResult<Vec<(&'a str, &'a Self::Value)>>;

    /// Keyed view over a map value.
    fn get_map<'a>(&self, input: &'a Self::Value) -> CodecResult<MapLike<'a, Self::Value>> {
        let entries = self.get_map_entries(input)?;
        Ok(MapLike::new(
            entries
                .into_iter()
                .map(|(k, v)| (k, v, self.is_empty(v)))
                .collect(),
        ))
    }

    /// Elements of a list value, in order.
    fn get_stream<'a>(&self, input: &'a Self::Value) -> CodecResult<Vec<&'a Self::Value>>;

    /// `input` without `key`; non-map values are returned unchanged.
    fn remove(&self, input: Self::Value, key: &str) -> Self::Value;

    /// Re-express `input` in another backend.
    fn convert_to<U: ValueOps>(&self, out: &U, input: &Self::Value) -> U::Value;

    fn list_builder(&self) -> ListBuilder<Self::Value> {
        ListBuilder::new()
    }

    fn map_builder(&self) -> MapBuilder<Self::Value> {
        MapBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_narrowest_integer() {
        assert_eq!(Number::from_i64(5), Number::Byte(5));
        assert_eq!(Number::from_i64(-129), Number::Short(-129));
        assert_eq!(Number::from_i64(40_000), Number::Int(40_000));
        assert_eq!(Number::from_i64(1 << 40), Number::Long(1 << 40));
    }

    #[test]
    fn test_number_float_preferred_when_exact() {
        assert_eq!(Number::from_f64(5.5), Number::Float(5.5));
        assert_eq!(Number::from_f64(0.1), Number::Double(0.1));
    }

    #[test]
    fn test_number_integral_vs_floating_class() {
        assert!(Number::from_i64(5).is_integral());
        assert!(!Number::from_f64(5.5).is_integral());
    }

    #[test]
    fn test_number_as_i64() {
        assert_eq!(Number::Double(12.0).as_i64(), Some(12));
        assert_eq!(Number::Double(12.5).as_i64(), None);
        assert_eq!(Number::Double(f64::NAN).as_i64(), None);
        assert_eq!(Number::Double(1e19).as_i64(), None);
        assert_eq!(Number::Long(i64::MIN).as_i64(), Some(i64::MIN));
    }

    #[test]
    fn test_number_narrowed() {
        assert_eq!(Number::Long(7).narrowed(), Number::Byte(7));
        assert_eq!(Number::Double(2.25).narrowed(), Number::Float(2.25));
    }

    #[test]
    fn test_map_like_skips_empty_values() {
        let a = 1;
        let b = 0;
        let view = MapLike::new(vec![("a", &a, false), ("b", &b, true)]);

        assert_eq!(view.get("a"), Some(&1));
        assert_eq!(view.get("b"), None);
        assert!(!view.contains_key("c"));
        assert_eq!(view.entries().count(), 2);
    }
}
