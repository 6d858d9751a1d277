//! Bidirectional codecs between domain types and [`ValueOps`] trees.
//!
//! A [`Codec`] converts a whole value. A [`MapCodec`] only reads and writes
//! its own named keys of an enclosing map, which is what lets several of
//! them share one object (record fields, response metadata next to the
//! per-address results).
//!
//! Codecs hold no mutable state and can be shared between threads.

mod combinator;
mod common;
mod field;
mod primitive;
mod record;

pub use combinator::{
    either, ComapFlatMap, FlatXMap, ListCodec, MapCodecAdapter, UnboundedMapCodec, UnionCodec,
    XMap,
};
pub use common::{asn, inet_address, instant};
pub use field::{DefaultFieldCodec, Field, FieldCodec, OptionalFieldCodec};
pub use primitive::{
    int_range, BoolCodec, DoubleCodec, IntCodec, LongCodec, StringCodec, BOOL, DOUBLE, INT, LONG,
    STRING,
};
pub use record::{record, try_record, Fields, RecordCodec};

use crate::error::CodecResult;
use crate::ops::{MapBuilder, MapLike, ValueOps};
use std::collections::BTreeSet;
use std::fmt;

/// Conversion between `T` and a tree value of any backend.
pub trait Codec<T> {
    /// Encode `input`, merging onto `prefix` where the shape allows it.
    ///
    /// Scalar codecs ignore the prefix; map-shaped codecs overlay their
    /// entries onto it.
    fn encode<O: ValueOps>(&self, ops: &O, input: &T, prefix: O::Value) -> CodecResult<O::Value>;

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<T>;

    /// Encode onto the backend's empty value.
    fn encode_start<O: ValueOps>(&self, ops: &O, input: &T) -> CodecResult<O::Value> {
        self.encode(ops, input, ops.empty())
    }
}

/// Codec confined to a fixed set of keys of an enclosing map.
pub trait MapCodec<T> {
    /// Every key this codec may read or write.
    fn keys(&self) -> Vec<&'static str>;

    /// Decode from a map view. Keys outside of [`MapCodec::keys`] are ignored.
    fn decode_map<O: ValueOps>(&self, ops: &O, input: &MapLike<'_, O::Value>) -> CodecResult<T>;

    /// Add this codec's entries to `builder`. Failures are recorded in the builder.
    fn encode_map<O: ValueOps>(&self, ops: &O, input: &T, builder: &mut MapBuilder<O::Value>);
}

/// Combinators available on every [`Codec`].
pub trait CodecExt<A>: Codec<A> + Sized {
    /// Required field `name`.
    fn field_of(self, name: &'static str) -> FieldCodec<Self> {
        FieldCodec::new(name, self)
    }

    /// Optional field `name`; absence decodes to `None`.
    fn optional_field_of(self, name: &'static str) -> OptionalFieldCodec<Self> {
        OptionalFieldCodec::new(name, self)
    }

    /// Optional field `name`; absence decodes to `default`. Always encoded.
    fn optional_field_of_or(self, name: &'static str, default: A) -> DefaultFieldCodec<Self, A> {
        DefaultFieldCodec::new(name, self, default)
    }

    /// Total conversion in both directions.
    fn xmap<B>(self, to: fn(A) -> B, from: fn(&B) -> A) -> XMap<Self, A, B> {
        XMap::new(self, to, from)
    }

    /// Fallible decode, total encode. Decode failures name the raw input.
    fn comap_flat_map<B, E>(
        self,
        to: fn(A) -> Result<B, E>,
        from: fn(&B) -> A,
    ) -> ComapFlatMap<Self, A, B, E>
    where
        A: fmt::Display,
        E: fmt::Display,
    {
        ComapFlatMap::new(self, to, from)
    }

    /// Fallible in both directions; errors pass through unchanged.
    fn flat_xmap<B>(
        self,
        to: fn(A) -> CodecResult<B>,
        from: fn(&B) -> CodecResult<A>,
    ) -> FlatXMap<Self, A, B> {
        FlatXMap::new(self, to, from)
    }

    fn list_of(self) -> ListCodec<Self> {
        ListCodec::new(self)
    }

    /// Set carried as a list. Encodes in ascending order; duplicates collapse on decode.
    fn set_of(self) -> XMap<ListCodec<Self>, Vec<A>, BTreeSet<A>>
    where
        A: Ord + Clone,
    {
        self.list_of().xmap(
            |values: Vec<A>| values.into_iter().collect(),
            |set: &BTreeSet<A>| set.iter().cloned().collect(),
        )
    }

    /// Map from arbitrary keys, each carried as a string through `key_codec`.
    fn unbounded_map_of<K, KC>(self, key_codec: KC) -> UnboundedMapCodec<KC, Self>
    where
        K: Ord,
        KC: Codec<K>,
    {
        UnboundedMapCodec::new(key_codec, self)
    }
}

impl<A, C: Codec<A>> CodecExt<A> for C {}

/// Combinators available on every [`MapCodec`].
pub trait MapCodecExt<A>: MapCodec<A> + Sized {
    /// Pair this codec with the accessor that reads its value out of `T`.
    fn for_getter<T>(self, getter: fn(&T) -> &A) -> Field<T, A, Self> {
        Field::new(self, getter)
    }

    /// Treat this map codec as a codec of the whole map value.
    fn codec(self) -> MapCodecAdapter<Self> {
        MapCodecAdapter::new(self)
    }
}

impl<A, M: MapCodec<A>> MapCodecExt<A> for M {}

/// Decode a whole map value through a [`MapCodec`].
pub(crate) fn decode_via_map<T, M, O>(codec: &M, ops: &O, input: &O::Value) -> CodecResult<T>
where
    M: MapCodec<T>,
    O: ValueOps,
{
    let map = ops.get_map(input)?;
    codec.decode_map(ops, &map)
}

/// Encode through a [`MapCodec`], overlaying the entries onto `prefix`.
pub(crate) fn encode_via_map<T, M, O>(
    codec: &M,
    ops: &O,
    input: &T,
    prefix: O::Value,
) -> CodecResult<O::Value>
where
    M: MapCodec<T>,
    O: ValueOps,
{
    let mut builder = ops.map_builder();
    codec.encode_map(ops, input, &mut builder);
    builder.finish(ops, prefix)
}
