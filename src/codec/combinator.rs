//! Derived codecs: transforms, lists, dynamic maps and unions.

use super::{decode_via_map, encode_via_map, Codec, MapCodec};
use crate::error::{CodecError, CodecResult};
use crate::ops::{MapBuilder, MapLike, ValueOps};
use ::either::Either;
use std::collections::BTreeMap;
use std::fmt;

/// Total mapping `A <-> B` over a `Codec<A>`.
pub struct XMap<C, A, B> {
    codec: C,
    to: fn(A) -> B,
    from: fn(&B) -> A,
}

impl<C, A, B> XMap<C, A, B> {
    pub fn new(codec: C, to: fn(A) -> B, from: fn(&B) -> A) -> Self {
        Self { codec, to, from }
    }
}

impl<C: Codec<A>, A, B> Codec<B> for XMap<C, A, B> {
    fn encode<O: ValueOps>(&self, ops: &O, input: &B, prefix: O::Value) -> CodecResult<O::Value> {
        self.codec.encode(ops, &(self.from)(input), prefix)
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<B> {
        self.codec.decode(ops, input).map(self.to)
    }
}

/// Validated decode over a `Codec<A>`; used for textual formats.
pub struct ComapFlatMap<C, A, B, E> {
    codec: C,
    to: fn(A) -> Result<B, E>,
    from: fn(&B) -> A,
}

impl<C, A, B, E> ComapFlatMap<C, A, B, E> {
    pub fn new(codec: C, to: fn(A) -> Result<B, E>, from: fn(&B) -> A) -> Self {
        Self { codec, to, from }
    }
}

impl<C, A, B, E> Codec<B> for ComapFlatMap<C, A, B, E>
where
    C: Codec<A>,
    A: fmt::Display,
    E: fmt::Display,
{
    fn encode<O: ValueOps>(&self, ops: &O, input: &B, prefix: O::Value) -> CodecResult<O::Value> {
        self.codec.encode(ops, &(self.from)(input), prefix)
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<B> {
        let raw = self.codec.decode(ops, input)?;
        let rendered = raw.to_string();
        (self.to)(raw).map_err(|reason| CodecError::parse(rendered, reason))
    }
}

/// Fallible mapping in both directions over a `Codec<A>`.
pub struct FlatXMap<C, A, B> {
    codec: C,
    to: fn(A) -> CodecResult<B>,
    from: fn(&B) -> CodecResult<A>,
}

impl<C, A, B> FlatXMap<C, A, B> {
    pub fn new(codec: C, to: fn(A) -> CodecResult<B>, from: fn(&B) -> CodecResult<A>) -> Self {
        Self { codec, to, from }
    }
}

impl<C: Codec<A>, A, B> Codec<B> for FlatXMap<C, A, B> {
    fn encode<O: ValueOps>(&self, ops: &O, input: &B, prefix: O::Value) -> CodecResult<O::Value> {
        self.codec.encode(ops, &(self.from)(input)?, prefix)
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<B> {
        self.codec.decode(ops, input).and_then(self.to)
    }
}

/// Homogeneous list. Decoding stops at the first bad element.
#[derive(Debug, Clone)]
pub struct ListCodec<C> {
    codec: C,
}

impl<C> ListCodec<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }
}

impl<A, C: Codec<A>> Codec<Vec<A>> for ListCodec<C> {
    fn encode<O: ValueOps>(&self, ops: &O, input: &Vec<A>, prefix: O::Value) -> CodecResult<O::Value> {
        let mut builder = ops.list_builder();
        for (index, value) in input.iter().enumerate() {
            builder.add_result(
                self.codec
                    .encode_start(ops, value)
                    .map_err(|e| e.at_index(index)),
            );
        }
        builder.finish(ops, prefix)
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<Vec<A>> {
        ops.get_stream(input)?
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                self.codec
                    .decode(ops, value)
                    .map_err(|e| e.at_index(index))
            })
            .collect()
    }
}

/// Map with data-dependent keys, each key carried as a string.
///
/// A key rejected by the key codec fails the whole decode.
#[derive(Debug, Clone)]
pub struct UnboundedMapCodec<KC, VC> {
    key_codec: KC,
    value_codec: VC,
}

impl<KC, VC> UnboundedMapCodec<KC, VC> {
    pub fn new(key_codec: KC, value_codec: VC) -> Self {
        Self {
            key_codec,
            value_codec,
        }
    }

    /// Decode from already enumerated entries.
    pub(crate) fn decode_entries<'a, K, V, O, I>(&self, ops: &O, entries: I) -> CodecResult<BTreeMap<K, V>>
    where
        K: Ord,
        KC: Codec<K>,
        VC: Codec<V>,
        O: ValueOps,
        O::Value: 'a,
        I: IntoIterator<Item = (&'a str, &'a O::Value)>,
    {
        let mut decoded = BTreeMap::new();
        for (key, value) in entries {
            let decoded_key = self
                .key_codec
                .decode(ops, &ops.create_string(key))
                .map_err(|source| CodecError::KeyDecodeFailure {
                    key: key.to_string(),
                    source: Box::new(source),
                })?;
            let decoded_value = self
                .value_codec
                .decode(ops, value)
                .map_err(|e| e.at_key(key))?;
            decoded.insert(decoded_key, decoded_value);
        }
        Ok(decoded)
    }

    /// Add every entry of `input` to `builder`.
    pub(crate) fn encode_entries<K, V, O>(
        &self,
        ops: &O,
        input: &BTreeMap<K, V>,
        builder: &mut MapBuilder<O::Value>,
    ) where
        KC: Codec<K>,
        VC: Codec<V>,
        O: ValueOps,
    {
        for (key, value) in input {
            let key = match self
                .key_codec
                .encode_start(ops, key)
                .and_then(|encoded| ops.get_string_value(&encoded))
            {
                Ok(key) => key,
                Err(error) => {
                    builder.fail(error);
                    continue;
                }
            };
            let value = self
                .value_codec
                .encode_start(ops, value)
                .map_err(|e| e.at_key(&key));
            builder.add_result(key, value);
        }
    }
}

impl<K, V, KC, VC> Codec<BTreeMap<K, V>> for UnboundedMapCodec<KC, VC>
where
    K: Ord,
    KC: Codec<K>,
    VC: Codec<V>,
{
    fn encode<O: ValueOps>(
        &self,
        ops: &O,
        input: &BTreeMap<K, V>,
        prefix: O::Value,
    ) -> CodecResult<O::Value> {
        let mut builder = ops.map_builder();
        self.encode_entries(ops, input, &mut builder);
        builder.finish(ops, prefix)
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<BTreeMap<K, V>> {
        let entries = ops.get_map_entries(input)?;
        self.decode_entries(ops, entries)
    }
}

/// Sum of two codecs. Decode tries `left` then `right`; encode follows `select`.
pub struct UnionCodec<LC, RC, T, L, R> {
    left: LC,
    right: RC,
    from_left: fn(L) -> T,
    from_right: fn(R) -> T,
    select: fn(&T) -> Either<&L, &R>,
}

/// Build a [`UnionCodec`].
pub fn either<LC, RC, T, L, R>(
    left: LC,
    right: RC,
    from_left: fn(L) -> T,
    from_right: fn(R) -> T,
    select: fn(&T) -> Either<&L, &R>,
) -> UnionCodec<LC, RC, T, L, R>
where
    LC: Codec<L>,
    RC: Codec<R>,
{
    UnionCodec {
        left,
        right,
        from_left,
        from_right,
        select,
    }
}

impl<LC, RC, T, L, R> Codec<T> for UnionCodec<LC, RC, T, L, R>
where
    LC: Codec<L>,
    RC: Codec<R>,
{
    fn encode<O: ValueOps>(&self, ops: &O, input: &T, prefix: O::Value) -> CodecResult<O::Value> {
        match (self.select)(input) {
            Either::Left(value) => self.left.encode(ops, value, prefix),
            Either::Right(value) => self.right.encode(ops, value, prefix),
        }
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<T> {
        let first = match self.left.decode(ops, input) {
            Ok(value) => return Ok((self.from_left)(value)),
            Err(error) => error,
        };
        match self.right.decode(ops, input) {
            Ok(value) => Ok((self.from_right)(value)),
            Err(second) => Err(CodecError::UnionExhausted {
                first: Box::new(first),
                second: Box::new(second),
            }),
        }
    }
}

/// A [`MapCodec`] viewed as a codec of the whole map value.
#[derive(Debug, Clone)]
pub struct MapCodecAdapter<M> {
    codec: M,
}

impl<M> MapCodecAdapter<M> {
    pub fn new(codec: M) -> Self {
        Self { codec }
    }
}

impl<T, M: MapCodec<T>> Codec<T> for MapCodecAdapter<M> {
    fn encode<O: ValueOps>(&self, ops: &O, input: &T, prefix: O::Value) -> CodecResult<O::Value> {
        encode_via_map(&self.codec, ops, input, prefix)
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<T> {
        decode_via_map(&self.codec, ops, input)
    }
}

impl<T, M: MapCodec<T>> MapCodec<T> for MapCodecAdapter<M> {
    fn keys(&self) -> Vec<&'static str> {
        self.codec.keys()
    }

    fn decode_map<O: ValueOps>(&self, ops: &O, input: &MapLike<'_, O::Value>) -> CodecResult<T> {
        self.codec.decode_map(ops, input)
    }

    fn encode_map<O: ValueOps>(&self, ops: &O, input: &T, builder: &mut MapBuilder<O::Value>) {
        self.codec.encode_map(ops, input, builder)
    }
}
