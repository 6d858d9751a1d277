//! Record builder: a fixed tuple of fields and a constructor.
//!
//! Every field decodes independently; all field failures are reported
//! together before the constructor runs.

use super::field::Field;
use super::{decode_via_map, encode_via_map, Codec, MapCodec};
use crate::error::{CodecError, CodecResult};
use crate::ops::{MapBuilder, MapLike, ValueOps};
use paste::paste;

/// An ordered tuple of [`Field`]s describing the record `T`.
pub trait Fields<T> {
    /// Decoded field values, in declaration order.
    type Output;

    fn keys(&self) -> Vec<&'static str>;

    fn decode_fields<O: ValueOps>(
        &self,
        ops: &O,
        input: &MapLike<'_, O::Value>,
    ) -> CodecResult<Self::Output>;

    fn encode_fields<O: ValueOps>(&self, ops: &O, input: &T, builder: &mut MapBuilder<O::Value>);
}

macro_rules! impl_fields_for_tuple {
    ($($index:literal),*) => {
        paste! {
            impl<T, $( [<A $index>], [<M $index>]: MapCodec<[<A $index>]> ),*> Fields<T>
                for ( $( Field<T, [<A $index>], [<M $index>]>, )* )
            {
                type Output = ( $( [<A $index>], )* );

                fn keys(&self) -> Vec<&'static str> {
                    let mut keys = Vec::new();
                    $( keys.extend(self.$index.codec.keys()); )*
                    keys
                }

                fn decode_fields<O: ValueOps>(
                    &self,
                    ops: &O,
                    input: &MapLike<'_, O::Value>,
                ) -> CodecResult<Self::Output> {
                    let mut errors = Vec::new();
                    $(
                        let [<value $index>] = match self.$index.codec.decode_map(ops, input) {
                            Ok(value) => Some(value),
                            Err(error) => {
                                errors.push(error);
                                None
                            }
                        };
                    )*
                    match ( $( [<value $index>], )* ) {
                        ( $( Some([<value $index>]), )* ) => Ok(( $( [<value $index>], )* )),
                        _ => Err(CodecError::accumulate(errors)),
                    }
                }

                fn encode_fields<O: ValueOps>(
                    &self,
                    ops: &O,
                    input: &T,
                    builder: &mut MapBuilder<O::Value>,
                ) {
                    $( self.$index.codec.encode_map(ops, (self.$index.getter)(input), builder); )*
                }
            }
        }
    };
}

// Generate implementations for records of 1 through 12 fields
impl_fields_for_tuple!(0);
impl_fields_for_tuple!(0, 1);
impl_fields_for_tuple!(0, 1, 2);
impl_fields_for_tuple!(0, 1, 2, 3);
impl_fields_for_tuple!(0, 1, 2, 3, 4);
impl_fields_for_tuple!(0, 1, 2, 3, 4, 5);
impl_fields_for_tuple!(0, 1, 2, 3, 4, 5, 6);
impl_fields_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7);
impl_fields_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8);
impl_fields_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
impl_fields_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
impl_fields_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);

type Constructor<T, Output> = Box<dyn Fn(Output) -> CodecResult<T> + Send + Sync>;

/// Codec of a record `T`, usable both standalone and as part of a larger map.
pub struct RecordCodec<T, F: Fields<T>> {
    fields: F,
    construct: Constructor<T, F::Output>,
}

/// Record whose constructor cannot fail.
pub fn record<T, F>(fields: F, construct: fn(F::Output) -> T) -> RecordCodec<T, F>
where
    F: Fields<T>,
    T: 'static,
    F::Output: 'static,
{
    RecordCodec {
        fields,
        construct: Box::new(move |output| Ok(construct(output))),
    }
}

/// Record whose constructor validates its inputs.
pub fn try_record<T, F>(fields: F, construct: fn(F::Output) -> CodecResult<T>) -> RecordCodec<T, F>
where
    F: Fields<T>,
    T: 'static,
    F::Output: 'static,
{
    RecordCodec {
        fields,
        construct: Box::new(construct),
    }
}

impl<T, F: Fields<T>> MapCodec<T> for RecordCodec<T, F> {
    fn keys(&self) -> Vec<&'static str> {
        self.fields.keys()
    }

    fn decode_map<O: ValueOps>(&self, ops: &O, input: &MapLike<'_, O::Value>) -> CodecResult<T> {
        let output = self.fields.decode_fields(ops, input)?;
        (self.construct)(output)
    }

    fn encode_map<O: ValueOps>(&self, ops: &O, input: &T, builder: &mut MapBuilder<O::Value>) {
        self.fields.encode_fields(ops, input, builder);
    }
}

impl<T, F: Fields<T>> Codec<T> for RecordCodec<T, F> {
    fn encode<O: ValueOps>(&self, ops: &O, input: &T, prefix: O::Value) -> CodecResult<O::Value> {
        encode_via_map(self, ops, input, prefix)
    }

    fn decode<O: ValueOps>(&self, ops: &O, input: &O::Value) -> CodecResult<T> {
        decode_via_map(self, ops, input)
    }
}
