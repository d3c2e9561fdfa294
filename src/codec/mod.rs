//! Record codecs: raw store bytes to typed LRP records and back.


use std::marker::PhantomData;

use bytes::Bytes;

use crate::models::LrpRecord;
use crate::DecodeError;
use crate::StorageError;

/// Converts between one record kind and the bytes stored under its key.
pub trait RecordCodec: Send + Sync + 'static {
    type Record: LrpRecord;

    fn encode(
        &self,
        record: &Self::Record,
    ) -> Result<Bytes, StorageError>;

    /// Decode the value stored at `key`. `key` is only used for error context.
    fn decode(
        &self,
        key: &str,
        raw: &[u8],
    ) -> Result<Self::Record, DecodeError>;
}

/// Bincode codec, generic over any [`LrpRecord`]
pub struct BincodeCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> BincodeCodec<T> {
    pub fn new() -> Self {
        BincodeCodec {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for BincodeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BincodeCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for BincodeCodec<T>
where
    T: LrpRecord,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("BincodeCodec").field("kind", &T::KIND).finish()
    }
}

impl<T> RecordCodec for BincodeCodec<T>
where
    T: LrpRecord,
{
    type Record = T;

    fn encode(
        &self,
        record: &T,
    ) -> Result<Bytes, StorageError> {
        Ok(Bytes::from(bincode::serialize(record)?))
    }

    fn decode(
        &self,
        key: &str,
        raw: &[u8],
    ) -> Result<T, DecodeError> {
        bincode::deserialize(raw).map_err(|source| DecodeError {
            key: key.to_string(),
            kind: T::KIND,
            source,
        })
    }
}
