//! Bridge between [serde] and the arkworks [CanonicalSerialize] /
//! [CanonicalDeserialize] traits, so that field elements and domains can live
//! inside serde-derived structs.
//!
//! Annotate a field with `#[serde_as(as = "crate::serialization::SerdeAs")]`
//! (or `Vec<SerdeAs>` for containers).

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde_with::{Bytes, DeserializeAs, SerializeAs};

/// Marker type used with [serde_with::serde_as].
pub struct SerdeAs;

impl<T> SerializeAs<T> for SerdeAs
where
    T: CanonicalSerialize,
{
    fn serialize_as<S>(val: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut bytes = Vec::with_capacity(val.compressed_size());
        val.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        Bytes::serialize_as(&bytes, serializer)
    }
}

impl<'de, T> DeserializeAs<'de, T> for SerdeAs
where
    T: CanonicalDeserialize,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: Vec<u8> = Bytes::deserialize_as(deserializer)?;
        T::deserialize_compressed(&mut &bytes[..]).map_err(serde::de::Error::custom)
    }
}
