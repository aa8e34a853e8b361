//! The linear serialized form of a `BoolMap`.
//!
//! Layout, all integers big-endian:
//!
//! 1. a 4-byte signed entry count `N`;
//! 2. a 4-byte legacy load-factor field, always written as `0.5f32`
//!    (`0x3F00_0000`) and ignored on read — retained only for compatibility
//!    with the original format;
//! 3. `N` repetitions of one [`KeyCodec`]-encoded key followed by one value
//!    byte (`1` or `0`).
//!
//! Reading goes through the normal `put` path, so duplicate keys in a
//! malformed stream silently collapse to the last value.

use super::BoolMap;
use crate::common::error::DeserializeError;

use std::{
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hash},
    io::{self, Read, Write},
};

const LEGACY_LOAD_FACTOR: f32 = 0.5;

/// Big-endian wire encoding for `BoolMap` keys.
///
/// Implementations are provided for `String`, `bool` and the fixed-width
/// integer types. Strings are written as a 4-byte unsigned length followed by
/// the UTF-8 bytes.
pub trait KeyCodec: Sized {
    /// Writes this key to `writer`.
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()>;

    /// Reads one key from `reader`.
    fn decode<R: Read>(reader: &mut R) -> Result<Self, DeserializeError>;
}

macro_rules! impl_key_codec_for_int {
    ($($t:ty),* $(,)?) => {$(
        impl KeyCodec for $t {
            fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
                writer.write_all(&self.to_be_bytes())
            }

            fn decode<R: Read>(reader: &mut R) -> Result<Self, DeserializeError> {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                reader.read_exact(&mut buf)?;
                Ok(<$t>::from_be_bytes(buf))
            }
        }
    )*};
}

impl_key_codec_for_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl KeyCodec for String {
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let len = u32::try_from(self.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "key longer than u32::MAX"))?;
        writer.write_all(&len.to_be_bytes())?;
        writer.write_all(self.as_bytes())
    }

    fn decode<R: Read>(reader: &mut R) -> Result<Self, DeserializeError> {
        let len = u32::decode(reader)? as usize;
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| DeserializeError::MalformedKey(format!("invalid UTF-8: {e}")))
    }
}

impl KeyCodec for bool {
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&[u8::from(*self)])
    }

    fn decode<R: Read>(reader: &mut R) -> Result<Self, DeserializeError> {
        match u8::decode(reader)? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(DeserializeError::MalformedKey(format!(
                "invalid boolean key byte: {b:#04x}"
            ))),
        }
    }
}

impl<K, S> BoolMap<K, S>
where
    K: KeyCodec + Hash + Eq,
    S: BuildHasher,
{
    /// Writes the serialized form of this map to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let len = i32::try_from(self.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "map too large to serialize"))?;
        writer.write_all(&len.to_be_bytes())?;
        writer.write_all(&LEGACY_LOAD_FACTOR.to_be_bytes())?;
        for (key, value) in self.iter() {
            key.encode(writer)?;
            writer.write_all(&[u8::from(value)])?;
        }
        Ok(())
    }

    /// Reads a serialized map from `reader`, hashing keys with `hasher`.
    ///
    /// The table is allocated once, pre-sized from the entry count, and the
    /// entries are inserted through the normal `put` path.
    pub fn read_from_with_hasher<R: Read>(
        reader: &mut R,
        hasher: S,
    ) -> Result<Self, DeserializeError> {
        let len = i32::decode(reader)?;
        if len < 0 {
            return Err(DeserializeError::NegativeEntryCount(len));
        }
        // The legacy load-factor field.
        let mut discard = [0u8; 4];
        reader.read_exact(&mut discard)?;

        let mut map = Self::with_everything(Some(len as usize), hasher);
        for _ in 0..len {
            let key = K::decode(reader)?;
            let value = match u8::decode(reader)? {
                0 => false,
                1 => true,
                b => return Err(DeserializeError::InvalidValueByte(b)),
            };
            map.put(key, value);
        }
        Ok(map)
    }
}

impl<K> BoolMap<K, RandomState>
where
    K: KeyCodec + Hash + Eq,
{
    /// Reads a serialized map from `reader` with the default hasher.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, DeserializeError> {
        Self::read_from_with_hasher(reader, RandomState::default())
    }
}
