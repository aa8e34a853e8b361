/// The error type returned by [`BoolMap::try_get`][try-get] when the key is
/// not present in the map.
///
/// [try-get]: ../map/struct.BoolMap.html#method.try_get
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("key not present in map")]
pub struct NotPresentError;

/// The error type for [`BoolMap::read_from`][read-from].
///
/// [read-from]: ../map/struct.BoolMap.html#method.read_from
#[derive(thiserror::Error, Debug)]
pub enum DeserializeError {
    /// An I/O error occurred while reading the serialized form.
    #[error("I/O error while reading a serialized map: {0}")]
    Io(#[from] std::io::Error),

    /// The entry-count header was negative.
    #[error("serialized map has a negative entry count: {0}")]
    NegativeEntryCount(i32),

    /// A value byte was neither `0` nor `1`.
    #[error("serialized map has an invalid value byte: {0:#04x}")]
    InvalidValueByte(u8),

    /// A key could not be decoded, e.g. a length-prefixed string whose bytes
    /// are not valid UTF-8.
    #[error("serialized map has a malformed key: {0}")]
    MalformedKey(String),
}
