pub(crate) mod bit_set;
pub(crate) mod error;
