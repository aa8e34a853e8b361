#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

//! A compact hash map from arbitrary keys to boolean values.
//!
//! `boolmap` provides [`BoolMap`][map-struct], an open-addressing hash table
//! that stores one key per slot and packs the boolean values into a bit set,
//! so the per-entry overhead is close to one bit plus one key. The design is
//! ported from the object-to-boolean primitive maps of Eclipse Collections
//! (formerly GS Collections).
//!
//! [map-struct]: ./map/struct.BoolMap.html
//!
//! # Characteristics
//!
//! - Collisions are resolved with a deterministic probe sequence over a
//!   power-of-two table; no separate chains are allocated.
//! - Removals leave tombstones which are reclaimed by a same-capacity rehash
//!   once they exceed a quarter of the table, so delete/insert churn does not
//!   grow the table without bound.
//! - The map is *not* thread-safe. All mutating operations take `&mut self`,
//!   which lets the borrow checker enforce the single-writer discipline at
//!   compile time. Wrap the map in a lock if you need to share it.
//!
//! # Examples
//!
//! ```rust
//! use boolmap::BoolMap;
//!
//! let mut map = BoolMap::new();
//! map.put("a", true);
//! map.put("b", false);
//!
//! assert_eq!(map.get("a"), true);
//! // Absent keys read as `false`, like the primitive maps this is based on.
//! assert_eq!(map.get("c"), false);
//! assert_eq!(map.get_if_absent("c", true), true);
//!
//! map.remove_key("a");
//! assert!(!map.contains_key("a"));
//! assert_eq!(map.len(), 1);
//! ```
//!
//! # Hashing Algorithm
//!
//! By default, `BoolMap` uses the same hashing algorithm as
//! `std::collections::HashMap`, which is selected to provide resistance
//! against HashDoS attacks (currently SipHash 1-3).
//!
//! The hashing algorithm can be replaced on a per-`BoolMap` basis using the
//! [`build_with_hasher`][build-with-hasher-method] method of the
//! `BoolMapBuilder`. Many alternative algorithms are available on crates.io,
//! such as the [aHash][ahash-crate] crate.
//!
//! [build-with-hasher-method]: ./map/struct.BoolMapBuilder.html#method.build_with_hasher
//! [ahash-crate]: https://crates.io/crates/ahash

pub(crate) mod common;
pub mod map;

pub use crate::{
    common::error::{DeserializeError, NotPresentError},
    map::{BoolMap, BoolMapBuilder, ImmutableBoolMap, KeyCodec},
};
