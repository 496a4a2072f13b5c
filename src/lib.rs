//! Persistent, structurally-hashed collections and single-pass lazy streams.
//!
//! The maps and sets in this crate are immutable: every operation that would
//! modify one returns a new collection and leaves the receiver alone. They are
//! hash array mapped tries, so a new version shares every node the change did
//! not touch with the version it came from.
//!
//! # Hashing
//! Callers cannot plug in a hash function. Keys are hashed through
//! [`StructuralHash`], which maps a value to a canonical, type-tagged
//! [`HashKey`]: values of different kinds never collide as keys, and composite
//! values (sequences, records, the collections here) are keyed by contents.
//! Each trie node caches a commutative digest of the hashes below it, which
//! makes hashing and comparing whole tables cheap and lets maps and sets be
//! keys themselves.
//!
//! Values without a structural hash (live handles, see [`Resource`]) are
//! rejected with [`Error::UnsupportedKeyKind`] when they are inserted, and are
//! reported as absent when looked up.
//!
//! # Streams
//! A [`Stream`] is a move-only lazy pipeline built from the combinators in
//! [`ops`]. Chaining consumes the stream, so a drained or extended stream
//! cannot be used again; [`SharedStream`] checks the same rule at runtime for
//! streams reached through a shared reference.

pub(crate) mod error;
pub(crate) mod map;
pub(crate) mod node;
pub mod ops;
pub(crate) mod oracle;
pub(crate) mod set;
pub(crate) mod stream;
pub(crate) mod table;
#[cfg(test)]
pub(crate) mod test_workloads;
pub(crate) mod value;

pub use error::{Error, Result};
pub use map::{HashMap, NonEmptyHashMap};
pub use oracle::{equals, hash, Canonical, HashKey, StructuralHash, TypeTag};
pub use set::{HashSet, NonEmptyHashSet, SetIter};
pub use stream::{IntoIter, SharedStream, Stream, WriteMode};
pub use table::{Entries, HashTable, IntoEntries, TableBuilder};
pub use value::{Opaque, Resource, Value};
